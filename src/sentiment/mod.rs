//! Polarity models.
//!
//! Scoring is delegated to a [`PolarityModel`] so the categorization and
//! table handling never depend on how a score is produced.

mod lexicon;

pub use lexicon::LexiconModel;

/// Computes a sentiment polarity for a piece of text.
pub trait PolarityModel {
    /// Short model name shown in reports.
    fn name(&self) -> &str;

    /// Polarity of `text`, nominally in [-1.0, 1.0].
    ///
    /// Must be deterministic for identical input. Callers clamp finite
    /// values into range and treat non-finite values as a row anomaly.
    fn polarity(&self, text: &str) -> f64;
}
