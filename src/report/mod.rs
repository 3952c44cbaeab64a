//! Dashboard report output.

mod chart;
mod generator;

pub use chart::render_bar_chart;
pub use generator::*;
