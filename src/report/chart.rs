//! Text bar chart of the category distribution.

use crate::models::DistributionEntry;

const BAR: char = '█';

/// Render one line per category, the largest bar `width` cells long.
pub fn render_bar_chart(distribution: &[DistributionEntry], width: usize) -> String {
    let max = distribution.iter().map(|e| e.count).max().unwrap_or(0);
    if max == 0 {
        return "(no reviews)\n".to_string();
    }

    let label_width = distribution
        .iter()
        .map(|e| e.category.as_str().len())
        .max()
        .unwrap_or(0);

    let mut chart = String::new();
    for entry in distribution {
        let cells = bar_length(entry.count, max, width);
        chart.push_str(&format!(
            "{} {:<label_width$} {} {} ({:.1}%)\n",
            entry.category.emoji(),
            entry.category.as_str(),
            BAR.to_string().repeat(cells),
            entry.count,
            entry.percentage,
        ));
    }

    chart
}

/// Non-zero counts always get at least one cell.
fn bar_length(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || width == 0 {
        return 0;
    }
    let scaled = (count as f64 / max as f64 * width as f64).round() as usize;
    scaled.clamp(1, width)
}
