use tracing::{error, info};

use crate::charts::ChartSeries;

use super::registry::ChartId;

/// Output seam for everything the controller produces. Chart rendering
/// itself lives behind this trait; the crate ships a plain-text surface
/// and tests substitute a recording one.
pub trait DisplaySurface: Send + Sync {
    /// Draw (or redraw) a chart. The registry guarantees `release_chart`
    /// was called first when `id` was already on screen.
    fn create_chart(&self, id: ChartId, series: &ChartSeries);

    /// Drop any resources held for a chart.
    fn release_chart(&self, id: ChartId);

    /// A named block of text, e.g. the overview stats panel.
    fn show_text(&self, section: &str, body: &str);

    /// Non-fatal failure the user should see.
    fn show_error(&self, context: &str, message: &str);
}

/// Terminal surface: charts are summarized as one line, text panels are
/// printed as-is.
#[derive(Debug, Default)]
pub struct TextSurface;

impl DisplaySurface for TextSurface {
    fn create_chart(&self, id: ChartId, series: &ChartSeries) {
        if series.is_empty() {
            println!("[{}] (no data)", id.as_str());
            return;
        }
        let first = series.values.first().copied().unwrap_or(0.0);
        let last = series.values.last().copied().unwrap_or(0.0);
        println!(
            "[{}] {:?}, {} points, {:.2} .. {:.2}",
            id.as_str(),
            series.kind,
            series.values.len(),
            first,
            last
        );
    }

    fn release_chart(&self, id: ChartId) {
        info!(chart = id.as_str(), "chart released");
    }

    fn show_text(&self, section: &str, body: &str) {
        println!("== {} ==\n{}", section, body);
    }

    fn show_error(&self, context: &str, message: &str) {
        error!(%context, %message, "dashboard error");
        eprintln!("{}: {}", context, message);
    }
}
