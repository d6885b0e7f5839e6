use std::collections::HashMap;
use std::sync::Arc;

use crate::charts::ChartSeries;

use super::surface::DisplaySurface;

/// Stable identity of every chart the dashboard can draw. Refreshing a
/// chart reuses its id, so the registry knows to tear down the old
/// instance first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    CumulativeGain,
    RollingGain,
    RollingSuccess,
    GainsDistribution,
    WinLossRatio,
    BuyPressure,
    SellPressure,
    FearGreed,
    MarketPrice,
    EquityCurve,
    BuyCycleHistory,
    SellCycleHistory,
}

impl ChartId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::CumulativeGain => "cumulative-gain",
            ChartId::RollingGain => "rolling-gain",
            ChartId::RollingSuccess => "rolling-success",
            ChartId::GainsDistribution => "gains-distribution",
            ChartId::WinLossRatio => "win-loss-ratio",
            ChartId::BuyPressure => "buy-pressure",
            ChartId::SellPressure => "sell-pressure",
            ChartId::FearGreed => "fear-greed",
            ChartId::MarketPrice => "market-price",
            ChartId::EquityCurve => "equity-curve",
            ChartId::BuyCycleHistory => "buy-cycle-history",
            ChartId::SellCycleHistory => "sell-cycle-history",
        }
    }
}

/// Tracks which charts are live on the surface. Rendering an id that is
/// already live releases the old chart before creating the new one, so a
/// refresh can never leak or double-draw.
pub struct ChartRegistry {
    surface: Arc<dyn DisplaySurface>,
    live: HashMap<ChartId, ChartSeries>,
}

impl ChartRegistry {
    pub fn new(surface: Arc<dyn DisplaySurface>) -> Self {
        Self {
            surface,
            live: HashMap::new(),
        }
    }

    pub fn render(&mut self, id: ChartId, series: ChartSeries) {
        if self.live.contains_key(&id) {
            self.surface.release_chart(id);
        }
        self.surface.create_chart(id, &series);
        self.live.insert(id, series);
    }

    /// Latest series rendered for `id`, if any.
    pub fn current(&self, id: ChartId) -> Option<&ChartSeries> {
        self.live.get(&id)
    }

    pub fn is_live(&self, id: ChartId) -> bool {
        self.live.contains_key(&id)
    }

    /// Releases every live chart, e.g. when a tab is left.
    pub fn clear(&mut self) {
        for id in self.live.keys() {
            self.surface.release_chart(*id);
        }
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::charts::{ChartKind, StyleHints};

    #[derive(Default)]
    struct RecordingSurface {
        events: Mutex<Vec<String>>,
    }

    impl DisplaySurface for RecordingSurface {
        fn create_chart(&self, id: ChartId, _series: &ChartSeries) {
            self.events
                .lock()
                .unwrap()
                .push(format!("create:{}", id.as_str()));
        }
        fn release_chart(&self, id: ChartId) {
            self.events
                .lock()
                .unwrap()
                .push(format!("release:{}", id.as_str()));
        }
        fn show_text(&self, _section: &str, _body: &str) {}
        fn show_error(&self, _context: &str, _message: &str) {}
    }

    fn series(v: Vec<f64>) -> ChartSeries {
        ChartSeries {
            kind: ChartKind::Line,
            labels: v.iter().map(|x| x.to_string()).collect(),
            values: v,
            style: StyleHints::default(),
        }
    }

    #[test]
    fn rerender_releases_before_creating() {
        let surface = Arc::new(RecordingSurface::default());
        let mut registry = ChartRegistry::new(surface.clone());

        registry.render(ChartId::CumulativeGain, series(vec![1.0]));
        registry.render(ChartId::CumulativeGain, series(vec![1.0, 2.0]));

        let events = surface.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "create:cumulative-gain",
                "release:cumulative-gain",
                "create:cumulative-gain"
            ]
        );
        assert_eq!(
            registry.current(ChartId::CumulativeGain).unwrap().values,
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn clear_releases_everything() {
        let surface = Arc::new(RecordingSurface::default());
        let mut registry = ChartRegistry::new(surface.clone());

        registry.render(ChartId::FearGreed, series(vec![40.0]));
        registry.render(ChartId::MarketPrice, series(vec![1.0]));
        registry.clear();

        assert!(!registry.is_live(ChartId::FearGreed));
        let events = surface.events.lock().unwrap();
        assert_eq!(events.iter().filter(|e| e.starts_with("release")).count(), 2);
    }
}
