pub mod prefs;
pub mod registry;
pub mod surface;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::analytics::{AnalyticsCalculator, SeriesPoint};
use crate::charts::{self, format, FEAR_GREED_CAPACITY, PRESSURE_GAUGE_CAPACITY};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::gateway::{BotApi, BotConfig, ExportKind, ExportResult};
use crate::types::{BacktestParameters, BacktestResults, BacktestStrategy, CycleRecord, MarketPeriod, ProfileDraft};

pub use prefs::PreferenceStore;
pub use registry::{ChartId, ChartRegistry};
pub use surface::{DisplaySurface, TextSurface};

/// Asks the user to approve a destructive action. Returning `false`
/// aborts the operation without touching the backend.
pub type ConfirmFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The dashboard's views. The active tab is persisted so a restart
/// reopens where the user left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Charts,
    Orders,
    Automation,
    Market,
    Backtest,
    Profiles,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Charts => "charts",
            Tab::Orders => "orders",
            Tab::Automation => "automation",
            Tab::Market => "market",
            Tab::Backtest => "backtest",
            Tab::Profiles => "profiles",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overview" => Some(Tab::Overview),
            "charts" => Some(Tab::Charts),
            "orders" => Some(Tab::Orders),
            "automation" => Some(Tab::Automation),
            "market" => Some(Tab::Market),
            "backtest" => Some(Tab::Backtest),
            "profiles" => Some(Tab::Profiles),
            _ => None,
        }
    }

    pub fn all() -> &'static [Tab] {
        &[
            Tab::Overview,
            Tab::Charts,
            Tab::Orders,
            Tab::Automation,
            Tab::Market,
            Tab::Backtest,
            Tab::Profiles,
        ]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct ViewState {
    active_tab: Tab,
    market_period: MarketPeriod,
    last_backtest: Option<(BacktestResults, Option<BacktestParameters>)>,
}

#[derive(Default)]
struct Timers {
    refresh: Option<JoinHandle<()>>,
    auto_poll: Option<JoinHandle<()>>,
    market: Option<JoinHandle<()>>,
}

impl Timers {
    fn abort_all(&mut self) {
        for handle in [
            self.refresh.take(),
            self.auto_poll.take(),
            self.market.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

/// Orchestrates tab lifecycle, periodic refreshes, and backend actions.
/// Refreshes are stateless: each one refetches, recomputes, and rerenders
/// from scratch, so the latest completed pass always wins.
pub struct DashboardController {
    api: Arc<dyn BotApi>,
    config: DashboardConfig,
    surface: Arc<dyn DisplaySurface>,
    registry: Mutex<ChartRegistry>,
    prefs: Arc<PreferenceStore>,
    state: RwLock<ViewState>,
    confirm: ConfirmFn,
    timers: Mutex<Timers>,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn BotApi>,
        config: DashboardConfig,
        surface: Arc<dyn DisplaySurface>,
        prefs: Arc<PreferenceStore>,
        confirm: ConfirmFn,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            config,
            surface: surface.clone(),
            registry: Mutex::new(ChartRegistry::new(surface)),
            prefs,
            state: RwLock::new(ViewState {
                active_tab: Tab::Overview,
                market_period: MarketPeriod::default(),
                last_backtest: None,
            }),
            confirm,
            timers: Mutex::new(Timers::default()),
        })
    }

    /// Restores the persisted tab, renders it, and starts the periodic
    /// refresh and automation poll timers.
    pub async fn start(self: &Arc<Self>) {
        let tab = self.prefs.active_tab().unwrap_or(Tab::Overview);
        info!(tab = tab.as_str(), "dashboard starting");
        self.enter_tab(tab).await;

        let mut timers = self.timers.lock().await;

        let ctrl = Arc::clone(self);
        let refresh_secs = self.config.refresh_secs;
        timers.refresh = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                ctrl.refresh_active().await;
            }
        }));

        let ctrl = Arc::clone(self);
        let poll_secs = self.config.auto_status_poll_secs;
        timers.auto_poll = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(poll_secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                ctrl.poll_auto_status().await;
            }
        }));
    }

    pub async fn shutdown(&self) {
        self.timers.lock().await.abort_all();
        self.registry.lock().await.clear();
    }

    pub async fn active_tab(&self) -> Tab {
        self.state.read().await.active_tab
    }

    /// Switches view: tears down the previous tab's charts, persists the
    /// selection, renders the new tab, and keeps the market refresh timer
    /// alive only while the market tab is showing.
    pub async fn enter_tab(self: &Arc<Self>, tab: Tab) {
        {
            let mut state = self.state.write().await;
            state.active_tab = tab;
        }
        self.prefs.set_active_tab(tab);
        self.registry.lock().await.clear();

        {
            let mut timers = self.timers.lock().await;
            if let Some(handle) = timers.market.take() {
                handle.abort();
            }
            if tab == Tab::Market {
                let ctrl = Arc::clone(self);
                let secs = self.config.market_refresh_secs;
                timers.market = Some(tokio::spawn(async move {
                    let mut interval = tokio::time::interval(Duration::from_secs(secs));
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                        ctrl.load_market().await;
                    }
                }));
            }
        }

        self.load_tab(tab).await;
    }

    /// Re-renders whatever tab is showing. Errors are reported on the
    /// surface, never fatal: the next tick retries from scratch.
    pub async fn refresh_active(&self) {
        let tab = self.state.read().await.active_tab;
        debug!(tab = tab.as_str(), "periodic refresh");
        self.load_tab(tab).await;
    }

    async fn load_tab(&self, tab: Tab) {
        match tab {
            Tab::Overview => self.load_overview().await,
            Tab::Charts => self.load_charts().await,
            Tab::Orders => self.load_orders().await,
            Tab::Automation => self.load_automation().await,
            Tab::Market => self.load_market().await,
            Tab::Backtest => self.load_backtest().await,
            Tab::Profiles => self.load_profiles().await,
        }
    }

    async fn load_overview(&self) {
        let data = match self.api.dashboard_data().await {
            Ok(data) => data,
            Err(e) => return self.surface.show_error("overview", &e.to_string()),
        };

        let analytics = AnalyticsCalculator::calculate(&data.cycles);
        let potential = AnalyticsCalculator::potential_gain(&data.cycles);

        let mut body = format!(
            "USDC {}  BTC {:.8} @ {}\n",
            format::currency(data.balances.usdc),
            data.balances.btc,
            format::currency(data.balances.btc_price),
        );
        body.push_str(&format!(
            "Gain {} ({})  Cycles {}/{} completed\n",
            format::currency(data.stats.gain_abs),
            format::signed_percent(data.stats.gain_percent, 2),
            data.stats.completed_cycles,
            data.stats.total_cycles,
        ));
        body.push_str(&format!(
            "Success {}  Avg gain {}  Volatility {}\n",
            format::percent(analytics.success_rate, 1),
            format::currency(analytics.avg_gain),
            format::currency(analytics.volatility),
        ));
        body.push_str(&format!(
            "Potential gain on open sells: {}\n",
            format::currency(potential)
        ));
        if let Some(config) = &data.config {
            body.push_str(&format!(
                "Config: buy offset {}, sell offset {}, percent {}\n",
                config.buy_offset,
                config.sell_offset,
                format::percent(config.percent, 0),
            ));
        }
        if let Some(last_update) = &data.last_update {
            body.push_str(&format!("Last update: {}\n", last_update));
        }
        self.surface.show_text("Overview", &body);
    }

    async fn load_charts(&self) {
        let data = match self.api.dashboard_data().await {
            Ok(data) => data,
            Err(e) => return self.surface.show_error("charts", &e.to_string()),
        };

        let analytics = AnalyticsCalculator::calculate(&data.cycles);
        let rolling = AnalyticsCalculator::rolling_average(&data.cycles, self.config.avg_window);
        let success =
            AnalyticsCalculator::rolling_success_rate(&data.cycles, self.config.success_window);

        // The backend precomputes the cumulative line; recompute locally
        // when the endpoint is unavailable or has nothing yet.
        let cumulative = match self.api.performance().await {
            Ok(points) if !points.is_empty() => points
                .iter()
                .map(|p| SeriesPoint {
                    cycle_id: p.cycle_id,
                    value: p.cumulative_gain,
                })
                .collect(),
            Ok(_) => AnalyticsCalculator::cumulative_series(&data.cycles),
            Err(e) => {
                debug!(error = %e, "performance endpoint unavailable, computing locally");
                AnalyticsCalculator::cumulative_series(&data.cycles)
            }
        };

        // Same for the distribution: backend-labeled ranges when served,
        // local equal-width histogram otherwise.
        let distribution = match self.api.gains_distribution().await {
            Ok(dist) if !dist.ranges.is_empty() => {
                charts::labeled_distribution(&dist.ranges, &dist.counts)
            }
            other => {
                if let Err(e) = other {
                    debug!(error = %e, "distribution endpoint unavailable, computing locally");
                }
                let gains: Vec<Decimal> = data
                    .cycles
                    .iter()
                    .filter(|c| c.is_completed())
                    .map(|c| c.gain())
                    .collect();
                charts::gains_distribution(&AnalyticsCalculator::histogram(
                    &gains,
                    self.config.histogram_buckets,
                ))
            }
        };

        let mut registry = self.registry.lock().await;
        registry.render(ChartId::CumulativeGain, charts::cumulative_gain(&cumulative));
        registry.render(ChartId::RollingGain, charts::rolling_gain(&rolling));
        registry.render(ChartId::RollingSuccess, charts::rolling_success(&success));
        registry.render(ChartId::GainsDistribution, distribution);
        registry.render(
            ChartId::WinLossRatio,
            charts::win_loss_ratio(analytics.profitable_count, analytics.losing_count),
        );
        drop(registry);

        // Pressure gauges read the latest point of the windowed history
        // split; live status counts stand in when the history is down.
        match self.api.cycle_history_split().await {
            Ok(split) => {
                let window = split.tail(self.config.history_window_days);
                let buying = window.buy_counts.last().copied().unwrap_or(0);
                let selling = window.sell_counts.last().copied().unwrap_or(0);
                let mut registry = self.registry.lock().await;
                registry.render(
                    ChartId::BuyCycleHistory,
                    charts::cycle_count_sparkline(&window.dates, &window.buy_counts),
                );
                registry.render(
                    ChartId::SellCycleHistory,
                    charts::cycle_count_sparkline(&window.dates, &window.sell_counts),
                );
                registry.render(
                    ChartId::BuyPressure,
                    charts::gauge("buying", buying as f64, PRESSURE_GAUGE_CAPACITY),
                );
                registry.render(
                    ChartId::SellPressure,
                    charts::gauge("selling", selling as f64, PRESSURE_GAUGE_CAPACITY),
                );
            }
            Err(e) => {
                self.surface.show_error("cycle history", &e.to_string());
                let buying = data
                    .cycles
                    .iter()
                    .filter(|c| !c.is_completed() && c.status.is_buy_side())
                    .count();
                let selling = data
                    .cycles
                    .iter()
                    .filter(|c| c.has_active_sell_order())
                    .count();
                let mut registry = self.registry.lock().await;
                registry.render(
                    ChartId::BuyPressure,
                    charts::gauge("buying", buying as f64, PRESSURE_GAUGE_CAPACITY),
                );
                registry.render(
                    ChartId::SellPressure,
                    charts::gauge("selling", selling as f64, PRESSURE_GAUGE_CAPACITY),
                );
            }
        }

        let top = AnalyticsCalculator::top_trades(&data.cycles, self.config.ranking_size);
        let bottom = AnalyticsCalculator::bottom_trades(&data.cycles, self.config.ranking_size);
        self.surface
            .show_text("Top trades", &Self::ranking_text(&top));
        self.surface
            .show_text("Worst trades", &Self::ranking_text(&bottom));
    }

    fn ranking_text(cycles: &[CycleRecord]) -> String {
        if cycles.is_empty() {
            return "no completed cycles".to_string();
        }
        charts::trade_ranking(cycles)
            .iter()
            .map(|row| {
                format!(
                    "{:>2}. #{:<6} {:>12} {:>9}",
                    row.rank, row.cycle_id, row.gain, row.gain_percent
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn load_orders(&self) {
        let orders = match self.api.active_sell_orders().await {
            Ok(orders) => orders,
            Err(e) => return self.surface.show_error("orders", &e.to_string()),
        };

        if orders.orders.is_empty() {
            self.surface.show_text("Active sell orders", "none");
            return;
        }
        let body = orders
            .orders
            .iter()
            .map(|c| {
                format!(
                    "#{:<6} qty {:.8} buy {} sell {} potential {}",
                    c.id,
                    c.quantity,
                    format::currency(c.buy_price),
                    format::currency(c.sell_price),
                    format::currency(c.gain()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.surface.show_text(
            &format!(
                "Active sell orders (BTC {})",
                format::currency(orders.btc_price)
            ),
            &body,
        );
    }

    async fn load_automation(&self) {
        match self.api.auto_status().await {
            Ok(status) => {
                let mut body = format!(
                    "Automation: {}\nInterval: {} min\n",
                    if status.enabled { "enabled" } else { "disabled" },
                    status.interval_minutes,
                );
                if let Some(last) = &status.last_cycle_time {
                    body.push_str(&format!("Last cycle: {}\n", last));
                }
                if let Some(next) = &status.next_cycle_time {
                    body.push_str(&format!("Next cycle: {}\n", next));
                }
                if let Some(remaining) = status.minutes_remaining {
                    body.push_str(&format!("{:.1} min remaining\n", remaining));
                }
                self.surface.show_text("Automation", &body);
            }
            Err(e) => self.surface.show_error("automation", &e.to_string()),
        }
    }

    async fn load_market(&self) {
        let period = self.state.read().await.market_period;

        let snapshot = match self.api.market_data().await {
            Ok(snapshot) => {
                let mut body = format!(
                    "BTC {}  24h {}\nHigh {}  Low {} (24h)\nVolume {}  Market cap {}\n",
                    format::currency(snapshot.price),
                    format::signed_percent(snapshot.price_change_24h, 2),
                    format::currency(snapshot.high_24h),
                    format::currency(snapshot.low_24h),
                    format::large_number(snapshot.volume_24h.to_f64().unwrap_or(0.0), 2),
                    format::large_number(snapshot.market_cap.to_f64().unwrap_or(0.0), 2),
                );
                body.push_str(&format!(
                    "Dominance BTC {}  ETH {}\n",
                    format::percent(snapshot.btc_dominance, 1),
                    format::percent(snapshot.eth_dominance, 1),
                ));
                body.push_str(&format!(
                    "ATH distance {}  Circulating {} BTC\n",
                    format::signed_percent(snapshot.ath_distance_pct(), 1),
                    format::large_number(snapshot.circulating_supply.to_f64().unwrap_or(0.0), 0),
                ));
                if let (Some(index), Some(band)) =
                    (snapshot.fear_greed_index, snapshot.sentiment())
                {
                    body.push_str(&format!("Fear & Greed: {} ({})\n", index, band.label()));
                    self.registry.lock().await.render(
                        ChartId::FearGreed,
                        charts::gauge("fear & greed", index as f64, FEAR_GREED_CAPACITY),
                    );
                }
                self.surface.show_text("Market", &body);
                Some(snapshot)
            }
            Err(e) => {
                self.surface.show_error("market data", &e.to_string());
                None
            }
        };

        // Short periods are charted from the snapshot's own sparklines
        // (no timestamps); longer spans come from the history endpoint.
        let sparkline = snapshot
            .as_ref()
            .and_then(|s| match period {
                MarketPeriod::H24 => Some(s.sparkline_24h.clone()),
                MarketPeriod::D7 => Some(s.sparkline_7d.clone()),
                _ => None,
            })
            .filter(|prices| !prices.is_empty());

        let (prices, timestamps) = match sparkline {
            Some(prices) => (prices, None),
            None => match self.api.market_chart(period).await {
                Ok(chart) => (chart.prices, chart.timestamps),
                Err(e) => {
                    self.surface.show_error("market chart", &e.to_string());
                    return;
                }
            },
        };
        let series = charts::market_prices(&prices, period, timestamps.as_deref(), Utc::now());
        self.registry
            .lock()
            .await
            .render(ChartId::MarketPrice, series);
    }

    async fn load_backtest(&self) {
        let last = self.state.read().await.last_backtest.clone();
        match last {
            Some((results, params)) => {
                self.surface
                    .show_text("Backtest", &Self::backtest_text(&results, params.as_ref()));
                self.registry
                    .lock()
                    .await
                    .render(ChartId::EquityCurve, charts::equity_curve(&results));
            }
            None => self.surface.show_text("Backtest", "no backtest run yet"),
        }
    }

    fn backtest_text(results: &BacktestResults, params: Option<&BacktestParameters>) -> String {
        let mut body = format!(
            "Capital {} -> {} ({})\n",
            format::currency(results.initial_capital),
            format::currency(results.final_capital),
            format::signed_percent(results.total_return, 2),
        );
        body.push_str(&format!(
            "Trades {} ({} wins, {} losses, {} win rate)\n",
            results.total_trades,
            results.winning_trades,
            results.losing_trades,
            format::percent(results.win_rate, 1),
        ));
        body.push_str(&format!(
            "Max drawdown {}  Sharpe {:.2}\n",
            format::percent(results.max_drawdown, 2),
            results.sharpe_ratio,
        ));
        if let Some(params) = params {
            body.push_str(&format!(
                "Strategy {} over {} cycles, starting {}\n",
                params.strategy,
                params.total_cycles,
                format::currency(params.initial_capital),
            ));
        }
        if !results.trades.is_empty() {
            body.push_str("Trades:\n");
            for trade in &results.trades {
                body.push_str(&format!(
                    "#{:<6} buy {} sell {} qty {:.8} gain {} capital {}\n",
                    trade.cycle_id,
                    format::currency(trade.buy_price),
                    format::currency(trade.sell_price),
                    trade.quantity,
                    format::currency(trade.trade_gain),
                    format::currency(trade.capital),
                ));
            }
        }
        body
    }

    async fn load_profiles(&self) {
        match self.api.profiles().await {
            Ok(profiles) if profiles.is_empty() => {
                self.surface.show_text("Profiles", "no saved profiles");
            }
            Ok(profiles) => {
                let body = profiles
                    .iter()
                    .map(|p| {
                        format!(
                            "#{:<4} {:<20} buy {} sell {} percent {} - {}",
                            p.id,
                            p.name,
                            p.buy_offset,
                            p.sell_offset,
                            format::percent(p.percent, 0),
                            p.description.as_deref().unwrap_or(""),
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                self.surface.show_text("Profiles", &body);
            }
            Err(e) => self.surface.show_error("profiles", &e.to_string()),
        }
    }

    async fn poll_auto_status(&self) {
        if self.state.read().await.active_tab != Tab::Automation {
            return;
        }
        self.load_automation().await;
    }

    // Actions

    /// Starts a new buy cycle after user confirmation.
    pub async fn request_new_cycle(&self) -> Result<bool> {
        if !(self.confirm)("Start a new buy cycle?") {
            info!("new cycle declined");
            return Ok(false);
        }
        self.api.new_cycle().await?;
        info!("new cycle requested");
        Ok(true)
    }

    /// Cancels a cycle after user confirmation. Cancelling forfeits the
    /// position, so this is always gated.
    pub async fn request_cancel_cycle(&self, cycle_id: u64) -> Result<bool> {
        if !(self.confirm)(&format!(
            "Cancel cycle #{}? Open orders will be revoked.",
            cycle_id
        )) {
            info!(cycle_id, "cancel declined");
            return Ok(false);
        }
        self.api.cancel_cycle(cycle_id).await?;
        info!(cycle_id, "cycle cancelled");
        Ok(true)
    }

    /// Repositions a cycle's sell order. Asks twice when the new price
    /// would lock in a loss (at or below the buy price).
    pub async fn request_sell_order_update(
        &self,
        cycle: &CycleRecord,
        new_sell_price: Decimal,
    ) -> Result<bool> {
        if !(self.confirm)(&format!(
            "Move sell order of cycle #{} to {}?",
            cycle.id,
            format::currency(new_sell_price)
        )) {
            return Ok(false);
        }
        if new_sell_price <= cycle.buy_price
            && !(self.confirm)(&format!(
                "{} is at or below the buy price {}. Selling locks in a loss. Continue?",
                format::currency(new_sell_price),
                format::currency(cycle.buy_price)
            ))
        {
            return Ok(false);
        }
        self.api.update_sell_order(cycle.id, new_sell_price).await?;
        info!(cycle_id = cycle.id, %new_sell_price, "sell order updated");
        Ok(true)
    }

    pub async fn force_update_cycles(&self) -> Result<()> {
        self.api.update_cycles().await
    }

    pub async fn sync_exchange(&self) -> Result<()> {
        self.api.sync_exchange().await
    }

    pub async fn run_backtest(
        self: &Arc<Self>,
        strategy: BacktestStrategy,
        initial_capital: Decimal,
    ) -> Result<BacktestResults> {
        let (results, params) = self.api.run_backtest(strategy, initial_capital).await?;
        {
            let mut state = self.state.write().await;
            state.last_backtest = Some((results.clone(), params));
        }
        if self.active_tab().await == Tab::Backtest {
            self.load_backtest().await;
        }
        Ok(results)
    }

    pub async fn set_market_period(&self, period: MarketPeriod) {
        {
            let mut state = self.state.write().await;
            state.market_period = period;
        }
        if self.state.read().await.active_tab == Tab::Market {
            self.load_market().await;
        }
    }

    pub async fn auto_start(&self, interval_minutes: f64) -> Result<String> {
        self.api.auto_start(interval_minutes).await
    }

    pub async fn auto_stop(&self) -> Result<String> {
        self.api.auto_stop().await
    }

    pub async fn auto_configure(&self, interval_minutes: f64) -> Result<String> {
        self.api.auto_configure(interval_minutes).await
    }

    pub async fn get_bot_config(&self) -> Result<BotConfig> {
        self.api.get_config().await
    }

    pub async fn update_bot_config(&self, config: &BotConfig) -> Result<()> {
        self.api.update_config(config).await?;
        info!(
            buy_offset = config.buy_offset,
            sell_offset = config.sell_offset,
            "bot config updated"
        );
        Ok(())
    }

    pub async fn create_profile(&self, draft: &ProfileDraft) -> Result<()> {
        draft
            .validate()
            .map_err(crate::error::DashboardError::Api)?;
        self.api.create_profile(draft).await
    }

    pub async fn update_profile(&self, id: u64, draft: &ProfileDraft) -> Result<()> {
        draft
            .validate()
            .map_err(crate::error::DashboardError::Api)?;
        self.api.update_profile(id, draft).await
    }

    /// Deleting a profile is unrecoverable, so it is confirmation-gated.
    pub async fn request_delete_profile(&self, id: u64) -> Result<bool> {
        if !(self.confirm)(&format!("Delete profile #{}?", id)) {
            return Ok(false);
        }
        self.api.delete_profile(id).await?;
        Ok(true)
    }

    pub async fn apply_profile(&self, id: u64) -> Result<()> {
        self.api.apply_profile(id).await
    }

    pub async fn export(&self) -> Result<ExportResult> {
        let result = self.api.export().await?;
        info!(
            csv = result.csv_file.as_deref().unwrap_or("-"),
            json = result.json_file.as_deref().unwrap_or("-"),
            "export prepared"
        );
        Ok(result)
    }

    pub async fn download_export(&self, kind: ExportKind) -> Result<Vec<u8>> {
        self.api.download_export(kind).await
    }

    #[cfg(test)]
    async fn chart_is_live(&self, id: ChartId) -> bool {
        self.registry.lock().await.is_live(id)
    }

    #[cfg(test)]
    async fn chart_series(&self, id: ChartId) -> Option<crate::charts::ChartSeries> {
        self.registry.lock().await.current(id).cloned()
    }
}
