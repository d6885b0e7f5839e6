pub mod client;
pub mod models;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::types::{
    BacktestParameters, BacktestResults, BacktestStrategy, MarketPeriod, MarketSnapshot,
    ProfileDraft, TradingProfile,
};

pub use client::BotApiClient;
pub use models::{
    Ack, ActiveSellOrders, AutoStatus, Balances, BotConfig, BotStats, CycleHistorySplit,
    DashboardData, ExportResult, GainsDistribution, MarketChart, PerformancePoint,
};

/// Which of the two exported files to fetch from `/download/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Json,
}

/// Everything the dashboard asks of the bot backend. The controller only
/// sees this trait, so tests can drive it with a canned stub instead of a
/// live HTTP server.
#[async_trait]
pub trait BotApi: Send + Sync {
    // Reads
    async fn dashboard_data(&self) -> Result<DashboardData>;
    async fn performance(&self) -> Result<Vec<PerformancePoint>>;
    async fn gains_distribution(&self) -> Result<GainsDistribution>;
    async fn cycle_history_split(&self) -> Result<CycleHistorySplit>;
    async fn active_sell_orders(&self) -> Result<ActiveSellOrders>;
    async fn auto_status(&self) -> Result<AutoStatus>;
    async fn market_data(&self) -> Result<MarketSnapshot>;
    async fn market_chart(&self, period: MarketPeriod) -> Result<MarketChart>;

    // Actions
    async fn run_backtest(
        &self,
        strategy: BacktestStrategy,
        initial_capital: Decimal,
    ) -> Result<(BacktestResults, Option<BacktestParameters>)>;
    async fn update_sell_order(&self, cycle_id: u64, new_sell_price: Decimal) -> Result<()>;
    async fn new_cycle(&self) -> Result<()>;
    async fn update_cycles(&self) -> Result<()>;
    async fn cancel_cycle(&self, cycle_id: u64) -> Result<()>;
    async fn sync_exchange(&self) -> Result<()>;
    async fn export(&self) -> Result<ExportResult>;
    async fn download_export(&self, kind: ExportKind) -> Result<Vec<u8>>;

    // Automation scheduler
    async fn auto_start(&self, interval_minutes: f64) -> Result<String>;
    async fn auto_stop(&self) -> Result<String>;
    async fn auto_configure(&self, interval_minutes: f64) -> Result<String>;

    // Configuration
    async fn get_config(&self) -> Result<BotConfig>;
    async fn update_config(&self, config: &BotConfig) -> Result<()>;

    // Profiles
    async fn profiles(&self) -> Result<Vec<TradingProfile>>;
    async fn create_profile(&self, draft: &ProfileDraft) -> Result<()>;
    async fn update_profile(&self, id: u64, draft: &ProfileDraft) -> Result<()>;
    async fn delete_profile(&self, id: u64) -> Result<()>;
    async fn apply_profile(&self, id: u64) -> Result<()>;
}
