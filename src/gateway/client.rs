use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::types::{
    BacktestParameters, BacktestResults, BacktestStrategy, MarketPeriod, MarketSnapshot,
    ProfileDraft, TradingProfile,
};

use super::models::{
    Ack, ActiveSellOrders, AutoStatus, BacktestResponse, BotConfig, CycleHistorySplit,
    DashboardData, ExportResult, GainsDistribution, MarketChart, PerformancePoint,
};
use super::{BotApi, ExportKind};

/// reqwest-backed gateway to the bot backend. One instance is shared across
/// the controller and every timer task; `Client` is internally pooled.
#[derive(Debug, Clone)]
pub struct BotApiClient {
    client: Client,
    base_url: String,
}

impl BotApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.client.get(&url).send().await?;
        Ok(resp.json().await?)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let mut req = self.client.post(&url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await?;
        Ok(resp.json().await?)
    }

    /// Application-level failure check for the `{success, …}` envelope.
    fn ensure_ok(ack: Ack) -> Result<Ack> {
        if ack.success {
            Ok(ack)
        } else {
            Err(DashboardError::Api(ack.failure_message()))
        }
    }
}

#[async_trait]
impl BotApi for BotApiClient {
    async fn dashboard_data(&self) -> Result<DashboardData> {
        self.get_json("/api/data").await
    }

    async fn performance(&self) -> Result<Vec<PerformancePoint>> {
        self.get_json("/api/performance").await
    }

    async fn gains_distribution(&self) -> Result<GainsDistribution> {
        self.get_json("/api/gains-distribution").await
    }

    async fn cycle_history_split(&self) -> Result<CycleHistorySplit> {
        self.get_json("/api/active-cycles-history-split").await
    }

    async fn active_sell_orders(&self) -> Result<ActiveSellOrders> {
        let resp: ActiveSellOrders = self.get_json("/api/active-sell-orders").await?;
        if !resp.success {
            return Err(DashboardError::Api(
                resp.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(resp)
    }

    async fn auto_status(&self) -> Result<AutoStatus> {
        self.get_json("/api/auto-status").await
    }

    async fn market_data(&self) -> Result<MarketSnapshot> {
        let resp: super::models::MarketDataResponse = self.get_json("/api/market-data").await?;
        if !resp.success {
            return Err(DashboardError::Api(
                resp.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(resp.snapshot)
    }

    async fn market_chart(&self, period: MarketPeriod) -> Result<MarketChart> {
        let chart: MarketChart = self
            .get_json(&format!("/api/market-chart?period={}", period.as_str()))
            .await?;
        if !chart.success {
            return Err(DashboardError::Api(
                chart.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(chart)
    }

    async fn run_backtest(
        &self,
        strategy: BacktestStrategy,
        initial_capital: Decimal,
    ) -> Result<(BacktestResults, Option<BacktestParameters>)> {
        let resp: BacktestResponse = self
            .post_json(
                "/api/backtest",
                Some(json!({
                    "strategy": strategy.as_str(),
                    "initial_capital": initial_capital,
                })),
            )
            .await?;
        if !resp.success {
            return Err(DashboardError::Api(
                resp.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let results = resp.results.ok_or_else(|| {
            DashboardError::InvalidResponse("backtest succeeded without results".to_string())
        })?;
        Ok((results, resp.parameters))
    }

    async fn update_sell_order(&self, cycle_id: u64, new_sell_price: Decimal) -> Result<()> {
        let ack: Ack = self
            .post_json(
                "/api/update-sell-order",
                Some(json!({
                    "cycle_id": cycle_id,
                    "new_sell_price": new_sell_price,
                })),
            )
            .await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn new_cycle(&self) -> Result<()> {
        let ack: Ack = self.post_json("/api/new-cycle", None).await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn update_cycles(&self) -> Result<()> {
        let ack: Ack = self.post_json("/api/update-cycles", None).await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn cancel_cycle(&self, cycle_id: u64) -> Result<()> {
        let ack: Ack = self
            .post_json("/api/cancel-cycle", Some(json!({ "cycle_id": cycle_id })))
            .await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn sync_exchange(&self) -> Result<()> {
        let ack: Ack = self.post_json("/api/sync-mexc", None).await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn export(&self) -> Result<ExportResult> {
        let result: ExportResult = self.post_json("/api/export", None).await?;
        if !result.success {
            return Err(DashboardError::Api(
                result.error.clone().unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(result)
    }

    async fn download_export(&self, kind: ExportKind) -> Result<Vec<u8>> {
        let path = match kind {
            ExportKind::Csv => "/download/csv",
            ExportKind::Json => "/download/json",
        };
        let resp = self.client.get(self.url(path)).send().await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn auto_start(&self, interval_minutes: f64) -> Result<String> {
        let ack: Ack = self
            .post_json(
                "/api/auto-start",
                Some(json!({ "interval_minutes": interval_minutes })),
            )
            .await?;
        let ack = Self::ensure_ok(ack)?;
        Ok(ack.message.unwrap_or_default())
    }

    async fn auto_stop(&self) -> Result<String> {
        let ack: Ack = self.post_json("/api/auto-stop", None).await?;
        let ack = Self::ensure_ok(ack)?;
        Ok(ack.message.unwrap_or_default())
    }

    async fn auto_configure(&self, interval_minutes: f64) -> Result<String> {
        let ack: Ack = self
            .post_json(
                "/api/auto-config",
                Some(json!({ "interval_minutes": interval_minutes })),
            )
            .await?;
        let ack = Self::ensure_ok(ack)?;
        Ok(ack.message.unwrap_or_default())
    }

    async fn get_config(&self) -> Result<BotConfig> {
        self.get_json("/api/get-config").await
    }

    async fn update_config(&self, config: &BotConfig) -> Result<()> {
        let ack: Ack = self
            .post_json("/api/update-config", Some(serde_json::to_value(config).map_err(
                |e| DashboardError::InvalidResponse(e.to_string()),
            )?))
            .await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn profiles(&self) -> Result<Vec<TradingProfile>> {
        self.get_json("/api/profiles").await
    }

    async fn create_profile(&self, draft: &ProfileDraft) -> Result<()> {
        let ack: Ack = self
            .post_json(
                "/api/profiles",
                Some(serde_json::to_value(draft).map_err(|e| {
                    DashboardError::InvalidResponse(e.to_string())
                })?),
            )
            .await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn update_profile(&self, id: u64, draft: &ProfileDraft) -> Result<()> {
        let url = self.url(&format!("/api/profiles/{}", id));
        let resp = self.client.put(&url).json(draft).send().await?;
        let ack: Ack = resp.json().await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn delete_profile(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("/api/profiles/{}", id));
        let resp = self.client.delete(&url).send().await?;
        let ack: Ack = resp.json().await?;
        Self::ensure_ok(ack).map(|_| ())
    }

    async fn apply_profile(&self, id: u64) -> Result<()> {
        let ack: Ack = self
            .post_json(&format!("/api/profiles/{}/apply", id), None)
            .await?;
        Self::ensure_ok(ack).map(|_| ())
    }
}
