//! HTTP access to the published snapshot set.
//!
//! Every read goes out fresh (the server marks the live-data prefix
//! no-cache); the commit endpoint is the cheap change probe, everything
//! else is only fetched when the commit moves.

use serde_json::Value;
use tokio::try_join;

use super::parser;
use super::types::{AppData, StrategyId, StrategySnapshot};

const STRATEGY_FILES: [(StrategyId, &str); 6] = [
    (StrategyId::PelosiTracker, "strat_one.json"),
    (StrategyId::NgSeasonal, "strat_two.json"),
    (StrategyId::NqTrend, "strat_three.json"),
    (StrategyId::SvxyVol, "strat_four.json"),
    (StrategyId::LinReg, "strat_five.json"),
    (StrategyId::GoldTrend, "strat_six.json"),
];

#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    base_url: String,
}

impl SnapshotClient {
    /// `base_url` is the daemon origin, e.g. `http://localhost:8080`;
    /// snapshot files live under its `/data/live/` prefix.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, file: &str) -> String {
        format!("{}/data/live/{}", self.base_url, file)
    }

    async fn get_text(&self, file: &str) -> Result<String, String> {
        let url = self.url(file);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch {}: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("{} returned {}", url, response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read {}: {}", url, e))
    }

    async fn get_json(&self, file: &str) -> Result<Value, String> {
        let url = self.url(file);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch {}: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("{} returned {}", url, response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse {}: {}", url, e))
    }

    async fn get_array(&self, file: &str) -> Result<Vec<Value>, String> {
        match self.get_json(file).await? {
            Value::Array(arr) => Ok(arr),
            other => Err(format!(
                "{} is not an array payload: {}",
                self.url(file),
                other
            )),
        }
    }

    /// Read the current commit version, a plain integer.
    pub async fn fetch_commit(&self) -> Result<i64, String> {
        let text = self.get_text("commit").await?;
        text.trim()
            .parse::<i64>()
            .map_err(|e| format!("Invalid commit value {:?}: {}", text.trim(), e))
    }

    /// Fetch and decode the full snapshot set in one parallel batch.
    ///
    /// Any required part failing fails the whole batch; the benchmark is
    /// best-effort and collapses to an empty series on any error, so a
    /// missing or malformed benchmark never blocks a refresh.
    pub async fn fetch_app_data(&self, commit: i64) -> Result<AppData, String> {
        let (state_arr, strat_arrs, equity_arr, strat_eq_value, events_text, benchmark) = try_join!(
            self.get_array("state.json"),
            self.fetch_strategy_arrays(),
            self.get_array("equity.json"),
            self.get_json("equity_strats.json"),
            self.get_text("events.log"),
            self.fetch_benchmark(),
        )?;

        let strategies: Vec<StrategySnapshot> = STRATEGY_FILES
            .iter()
            .zip(strat_arrs.iter())
            .map(|(&(id, _), arr)| parser::parse_strategy(id, arr))
            .collect();

        Ok(AppData {
            state: parser::parse_state(&state_arr),
            strategies,
            equity: parser::parse_series(&equity_arr),
            strat_equities: parser::parse_strat_equities(&strat_eq_value),
            events: parser::parse_events(&events_text),
            benchmark,
            commit,
        })
    }

    async fn fetch_strategy_arrays(&self) -> Result<Vec<Vec<Value>>, String> {
        let fetches = STRATEGY_FILES.iter().map(|&(_, file)| self.get_array(file));
        let results = futures::future::join_all(fetches).await;
        results.into_iter().collect()
    }

    /// Errors (network, status, parse) all collapse to an empty series;
    /// a broken benchmark is indistinguishable from an absent one.
    async fn fetch_benchmark(&self) -> Result<Vec<f64>, String> {
        match self.get_array("benchmark.json").await {
            Ok(arr) => Ok(parser::parse_series(&arr)),
            Err(e) => {
                tracing::debug!("Benchmark unavailable, continuing without it: {}", e);
                Ok(Vec::new())
            }
        }
    }
}
