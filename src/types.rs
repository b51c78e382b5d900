//! Common types for the dashboard
//!
//! Wire shapes returned by the analytics backend plus the payloads we send.
//! The backend owns every entity; nothing here is authoritative.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Option contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Ce,
    Pe,
}

impl OptionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "CE" => Some(OptionType::Ce),
            "PE" => Some(OptionType::Pe),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Ce => write!(f, "CE"),
            OptionType::Pe => write!(f, "PE"),
        }
    }
}

/// Leg direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegAction {
    Buy,
    Sell,
}

impl LegAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "BUY" => Some(LegAction::Buy),
            "SELL" => Some(LegAction::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for LegAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegAction::Buy => write!(f, "BUY"),
            LegAction::Sell => write!(f, "SELL"),
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub data: Option<LoginUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
}

// ============================================================================
// Volatility
// ============================================================================

/// Payload for the multi-year volatility calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityRequest {
    pub symbol: String,
    pub end_date: String,
    pub years_of_data: u32,
    pub custom_multiplier: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multipliers: Option<Vec<f64>>,
}

/// Volatility of one target month with suggested strike bands
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyVolatility {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub target_month: Option<String>,
    #[serde(default)]
    pub volatility_metrics: VolatilityStats,
    #[serde(default)]
    pub strikes: StrikeSuggestions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolatilityStats {
    pub spot: Option<f64>,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub daily_volatility: Option<f64>,
    pub monthly_volatility: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrikeSuggestions {
    /// Bands keyed by range, e.g. `range_1.5sd`
    #[serde(default)]
    pub volatility_based_strikes: HashMap<String, StrikeBand>,
    #[serde(default)]
    pub spot_based_strikes: Option<StrikeBand>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrikeBand {
    pub lower_strike: Option<f64>,
    pub upper_strike: Option<f64>,
}

impl StrikeSuggestions {
    pub const PRIMARY_RANGE: &'static str = "range_1.5sd";

    pub fn primary_band(&self) -> Option<&StrikeBand> {
        self.volatility_based_strikes.get(Self::PRIMARY_RANGE)
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Result of a strategy simulation run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationRun {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<SimulationData>,
}

impl SimulationRun {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationData {
    #[serde(default)]
    pub positions: Vec<SimulatedPosition>,
    #[serde(default)]
    pub daily_pnl: Vec<DailyPnl>,
    #[serde(default)]
    pub total_realized_pnl: Option<f64>,
    #[serde(default)]
    pub strategy_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulatedPosition {
    #[serde(default)]
    pub strike: Option<f64>,
    #[serde(default)]
    pub option_type: Option<String>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub lots: Option<i64>,
}

impl SimulatedPosition {
    /// Column label such as `25600 CE`
    pub fn label(&self) -> String {
        let strike = self.strike.map(format_strike).unwrap_or_default();
        let option_type = self.option_type.clone().unwrap_or_default();
        format!("{strike} {option_type}").trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyPnl {
    pub date: String,
    #[serde(default)]
    pub unrealised: Vec<PnlEntry>,
    #[serde(default)]
    pub realised: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PnlEntry {
    #[serde(default)]
    pub pnl: Option<f64>,
}

impl DailyPnl {
    /// Unrealised PnL of the position at `index`, 0 when missing
    pub fn unrealised_at(&self, index: usize) -> f64 {
        self.unrealised.get(index).and_then(|e| e.pnl).unwrap_or(0.0)
    }
}

// ============================================================================
// Transactions
// ============================================================================

/// A transaction owned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    pub strike_price: f64,
    pub option_type: String,
    pub lots: i64,
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// Create payload for a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub symbol: String,
    pub instrument: String,
    pub strike_price: f64,
    pub option_type: OptionType,
    pub lots: i64,
    pub trade_date: String,
    pub expiry_date: String,
}

/// The active-transactions endpoint answers with or without an envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionList {
    Wrapped { data: Vec<Transaction> },
    Bare(Vec<Transaction>),
}

impl TransactionList {
    pub fn into_vec(self) -> Vec<Transaction> {
        match self {
            TransactionList::Wrapped { data } | TransactionList::Bare(data) => data,
        }
    }
}

/// Transient render cache of transactions for a single page view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionBook {
    items: Vec<Transaction>,
}

impl TransactionBook {
    pub fn new(items: Vec<Transaction>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Remove the entry with `transaction_id`, leaving the rest untouched
    pub fn remove(&mut self, transaction_id: &str) -> Option<Transaction> {
        let idx = self
            .items
            .iter()
            .position(|t| t.transaction_id == transaction_id)?;
        Some(self.items.remove(idx))
    }
}

// ============================================================================
// Custom strategy
// ============================================================================

/// One option contract within a multi-leg strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub symbol: String,
    /// `DD-Mon-YYYY`, e.g. `10-Jul-2025`
    pub expiry: String,
    pub strike: f64,
    pub option_type: OptionType,
    pub action: LegAction,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
}

impl StrategyLeg {
    /// Key used to match returned legs against submitted form rows
    pub fn match_key(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.symbol,
            self.expiry,
            format_strike(self.strike),
            self.option_type,
            self.action
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRequest {
    pub legs: Vec<StrategyLeg>,
}

/// Envelope around the analysis result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyAnalysisResponse {
    #[serde(default)]
    pub data: Option<StrategyAnalysis>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyAnalysis {
    #[serde(default)]
    pub strategy_name: Option<String>,
    #[serde(default)]
    pub breakeven_points: Vec<f64>,
    #[serde(default)]
    pub max_profit: Option<Bound>,
    #[serde(default)]
    pub max_loss: Option<Bound>,
    #[serde(default)]
    pub profit_zones: Vec<ProfitZone>,
    #[serde(default)]
    pub risk_reward_ratio: Option<Bound>,
    #[serde(default)]
    pub legs: Vec<StrategyLeg>,
    #[serde(default)]
    pub details: AnalysisDetails,
}

/// Max profit / loss: an amount or a label such as "Unlimited"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Amount(f64),
    Label(String),
}

/// Price range where the strategy is profitable; an open end is a label
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfitZone {
    #[serde(default)]
    pub between: Vec<Bound>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisDetails {
    #[serde(default)]
    pub payoff_curve: Option<PayoffCurve>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayoffCurve {
    #[serde(default)]
    pub prices: Vec<f64>,
    #[serde(default)]
    pub payoffs: Vec<f64>,
}

/// Strike as shown to users and in match keys: no trailing `.0`
pub fn format_strike(strike: f64) -> String {
    if strike.fract() == 0.0 {
        format!("{strike:.0}")
    } else {
        format!("{strike}")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
