//! Analytics backend API client
//!
//! Implements the backend REST surface for:
//! - Login
//! - Volatility (multi-year and per month)
//! - Strategy simulation (by symbol and per month)
//! - Transactions (list, create, delete one, delete all)
//! - Custom multi-leg strategy analysis
//!
//! Every call resolves to a uniform `ApiResponse` envelope. No retries,
//! no backoff, no caching.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::session::Session;
use crate::types::{
    LoginRequest, LoginResponse, MonthlyVolatility, NewTransaction, SimulationRun,
    StrategyAnalysisResponse, StrategyRequest, Transaction, TransactionList, VolatilityRequest,
};

/// Error text for non-2xx responses without a `detail` field
pub const FALLBACK_ERROR: &str = "API Error";

/// Error text for transport and parse failures
pub const NETWORK_ERROR: &str = "Network error";

const USER_ID_HEADER: &str = "request-user-id";

/// Backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Volatility,
    MonthlyVolatility { mm: String, yy: String, symbol: String },
    Simulation { symbol: String },
    MonthlySimulation { mm: String, yy: String },
    ActiveTransactions,
    CreateTransaction,
    DeleteTransaction { id: String },
    DeleteAllTransactions,
    AnalyzeCustomStrategy,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login
            | Endpoint::Volatility
            | Endpoint::CreateTransaction
            | Endpoint::AnalyzeCustomStrategy => Method::POST,
            Endpoint::DeleteTransaction { .. } | Endpoint::DeleteAllTransactions => Method::DELETE,
            Endpoint::MonthlyVolatility { .. }
            | Endpoint::Simulation { .. }
            | Endpoint::MonthlySimulation { .. }
            | Endpoint::ActiveTransactions => Method::GET,
        }
    }

    /// Path segments after the base URL, unencoded
    fn segments(&self) -> Vec<&str> {
        let mut segments = vec!["api", "v1_0"];
        match self {
            Endpoint::Login => segments.push("user_login"),
            Endpoint::Volatility => segments.extend(["fyres", "volatility"]),
            Endpoint::MonthlyVolatility { mm, yy, symbol } => {
                segments.extend(["fyres", "volatility_of_month", mm.as_str(), yy.as_str(), symbol.as_str()]);
            }
            Endpoint::Simulation { .. } => segments.extend(["strategy", "simulation"]),
            Endpoint::MonthlySimulation { mm, yy } => {
                segments.extend(["strategy", "monthly_volatility_simulation", mm.as_str(), yy.as_str()]);
            }
            Endpoint::ActiveTransactions => segments.push("get_active_transactions"),
            // Backend path is spelled this way
            Endpoint::CreateTransaction => segments.push("create_transection"),
            Endpoint::DeleteTransaction { id } => segments.extend(["delete_transaction", id.as_str()]),
            Endpoint::DeleteAllTransactions => segments.push("delete_user_transactions"),
            Endpoint::AnalyzeCustomStrategy => segments.push("analyze_custom_strategy"),
        }
        segments
    }

    /// Whether the backend expects the `request-user-id` header
    pub fn requires_user_id(&self) -> bool {
        matches!(
            self,
            Endpoint::ActiveTransactions
                | Endpoint::CreateTransaction
                | Endpoint::DeleteTransaction { .. }
                | Endpoint::DeleteAllTransactions
        )
    }

    /// Full URL with percent-encoded segments and query
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|()| DashboardError::Config(format!("API base URL cannot take a path: {base_url}")))?
            .pop_if_empty()
            .extend(self.segments());

        if let Endpoint::Simulation { symbol } = self {
            url.query_pairs_mut().append_pair("symbol", symbol);
        }
        Ok(url)
    }
}

/// A request before session headers are applied
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON body
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach an extra header, overriding a default of the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Final header list for this request under `session`
    pub fn build_headers(&self, session: Option<&Session>) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        if let Some(session) = session {
            headers.push(("Authorization".to_string(), format!("Bearer {}", session.access_token)));
            if self.endpoint.requires_user_id() {
                if let Some(user_id) = &session.user_id {
                    headers.push((USER_ID_HEADER.to_string(), user_id.clone()));
                }
            }
        }

        for (name, value) in &self.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }
}

/// Uniform result envelope over backend calls
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Success { status: u16, data: Value },
    Failure { status: u16, error: String },
}

impl ApiResponse {
    /// Map a received status and body onto the envelope
    pub fn from_parts(status: u16, body: &str) -> Self {
        let parsed = if body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(body)
        };

        if (200..300).contains(&status) {
            return match parsed {
                Ok(data) => ApiResponse::Success { status, data },
                Err(_) => Self::network_error(),
            };
        }

        let error = parsed
            .ok()
            .as_ref()
            .and_then(detail_message)
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        ApiResponse::Failure { status, error }
    }

    pub fn network_error() -> Self {
        ApiResponse::Failure {
            status: 0,
            error: NETWORK_ERROR.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Success { status, .. } | ApiResponse::Failure { status, .. } => *status,
        }
    }

    /// Unwrap into the parsed body or the matching error
    pub fn into_result(self) -> Result<Value> {
        match self {
            ApiResponse::Success { data, .. } => Ok(data),
            ApiResponse::Failure { status: 0, .. } => Err(DashboardError::Network),
            ApiResponse::Failure { status, error } => Err(DashboardError::Api { status, message: error }),
        }
    }

    /// Unwrap and decode into a typed body
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let data = self.into_result()?;
        serde_json::from_value(data).map_err(|e| DashboardError::Decode(e.to_string()))
    }
}

/// Backend `detail`, skipping empty or falsy values
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Analytics backend client bound to one session
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    /// Create new client; `session` is `None` before login
    pub fn new(config: &Config, session: Option<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Issue a request and map the outcome onto the envelope
    pub async fn call(&self, request: ApiRequest) -> ApiResponse {
        let Ok(url) = request.endpoint.url(&self.base_url) else {
            return ApiResponse::network_error();
        };

        let mut builder = self.http.request(request.endpoint.method(), url);
        for (name, value) in request.build_headers(self.session.as_ref()) {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(_) => return ApiResponse::network_error(),
        };
        let status = response.status().as_u16();

        match response.text().await {
            Ok(text) => ApiResponse::from_parts(status, &text),
            Err(_) => ApiResponse::network_error(),
        }
    }

    /// Authenticate with username and password
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let request = ApiRequest::new(Endpoint::Login).json(credentials)?;
        self.call(request).await.decode()
    }

    /// Volatility over `years_of_data` up to `end_date`
    pub async fn volatility(&self, payload: &VolatilityRequest) -> Result<Value> {
        let request = ApiRequest::new(Endpoint::Volatility).json(payload)?;
        self.call(request).await.into_result()
    }

    /// Volatility and strike bands for one month
    pub async fn monthly_volatility(&self, mm: &str, yy: &str, symbol: &str) -> Result<MonthlyVolatility> {
        let endpoint = Endpoint::MonthlyVolatility {
            mm: mm.to_string(),
            yy: yy.to_string(),
            symbol: symbol.to_string(),
        };
        self.call(ApiRequest::new(endpoint)).await.decode()
    }

    /// Strategy simulation for a symbol
    pub async fn simulation(&self, symbol: &str) -> Result<Value> {
        let endpoint = Endpoint::Simulation { symbol: symbol.to_string() };
        self.call(ApiRequest::new(endpoint)).await.into_result()
    }

    /// Monthly volatility strategy simulation
    pub async fn monthly_simulation(&self, mm: &str, yy: &str) -> Result<SimulationRun> {
        let endpoint = Endpoint::MonthlySimulation {
            mm: mm.to_string(),
            yy: yy.to_string(),
        };
        self.call(ApiRequest::new(endpoint)).await.decode()
    }

    /// Active transactions of the session user
    pub async fn active_transactions(&self) -> Result<Vec<Transaction>> {
        self.require_user_id()?;
        let list: TransactionList = self
            .call(ApiRequest::new(Endpoint::ActiveTransactions))
            .await
            .decode()?;
        Ok(list.into_vec())
    }

    pub async fn create_transaction(&self, payload: &NewTransaction) -> Result<Value> {
        self.require_user_id()?;
        let request = ApiRequest::new(Endpoint::CreateTransaction).json(payload)?;
        self.call(request).await.into_result()
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<Value> {
        self.require_user_id()?;
        let endpoint = Endpoint::DeleteTransaction { id: transaction_id.to_string() };
        self.call(ApiRequest::new(endpoint)).await.into_result()
    }

    pub async fn delete_all_transactions(&self) -> Result<Value> {
        self.require_user_id()?;
        self.call(ApiRequest::new(Endpoint::DeleteAllTransactions))
            .await
            .into_result()
    }

    /// Breakevens, max profit/loss and payoff curve for a set of legs
    pub async fn analyze_custom_strategy(&self, payload: &StrategyRequest) -> Result<StrategyAnalysisResponse> {
        let request = ApiRequest::new(Endpoint::AnalyzeCustomStrategy).json(payload)?;
        self.call(request).await.decode()
    }

    fn require_user_id(&self) -> Result<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.user_id.as_deref())
            .ok_or_else(|| DashboardError::Validation("User ID not found".into()))
    }
}
