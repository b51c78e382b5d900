//! Options Dashboard - analytics front end for Cloudflare Workers
//!
//! Server-rendered dashboard over the options analytics REST backend.
//!
//! # Architecture
//! - Main entry point routes HTTP requests to tool handlers
//! - Session kept in two cookies, passed explicitly to the API client
//! - Backend client maps every call onto a uniform result envelope
//!
//! # Features
//! - Volatility and monthly strike bands
//! - Strategy simulation with daily PnL tables
//! - Transaction management
//! - Multi-month strike performance sweep
//! - Custom multi-leg strategy analysis with payoff diagram

#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)] // Page templates
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::if_not_else)] // Readability preference
#![allow(clippy::map_unwrap_or)] // Explicit error handling preference

mod client;
mod config;
mod dashboard;
mod error;
mod forms;
mod performance;
mod session;
mod types;

use chrono::NaiveDate;
use worker::{
    Context, Env, Headers, Method, Request, Response, Router, console_error, console_log, console_warn,
    event,
};

pub use client::{ApiClient, ApiRequest, ApiResponse, Endpoint};
pub use config::Config;
pub use error::DashboardError;
pub use session::Session;
pub use types::*;

use dashboard::{Flash, error_fragment, html, json_result, render};
use forms::{FormFields, LegOp, LegRow};

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    // Delete carries the id in the path; matched ahead of the router
    if req.method() == Method::Post {
        if let Some(id) = transaction_delete_id(&req.path()) {
            let Some(app) = App::load(&req, &env)? else {
                return redirect_home(&[]);
            };
            return app.delete_transaction(&id).await;
        }
    }

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard home or login
        .get_async("/", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.home().await,
                None => html_response(dashboard::login_page(None), &[]),
            }
        })
        .post_async("/login", |mut req, ctx| async move {
            let config = load_config(&ctx.env)?;
            let fields = FormFields::parse(&req.text().await?);
            login(&config, &fields).await
        })
        .post_async("/logout", |_req, ctx| async move {
            let config = load_config(&ctx.env)?;
            console_log!("Session closed");
            let flash = Flash::Notice("You have been logged out".to_string());
            html_response(
                dashboard::login_page(Some(&flash)),
                &Session::clear_cookie_headers(&config),
            )
        })
        // Volatility
        .get_async("/volatility", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.volatility(&FormFields::default(), false).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/volatility", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.volatility(&FormFields::parse(&req.text().await?), true).await,
                None => redirect_home(&[]),
            }
        })
        // Monthly volatility
        .get_async("/monthly-volatility", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.monthly_volatility(&FormFields::default(), false).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/monthly-volatility", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => {
                    app.monthly_volatility(&FormFields::parse(&req.text().await?), true)
                        .await
                }
                None => redirect_home(&[]),
            }
        })
        // Strategy simulation
        .get_async("/simulation", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.simulation(&FormFields::default(), false).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/simulation", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.simulation(&FormFields::parse(&req.text().await?), true).await,
                None => redirect_home(&[]),
            }
        })
        // Transactions
        .get_async("/transactions", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.transactions(&FormFields::default(), None).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/transactions", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.create_transaction(&FormFields::parse(&req.text().await?)).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/transactions/delete-all", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.delete_all_transactions().await,
                None => redirect_home(&[]),
            }
        })
        // Strike performance sweep
        .get_async("/strike-performance", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.strike_performance(&FormFields::default(), false).await,
                None => redirect_home(&[]),
            }
        })
        .post_async("/strike-performance", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => {
                    app.strike_performance(&FormFields::parse(&req.text().await?), true)
                        .await
                }
                None => redirect_home(&[]),
            }
        })
        // Custom strategy builder
        .get_async("/custom-strategy", |req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => {
                    let rows = vec![LegRow::with_defaults(&app.config, app.today)];
                    app.strategy_page(&rows, "")
                }
                None => redirect_home(&[]),
            }
        })
        .post_async("/custom-strategy", |mut req, ctx| async move {
            match App::load(&req, &ctx.env)? {
                Some(app) => app.custom_strategy(&FormFields::parse(&req.text().await?)).await,
                None => redirect_home(&[]),
            }
        })
        // Fallback
        .run(req, env)
        .await
}

/// Load configuration, logging when it is invalid
fn load_config(env: &Env) -> WResult<Config> {
    Config::from_env(env).map_err(|e| {
        console_error!("{}", e);
        e.into()
    })
}

/// Transaction id from `/transactions/{id}/delete`
fn transaction_delete_id(path: &str) -> Option<String> {
    let encoded = path
        .strip_prefix("/transactions/")?
        .strip_suffix("/delete")?;
    if encoded.is_empty() || encoded.contains('/') || encoded == "delete-all" {
        return None;
    }
    // Ids are form-encoded when the delete buttons are rendered
    url::form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(id, _)| id.into_owned())
        .filter(|id| !id.is_empty())
}

fn html_response(body: String, cookies: &[String]) -> WResult<Response> {
    let mut response = Response::from_html(body)?;
    for cookie in cookies {
        response.headers_mut().append("Set-Cookie", cookie)?;
    }
    Ok(response)
}

fn redirect_home(cookies: &[String]) -> WResult<Response> {
    let mut headers = Headers::new();
    headers.set("Location", "/")?;
    for cookie in cookies {
        headers.append("Set-Cookie", cookie)?;
    }
    Ok(Response::empty()?.with_status(303).with_headers(headers))
}

/// Log a failed backend call and render it inline
fn failure(action: &str, err: &DashboardError) -> String {
    if err.status() == 0 {
        console_warn!("{} failed: {}", action, err);
    } else {
        console_warn!("{} failed with status {}: {}", action, err.status(), err);
    }
    error_fragment(&err.to_string())
}

/// Authenticate, persist the session and return to the dashboard
async fn login(config: &Config, fields: &FormFields) -> WResult<Response> {
    let failed = |message: String| {
        let flash = Flash::Error(message);
        html_response(dashboard::login_page(Some(&flash)), &[])
    };

    let credentials = match forms::login_request(fields) {
        Ok(c) => c,
        Err(e) => return failed(e.to_string()),
    };

    let client = ApiClient::new(config, None);
    match client.login(&credentials).await {
        Ok(response) => match Session::from_login(&response) {
            Some(session) => {
                console_log!(
                    "Login succeeded for user {}",
                    session.user_id.as_deref().unwrap_or("unknown")
                );
                redirect_home(&session.set_cookie_headers(config))
            }
            None => {
                console_warn!("Login response carried no access token");
                failed("Login failed".to_string())
            }
        },
        Err(e) => {
            console_warn!("Login failed: {}", e);
            failed(e.to_string())
        }
    }
}

/// Per-request state of an authenticated user
struct App {
    config: Config,
    client: ApiClient,
    today: NaiveDate,
}

impl App {
    /// `None` when the request carries no session
    fn load(req: &Request, env: &Env) -> WResult<Option<Self>> {
        let config = load_config(env)?;
        let session = req
            .headers()
            .get("Cookie")?
            .and_then(|header| Session::from_cookie_header(&header));

        let Some(session) = session else {
            return Ok(None);
        };
        if config.is_debug() {
            console_log!("{:?} {}", req.method(), req.path());
        }

        Ok(Some(Self {
            client: ApiClient::new(&config, Some(session)),
            today: chrono::Utc::now().date_naive(),
            config,
        }))
    }

    fn page(&self, title: &str, flash: Option<&Flash>, body: &str) -> WResult<Response> {
        html_response(dashboard::page(title, true, flash, body), &[])
    }

    async fn transaction_list(&self) -> String {
        match self.client.active_transactions().await {
            Ok(items) => render::transactions_list(&TransactionBook::new(items)),
            Err(e) => {
                let message = format!("Failed to load transactions: {e}");
                failure("Loading transactions", &e);
                format!(r#"<div class="no-transactions">{}</div>"#, render::escape(&message))
            }
        }
    }

    async fn home(&self) -> WResult<Response> {
        let list = self.transaction_list().await;
        self.page("Dashboard", None, &html::home(&list))
    }

    async fn volatility(&self, fields: &FormFields, submitted: bool) -> WResult<Response> {
        let result = if !submitted {
            String::new()
        } else {
            match forms::volatility_request(fields) {
                Err(e) => error_fragment(&e.to_string()),
                Ok(payload) => match self.client.volatility(&payload).await {
                    Ok(data) => json_result(&data),
                    Err(e) => failure("Volatility", &e),
                },
            }
        };
        self.page("Volatility", None, &html::volatility_page(fields, self.today, &result))
    }

    async fn monthly_volatility(&self, fields: &FormFields, submitted: bool) -> WResult<Response> {
        let result = if !submitted {
            String::new()
        } else {
            match forms::monthly_query(fields) {
                Err(e) => error_fragment(&e.to_string()),
                Ok(q) => match self.client.monthly_volatility(&q.mm, &q.yy, &q.symbol).await {
                    Ok(vol) => render::volatility_card(&vol),
                    Err(e) => failure("Monthly volatility", &e),
                },
            }
        };
        self.page(
            "Monthly Volatility",
            None,
            &html::monthly_volatility_page(fields, &self.config, &result),
        )
    }

    async fn simulation(&self, fields: &FormFields, submitted: bool) -> WResult<Response> {
        let result = if !submitted {
            String::new()
        } else {
            match forms::simulation_symbol(fields) {
                Err(e) => error_fragment(&e.to_string()),
                Ok(symbol) => match self.client.simulation(&symbol).await {
                    Ok(data) => match serde_json::from_value::<SimulationRun>(data.clone()) {
                        Ok(run) if run.data.is_some() => render::pnl_section(run.data.as_ref()),
                        _ => json_result(&data),
                    },
                    Err(e) => failure("Simulation", &e),
                },
            }
        };
        self.page("Simulation", None, &html::simulation_page(fields, &self.config, &result))
    }

    async fn transactions(&self, fields: &FormFields, flash: Option<Flash>) -> WResult<Response> {
        let list = self.transaction_list().await;
        self.transactions_page(fields, flash.as_ref(), &list)
    }

    fn transactions_page(&self, fields: &FormFields, flash: Option<&Flash>, list: &str) -> WResult<Response> {
        self.page("Transactions", flash, &html::transactions_page(fields, self.today, list))
    }

    async fn create_transaction(&self, fields: &FormFields) -> WResult<Response> {
        let payload = match forms::new_transaction(fields) {
            Ok(p) => p,
            Err(e) => return self.transactions(fields, Some(Flash::Error(e.to_string()))).await,
        };

        match self.client.create_transaction(&payload).await {
            Ok(_) => {
                console_log!("Transaction created for {}", payload.symbol);
                let flash = Flash::Notice("Transaction created successfully".to_string());
                self.transactions(&FormFields::default(), Some(flash)).await
            }
            Err(e) => {
                failure("Creating transaction", &e);
                let flash = Flash::Error(format!("Failed to create transaction: {e}"));
                self.transactions(fields, Some(flash)).await
            }
        }
    }

    async fn delete_transaction(&self, transaction_id: &str) -> WResult<Response> {
        let listed = self.client.active_transactions().await;
        let deleted = self.client.delete_transaction(transaction_id).await;

        let flash = match &deleted {
            Ok(_) => {
                console_log!("Transaction {} deleted", transaction_id);
                Flash::Notice("Transaction deleted".to_string())
            }
            Err(e) => {
                failure("Deleting transaction", e);
                Flash::Error(format!("Failed to delete transaction: {e}"))
            }
        };

        let list = match listed {
            Ok(items) => {
                let mut book = TransactionBook::new(items);
                if deleted.is_ok() {
                    book.remove(transaction_id);
                }
                render::transactions_list(&book)
            }
            Err(e) => failure("Loading transactions", &e),
        };
        self.transactions_page(&FormFields::default(), Some(&flash), &list)
    }

    async fn delete_all_transactions(&self) -> WResult<Response> {
        match self.client.delete_all_transactions().await {
            Ok(_) => {
                console_log!("All transactions deleted");
                let flash = Flash::Notice("All transactions have been deleted successfully!".to_string());
                let list = render::transactions_list(&TransactionBook::default());
                self.transactions_page(&FormFields::default(), Some(&flash), &list)
            }
            Err(e) => {
                failure("Deleting all transactions", &e);
                let flash = Flash::Error(format!("Failed to delete all transactions: {e}"));
                self.transactions(&FormFields::default(), Some(flash)).await
            }
        }
    }

    async fn strike_performance(&self, fields: &FormFields, submitted: bool) -> WResult<Response> {
        let result = if !submitted {
            String::new()
        } else {
            match forms::sweep_request(fields, &self.config) {
                Err(e) => error_fragment(&e.to_string()),
                Ok(request) => {
                    let months = performance::sweep_months(request.end_date, request.months);
                    console_log!(
                        "Strike performance sweep: {} over {} months",
                        request.symbol,
                        months.len()
                    );
                    performance::run_sweep(&self.client, &request.symbol, &months)
                        .await
                        .iter()
                        .map(render::month_section)
                        .collect()
                }
            }
        };
        self.page(
            "Strike Performance",
            None,
            &html::strike_performance_page(fields, &self.config, self.today, &result),
        )
    }

    fn strategy_page(&self, rows: &[LegRow], result: &str) -> WResult<Response> {
        self.page("Custom Strategy", None, &html::strategy_page(rows, &self.config, result))
    }

    async fn custom_strategy(&self, fields: &FormFields) -> WResult<Response> {
        let mut rows = forms::parse_leg_rows(fields);
        let op = fields.get("op").and_then(LegOp::parse).unwrap_or(LegOp::Analyze);

        if op != LegOp::Analyze {
            forms::apply_leg_op(&mut rows, op, &self.config, self.today);
            return self.strategy_page(&rows, "");
        }

        let legs = match forms::collect_legs(&rows, &self.config.default_leg_symbol) {
            Ok(legs) => legs,
            Err(e) => return self.strategy_page(&rows, &error_fragment(&e.to_string())),
        };

        let result = match self.client.analyze_custom_strategy(&StrategyRequest { legs }).await {
            Ok(response) => {
                if let Some(analysis) = &response.data {
                    forms::write_back_premiums(&mut rows, &analysis.legs, &self.config.default_leg_symbol);
                }
                render::strategy_analysis(response.data.as_ref())
            }
            Err(e) => failure("Strategy analysis", &e),
        };
        self.strategy_page(&rows, &result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_delete_id() {
        assert_eq!(transaction_delete_id("/transactions/42/delete").as_deref(), Some("42"));
        assert_eq!(transaction_delete_id("/transactions/a%2Fb/delete").as_deref(), Some("a/b"));
        assert_eq!(transaction_delete_id("/transactions/delete-all"), None);
        assert_eq!(transaction_delete_id("/transactions//delete"), None);
        assert_eq!(transaction_delete_id("/transactions/1/2/delete"), None);
        assert_eq!(transaction_delete_id("/volatility"), None);
    }
}
