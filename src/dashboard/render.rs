//! HTML fragments for backend results
//!
//! Pure functions from typed responses to HTML strings. Backend text is
//! always escaped before it is interpolated.

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::performance::MonthOutcome;
use crate::types::{
    Bound, MonthlyVolatility, ProfitZone, SimulationData, StrategyAnalysis, StrikeBand, Transaction,
    TransactionBook, format_strike,
};

use super::chart;

pub const NO_PNL_DATA: &str = "No PnL data available";
pub const PNL_NOT_AVAILABLE: &str = "PnL data not available";
pub const NO_TRANSACTIONS: &str =
    "No transactions found. Create your first transaction using the Transactions API!";
pub const INVALID_ANALYSIS: &str = "Invalid response format";
const DEFAULT_STRATEGY: &str = "Monthly Volatility";

// ============================================================================
// Formatting Utilities
// ============================================================================

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Thousands separators, at most two decimals, trailing zeros dropped
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    let sign = if rounded < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// Rupee amount, e.g. `₹123,456.5`
pub fn format_currency(value: f64) -> String {
    format!("₹{}", format_number(value))
}

fn pnl_class(value: f64) -> &'static str {
    if value > 0.0 {
        "profit"
    } else if value < 0.0 {
        "loss"
    } else {
        "neutral"
    }
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

fn strike_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_strike)
}

/// ISO days and the simulation's `DD-Mon-YYYY`, ignoring any time suffix
fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    [("%Y-%m-%d", 10), ("%d-%b-%Y", 11)].iter().find_map(|&(format, len)| {
        let day = text.get(..len).unwrap_or(text);
        NaiveDate::parse_from_str(day, format).ok()
    })
}

/// `DD-MM` label of a PnL day, raw text when unparseable
fn day_label(text: &str) -> String {
    parse_day(text).map_or_else(|| text.to_string(), |d| d.format("%d-%m").to_string())
}

/// `Mon D, YYYY`, `N/A` when empty, raw text when unparseable
pub fn format_transaction_date(text: Option<&str>) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => "N/A".to_string(),
        Some(raw) => parse_day(raw).map_or_else(|| raw.to_string(), |d| d.format("%b %-d, %Y").to_string()),
    }
}

// ============================================================================
// Generic fragments
// ============================================================================

pub fn error_fragment(message: &str) -> String {
    format!(r#"<span class="error">{}</span>"#, escape(message))
}

pub fn notice_fragment(message: &str) -> String {
    format!(r#"<div class="notice">{}</div>"#, escape(message))
}

/// Pretty-printed JSON for responses without a dedicated view
pub fn json_result(data: &Value) -> String {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    format!("<pre>{}</pre>", escape(&pretty))
}

// ============================================================================
// Volatility
// ============================================================================

fn band_row(label: &str, band: Option<&StrikeBand>, lower: &str, upper: &str) -> String {
    let lower_strike = strike_or_dash(band.and_then(|b| b.lower_strike));
    let upper_strike = strike_or_dash(band.and_then(|b| b.upper_strike));
    format!(
        r#"<div class="strike-row">
                <div class="strike-label">{label}</div>
                <div>{lower}: <b>{lower_strike}</b>, {upper}: <b>{upper_strike}</b></div>
            </div>"#
    )
}

/// Card body for one month's volatility; `extra` is appended inside the card
fn volatility_card_with(vol: &MonthlyVolatility, extra: &str) -> String {
    let symbol = escape(vol.symbol.as_deref().unwrap_or_default());
    let target_month = escape(vol.target_month.as_deref().unwrap_or_default());
    let m = &vol.volatility_metrics;
    let spot = m.spot.map(format_strike).unwrap_or_default();

    let volatility_band = band_row(
        "Volatility Range 1.5sd",
        vol.strikes.primary_band(),
        "Lower SELL PE",
        "Upper SELL CE",
    );
    let spot_band = band_row(
        "Spot Based",
        vol.strikes.spot_based_strikes.as_ref(),
        "Lower BUY PE",
        "Upper BUY CE",
    );

    format!(
        r#"<div class="strike-card">
        <div class="strike-card-header">
            <span>Symbol: <b>{symbol}</b></span>
            <span>Target Month: <b>{target_month}</b></span>
            <span>Spot: <b>{spot}</b></span>
        </div>
        <div class="strike-card-body">
            <div class="strike-card-section metrics">
                <div class="section-title">Volatility Metrics</div>
                <div class="metric-row"><span>mean</span><span>{mean}</span></div>
                <div class="metric-row"><span>variance</span><span>{variance}</span></div>
                <div class="metric-row"><span>daily_volatility</span><span>{daily}</span></div>
                <div class="metric-row"><span>monthly_volatility</span><span>{monthly}</span></div>
            </div>
            <div class="strike-card-section strikes">
                <div class="section-title">Strikes</div>
                {volatility_band}
                {spot_band}
            </div>
        </div>
        {extra}
    </div>"#,
        mean = metric(m.mean),
        variance = metric(m.variance),
        daily = metric(m.daily_volatility),
        monthly = metric(m.monthly_volatility),
    )
}

pub fn volatility_card(vol: &MonthlyVolatility) -> String {
    volatility_card_with(vol, "")
}

/// One month of a strike performance sweep
pub fn month_section(outcome: &MonthOutcome) -> String {
    let header = format!(r#"<div class="date-header">{}</div>"#, outcome.month.label());

    match &outcome.volatility {
        Err(e) => format!("{header}{}", error_fragment(&e.to_string())),
        Ok(vol) => {
            let pnl = match outcome.successful_simulation() {
                Some(run) => pnl_section(run.data.as_ref()),
                None => unavailable_section("PnL Data", PNL_NOT_AVAILABLE),
            };
            format!("{header}{}", volatility_card_with(vol, &pnl))
        }
    }
}

fn unavailable_section(title: &str, message: &str) -> String {
    format!(
        r#"<div class="strike-card-section">
        <div class="section-title">{title}</div>
        <div class="empty-state">{}</div>
    </div>"#,
        error_fragment(message)
    )
}

// ============================================================================
// PnL
// ============================================================================

/// Per-day totals across positions, with the first day holding the maximum
#[derive(Debug, Clone, PartialEq)]
pub struct PnlSummary {
    pub daily_totals: Vec<f64>,
    pub max_index: usize,
    pub max_pnl: f64,
    pub max_date: String,
    pub final_pnl: Vec<f64>,
}

impl PnlSummary {
    /// `None` when there are no days to summarise
    pub fn from_data(data: &SimulationData) -> Option<Self> {
        let last = data.daily_pnl.last()?;
        let positions = data.positions.len();

        let daily_totals: Vec<f64> = data
            .daily_pnl
            .iter()
            .map(|day| (0..positions).map(|i| day.unrealised_at(i)).sum())
            .collect();

        let mut max_index = 0;
        for (i, total) in daily_totals.iter().enumerate() {
            if *total > daily_totals[max_index] {
                max_index = i;
            }
        }

        Some(Self {
            max_pnl: daily_totals[max_index],
            max_date: day_label(&data.daily_pnl[max_index].date),
            final_pnl: (0..positions).map(|i| last.unrealised_at(i)).collect(),
            daily_totals,
            max_index,
        })
    }
}

fn status_icon(pnl: f64) -> &'static str {
    if pnl > 0.0 {
        "🚀"
    } else if pnl < 0.0 {
        "📉"
    } else {
        "⚡"
    }
}

/// PnL overview, position summary and collapsible daily table
pub fn pnl_section(data: Option<&SimulationData>) -> String {
    let Some((data, summary)) = data.and_then(|d| Some((d, PnlSummary::from_data(d)?))) else {
        return unavailable_section("📊 PnL Summary", NO_PNL_DATA);
    };

    let strategy = escape(data.strategy_type.as_deref().unwrap_or(DEFAULT_STRATEGY));
    let realised = data.total_realized_pnl.unwrap_or(0.0);
    let days = data.daily_pnl.len();

    let positions: String = data
        .positions
        .iter()
        .zip(&summary.final_pnl)
        .map(|(pos, final_pnl)| {
            format!(
                r#"<div class="position-summary-row">
                <div class="position-strike"><span>{icon}</span> <strong>{label}</strong></div>
                <div class="position-price-qty">
                    <span class="entry-price">{entry}</span>
                    <span class="position-details">Qty: {lots}</span>
                </div>
            </div>"#,
                icon = status_icon(*final_pnl),
                label = escape(&pos.label()),
                entry = format_currency(pos.entry_price.unwrap_or(0.0)),
                lots = pos.lots.unwrap_or(0),
            )
        })
        .collect();

    let headers: String = data
        .positions
        .iter()
        .map(|pos| format!("<th>{}</th>", escape(&pos.label())))
        .collect();

    let rows: String = data
        .daily_pnl
        .iter()
        .zip(&summary.daily_totals)
        .enumerate()
        .map(|(i, (day, total))| {
            let cells: String = (0..data.positions.len())
                .map(|p| {
                    let pnl = day.unrealised_at(p);
                    format!(r#"<td class="pnl-{}">{}</td>"#, pnl_class(pnl), format_currency(pnl))
                })
                .collect();
            let row_class = if i == summary.max_index { "max-pnl-row" } else { "" };
            format!(
                r#"<tr class="{row_class}"><td class="date-cell">{date}</td>{cells}<td class="pnl-{class} total-pnl"><strong>{total}</strong></td></tr>"#,
                date = escape(&day_label(&day.date)),
                class = pnl_class(*total),
                total = format_currency(*total),
            )
        })
        .collect();

    let table_id = format!("detailed-table-{}", Uuid::new_v4().simple());
    let max_class = if summary.max_pnl >= 0.0 { "profit" } else { "loss" };

    format!(
        r#"<div class="strike-card-section">
        <div class="section-title">📊 PnL Summary</div>
        <div class="pnl-overview">
            <div class="pnl-metric">
                <span class="pnl-label">🏆 Max PnL</span>
                <span class="pnl-value {max_class}">{max_pnl}</span>
                <span class="pnl-date">📅 {max_date}</span>
            </div>
            <div class="pnl-metric">
                <span class="pnl-label">🎯 Strategy</span>
                <span class="pnl-value">{strategy}</span>
            </div>
            <div class="pnl-metric">
                <span class="pnl-label">📅 Days</span>
                <span class="pnl-value">{days}</span>
            </div>
            <div class="pnl-metric">
                <span class="pnl-label">💰 Realised</span>
                <span class="pnl-value {realised_class}">{realised}</span>
            </div>
        </div>
        <div class="position-summary">
            <h4>📋 Position Summary</h4>
            {positions}
        </div>
        <button type="button" class="expand-details-btn" onclick="toggleDetailedTable('{table_id}')">
            <span id="btn-text-{table_id}">📊 Expand Daily Details</span>
            <span class="expand-icon" id="icon-{table_id}">▼</span>
        </button>
        <div class="detailed-table-container" id="{table_id}" style="display: none;">
            <table class="detailed-pnl-table">
                <thead><tr><th>📅 Date</th>{headers}<th>💰 Total PnL</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    </div>"#,
        max_pnl = format_currency(summary.max_pnl),
        max_date = escape(&summary.max_date),
        realised_class = pnl_class(realised),
        realised = format_currency(realised),
    )
}

// ============================================================================
// Transactions
// ============================================================================

fn transaction_item(tx: &Transaction) -> String {
    let id = escape(&tx.transaction_id);
    let option_type = escape(&tx.option_type);
    format!(
        r#"<div class="transaction-item" data-transaction-id="{id}">
        <div class="transaction-details">
            <div class="transaction-field"><div class="label">Symbol</div><div class="value symbol">{symbol}</div></div>
            <div class="transaction-field"><div class="label">Instrument</div><div class="value">{instrument}</div></div>
            <div class="transaction-field"><div class="label">Strike Price</div><div class="value">₹{strike}</div></div>
            <div class="transaction-field"><div class="label">Option Type</div><div class="value option-type {option_type}">{option_type}</div></div>
            <div class="transaction-field"><div class="label">Lots</div><div class="value">{lots}</div></div>
            <div class="transaction-field"><div class="label">Trade Date</div><div class="value">{trade_date}</div></div>
            <div class="transaction-field"><div class="label">Expiry Date</div><div class="value">{expiry_date}</div></div>
        </div>
        <form method="post" action="/transactions/{path_id}/delete" data-confirm="Are you sure you want to delete this transaction?">
            <button type="submit" class="delete-btn">Delete</button>
        </form>
    </div>"#,
        symbol = escape(tx.symbol.as_deref().unwrap_or("N/A")),
        instrument = escape(tx.instrument.as_deref().unwrap_or("N/A")),
        strike = format_strike(tx.strike_price),
        lots = tx.lots,
        trade_date = escape(&format_transaction_date(tx.trade_date.as_deref())),
        expiry_date = escape(&format_transaction_date(tx.expiry_date.as_deref())),
        path_id = escape(&url::form_urlencoded::byte_serialize(tx.transaction_id.as_bytes()).collect::<String>()),
    )
}

/// Active transactions, or the empty-state message
pub fn transactions_list(book: &TransactionBook) -> String {
    if book.is_empty() {
        return format!(r#"<div class="no-transactions">{NO_TRANSACTIONS}</div>"#);
    }
    book.items().iter().map(transaction_item).collect()
}

// ============================================================================
// Strategy analysis
// ============================================================================

fn bound_text(bound: Option<&Bound>) -> String {
    match bound {
        Some(Bound::Amount(v)) => format_currency(*v),
        Some(Bound::Label(label)) => escape(label),
        None => "-".to_string(),
    }
}

fn metric_row(label: &str, value: &str) -> String {
    format!(r#"<div class="metric-row"><span>{label}</span><span>{value}</span></div>"#)
}

/// `₹25,400 to ₹25,800`; open ends keep their label
fn zone_text(zone: &ProfitZone) -> String {
    zone.between
        .iter()
        .map(|bound| bound_text(Some(bound)))
        .collect::<Vec<_>>()
        .join(" to ")
}

/// Breakevens, bounds, legs and payoff chart of an analysis
pub fn strategy_analysis(analysis: Option<&StrategyAnalysis>) -> String {
    let Some(analysis) = analysis else {
        return format!(r#"<div class="error">{INVALID_ANALYSIS}</div>"#);
    };

    let breakevens = if analysis.breakeven_points.is_empty() {
        "None".to_string()
    } else {
        analysis
            .breakeven_points
            .iter()
            .map(|bp| format_currency(*bp))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let name = analysis
        .strategy_name
        .as_deref()
        .map(|n| format!("<h4>{}</h4>", escape(n)))
        .unwrap_or_default();

    let risk_reward = match &analysis.risk_reward_ratio {
        Some(Bound::Amount(r)) => metric_row("Risk / Reward", &format_number(*r)),
        Some(Bound::Label(label)) => metric_row("Risk / Reward", &escape(label)),
        None => String::new(),
    };

    let profit_zones = if analysis.profit_zones.is_empty() {
        String::new()
    } else {
        let zones = analysis
            .profit_zones
            .iter()
            .map(zone_text)
            .collect::<Vec<_>>()
            .join(", ");
        metric_row("Profit Zones", &zones)
    };

    let legs: String = analysis
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| {
            format!(
                "<tr><td>Leg {n}</td><td>{symbol}</td><td>{strike}</td><td>{option_type}</td><td>{action}</td><td>{quantity}</td><td>{premium}</td></tr>",
                n = i + 1,
                symbol = escape(&leg.symbol),
                strike = format_strike(leg.strike),
                option_type = leg.option_type,
                action = leg.action,
                quantity = leg.quantity,
                premium = format_currency(leg.premium.unwrap_or(0.0)),
            )
        })
        .collect();

    let chart = analysis
        .details
        .payoff_curve
        .as_ref()
        .map(|curve| chart::payoff_svg(curve, &analysis.breakeven_points))
        .unwrap_or_default();

    format!(
        r#"<div class="strategy-analysis-result">
        <h4>Strategy Analysis Results</h4>
        {name}
        <div class="strike-card">
            <div class="strike-card-header"><span>Analysis Summary</span></div>
            <div class="strike-card-body">
                <div class="strike-card-section metrics">
                    <div class="section-title">📊 Key Metrics</div>
                    <div class="metric-row"><span>Breakeven Points</span><span>{breakevens}</span></div>
                    <div class="metric-row"><span>Max Profit</span><span class="profit">{max_profit}</span></div>
                    <div class="metric-row"><span>Max Loss</span><span class="loss">{max_loss}</span></div>
                    {profit_zones}
                    {risk_reward}
                </div>
            </div>
        </div>
        <table class="legs-table">
            <thead><tr><th>Leg</th><th>Symbol</th><th>Strike</th><th>Type</th><th>Action</th><th>Quantity</th><th>Premium</th></tr></thead>
            <tbody>{legs}</tbody>
        </table>
        <div class="payoff-chart-container">
            <h5>Payoff Graph</h5>
            {chart}
        </div>
    </div>"#,
        max_profit = bound_text(analysis.max_profit.as_ref()),
        max_loss = bound_text(analysis.max_loss.as_ref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::performance::SweepMonth;
    use crate::types::{DailyPnl, PayoffCurve, PnlEntry, SimulatedPosition, SimulationRun};

    fn day(date: &str, pnls: &[f64]) -> DailyPnl {
        DailyPnl {
            date: date.to_string(),
            unrealised: pnls.iter().map(|p| PnlEntry { pnl: Some(*p) }).collect(),
            realised: Vec::new(),
        }
    }

    fn position(strike: f64, option_type: &str) -> SimulatedPosition {
        SimulatedPosition {
            strike: Some(strike),
            option_type: Some(option_type.to_string()),
            entry_price: Some(120.5),
            lots: Some(1),
        }
    }

    fn simulation() -> SimulationData {
        SimulationData {
            positions: vec![position(25000.0, "PE"), position(26000.0, "CE")],
            daily_pnl: vec![
                day("2025-06-02", &[100.0, -50.0]),
                day("2025-06-03", &[300.0, 100.0]),
                day("2025-06-04", &[200.0, 200.0]),
                day("2025-06-05", &[-10.0]),
            ],
            total_realized_pnl: Some(1500.0),
            strategy_type: None,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b a="1">&'x'</b>"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;x&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(1_234_567.891), "1,234,567.89");
        assert_eq!(format_number(-15000.0), "-15,000");
        assert_eq!(format_number(f64::NAN), "-");
        assert_eq!(format_currency(120.5), "₹120.5");
    }

    #[test]
    fn test_transaction_dates() {
        assert_eq!(format_transaction_date(Some("2025-07-01")), "Jul 1, 2025");
        assert_eq!(format_transaction_date(Some("2025-12-25T00:00:00")), "Dec 25, 2025");
        assert_eq!(format_transaction_date(Some("")), "N/A");
        assert_eq!(format_transaction_date(None), "N/A");
        assert_eq!(format_transaction_date(Some("next week")), "next week");
        assert_eq!(format_transaction_date(Some("31-Jul-2025")), "Jul 31, 2025");
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_label("2025-06-02"), "02-06");
        assert_eq!(day_label("02-Jun-2025"), "02-06");
        assert_eq!(day_label("02-Jun-2025 15:30:00"), "02-06");
        assert_eq!(day_label("2025-06-02T09:15:00"), "02-06");
        assert_eq!(day_label("day one"), "day one");
    }

    #[test]
    fn test_pnl_summary_backend_dates() {
        let data = SimulationData {
            positions: vec![SimulatedPosition::default()],
            daily_pnl: vec![
                DailyPnl {
                    date: "02-Jun-2025".into(),
                    unrealised: vec![PnlEntry { pnl: Some(120.0) }],
                    realised: vec![],
                },
                DailyPnl {
                    date: "03-Jun-2025".into(),
                    unrealised: vec![PnlEntry { pnl: Some(80.0) }],
                    realised: vec![],
                },
            ],
            ..SimulationData::default()
        };
        let summary = PnlSummary::from_data(&data).unwrap();
        assert_eq!(summary.max_date, "02-06");
    }

    #[test]
    fn test_pnl_summary_first_max_wins() {
        let summary = PnlSummary::from_data(&simulation()).unwrap();
        assert_eq!(summary.daily_totals, vec![50.0, 400.0, 400.0, -10.0]);
        assert_eq!(summary.max_index, 1);
        assert_eq!(summary.max_pnl, 400.0);
        assert_eq!(summary.max_date, "03-06");
        assert_eq!(summary.final_pnl, vec![-10.0, 0.0]);
    }

    #[test]
    fn test_pnl_section() {
        let html = pnl_section(Some(&simulation()));
        assert!(html.contains("₹400"));
        assert!(html.contains("Monthly Volatility"));
        assert!(html.contains("₹1,500"));
        assert!(html.contains("25000 PE"));
        assert!(html.contains("📉"));
        assert!(html.contains("⚡"));
        assert_eq!(html.matches("max-pnl-row").count(), 1);
        assert!(!html.contains(NO_PNL_DATA));
    }

    #[test]
    fn test_pnl_section_without_days() {
        assert!(pnl_section(None).contains(NO_PNL_DATA));

        let empty = SimulationData::default();
        assert!(pnl_section(Some(&empty)).contains(NO_PNL_DATA));
    }

    #[test]
    fn test_month_section_paths() {
        let month = SweepMonth { year: 2025, month: 6 };

        let failed = MonthOutcome {
            month,
            volatility: Err(DashboardError::Api { status: 500, message: "<boom>".into() }),
            simulation: Ok(SimulationRun::default()),
        };
        let html = month_section(&failed);
        assert!(html.contains("06/2025"));
        assert!(html.contains(r#"<span class="error">&lt;boom&gt;</span>"#));

        let no_sim = MonthOutcome {
            month,
            volatility: Ok(MonthlyVolatility::default()),
            simulation: Ok(SimulationRun { status: Some("failed".into()), data: None }),
        };
        let html = month_section(&no_sim);
        assert!(html.contains(PNL_NOT_AVAILABLE));
        assert!(html.contains("<span>mean</span><span>-</span>"));

        let with_sim = MonthOutcome {
            month,
            volatility: Ok(MonthlyVolatility::default()),
            simulation: Ok(SimulationRun { status: Some("success".into()), data: Some(simulation()) }),
        };
        assert!(month_section(&with_sim).contains("📊 PnL Summary"));
    }

    #[test]
    fn test_transactions_list() {
        assert!(transactions_list(&TransactionBook::default()).contains(NO_TRANSACTIONS));

        let book = TransactionBook::new(vec![Transaction {
            transaction_id: "42".into(),
            symbol: Some("NIFTY".into()),
            instrument: None,
            strike_price: 25600.0,
            option_type: "CE".into(),
            lots: 2,
            trade_date: Some("2025-07-01".into()),
            expiry_date: None,
        }]);
        let html = transactions_list(&book);
        assert!(html.contains(r#"action="/transactions/42/delete""#));
        assert!(html.contains("₹25600"));
        assert!(html.contains("Jul 1, 2025"));
        assert!(html.contains(r#"<div class="value">N/A</div>"#));
        assert!(html.contains(r#"<div class="value symbol">NIFTY</div>"#));
    }

    #[test]
    fn test_strategy_analysis() {
        assert!(strategy_analysis(None).contains(INVALID_ANALYSIS));

        let analysis = StrategyAnalysis {
            max_profit: Some(Bound::Amount(15000.0)),
            max_loss: Some(Bound::Label("Unlimited".into())),
            ..StrategyAnalysis::default()
        };
        let html = strategy_analysis(Some(&analysis));
        assert!(html.contains("<span>None</span>"));
        assert!(html.contains("₹15,000"));
        assert!(html.contains("Unlimited"));
        assert!(!html.contains("<svg"));

        let charted = StrategyAnalysis {
            breakeven_points: vec![25400.0, 25800.0],
            details: crate::types::AnalysisDetails {
                payoff_curve: Some(PayoffCurve {
                    prices: vec![25000.0, 25600.0, 26200.0],
                    payoffs: vec![-400.0, 200.0, -400.0],
                }),
            },
            ..StrategyAnalysis::default()
        };
        let html = strategy_analysis(Some(&charted));
        assert!(html.contains("₹25,400, ₹25,800"));
        assert!(html.contains("<svg"));

        let open_ended = StrategyAnalysis {
            profit_zones: vec![ProfitZone {
                between: vec![Bound::Amount(25700.0), Bound::Label("Unlimited".into())],
            }],
            risk_reward_ratio: Some(Bound::Label("Unlimited".into())),
            ..StrategyAnalysis::default()
        };
        let html = strategy_analysis(Some(&open_ended));
        assert!(html.contains("<span>Profit Zones</span><span>₹25,700 to Unlimited</span>"));
        assert!(html.contains("<span>Risk / Reward</span><span>Unlimited</span>"));
    }

    #[test]
    fn test_json_result_is_escaped() {
        let html = json_result(&serde_json::json!({"note": "<script>"}));
        assert!(html.starts_with("<pre>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
