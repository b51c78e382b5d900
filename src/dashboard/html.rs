//! Dashboard HTML templates
//!
//! Page bodies for:
//! - Login and the dashboard home
//! - One form per backend tool, re-filled with the last submitted values
//! - The custom strategy leg builder

use chrono::NaiveDate;

use crate::config::Config;
use crate::forms::{DEFAULT_SWEEP_MONTHS, FormFields, LOT_CHOICES, LegRow};
use crate::types::format_strike;

use super::render::escape;

/// Escaped value of `key`, or `default` when it was not submitted
fn sticky(fields: &FormFields, key: &str, default: &str) -> String {
    escape(fields.get(key).unwrap_or(default))
}

fn selected(current: &str, option: &str) -> &'static str {
    if current.eq_ignore_ascii_case(option) { " selected" } else { "" }
}

pub fn header(logged_in: bool) -> String {
    let nav = if logged_in {
        r#"<nav>
                <a href="/">Home</a>
                <a href="/volatility">Volatility</a>
                <a href="/monthly-volatility">Monthly Volatility</a>
                <a href="/simulation">Simulation</a>
                <a href="/transactions">Transactions</a>
                <a href="/strike-performance">Strike Performance</a>
                <a href="/custom-strategy">Custom Strategy</a>
                <form method="post" action="/logout"><button type="submit" class="btn btn-secondary">Logout</button></form>
            </nav>"#
    } else {
        ""
    };
    format!(
        r#"<header>
            <h1>📈 Options Analytics</h1>
            {nav}
        </header>"#
    )
}

pub fn login_form() -> &'static str {
    r#"<div class="card">
        <h3>Login</h3>
        <form method="post" action="/login" class="tool-form">
            <div class="form-group"><label for="username">Username</label><input type="text" id="username" name="username" required></div>
            <div class="form-group"><label for="password">Password</label><input type="password" id="password" name="password" required></div>
            <button type="submit">Login</button>
        </form>
    </div>"#
}

pub fn home(transactions: &str) -> String {
    format!(
        r#"<div class="grid">
            <a class="tool-link" href="/volatility">Volatility</a>
            <a class="tool-link" href="/monthly-volatility">Monthly Volatility</a>
            <a class="tool-link" href="/simulation">Strategy Simulation</a>
            <a class="tool-link" href="/transactions">Transactions</a>
            <a class="tool-link" href="/strike-performance">Strike Performance</a>
            <a class="tool-link" href="/custom-strategy">Custom Strategy</a>
        </div>
        <div class="card" style="margin-top: 16px;">
            <h3>Active Transactions</h3>
            <div id="transactions-container">{transactions}</div>
        </div>"#
    )
}

/// Tool form followed by its result area
fn tool(title: &str, form: &str, result: &str) -> String {
    format!(
        r#"<div class="card">
            <h3>{title}</h3>
            {form}
        </div>
        <div id="api-result">{result}</div>"#
    )
}

pub fn volatility_page(fields: &FormFields, today: NaiveDate, result: &str) -> String {
    let custom = if fields.checked("custom_multiplier") { " checked" } else { "" };
    let form = format!(
        r#"<form method="post" action="/volatility" class="tool-form">
            <div class="form-group"><label for="symbol">Symbol</label><input type="text" id="symbol" name="symbol" value="{symbol}" required></div>
            <div class="form-group"><label for="end_date">End Date</label><input type="date" id="end_date" name="end_date" value="{end_date}" required></div>
            <div class="form-group"><label for="years_of_data">Years of Data</label><input type="number" id="years_of_data" name="years_of_data" min="1" value="{years}" required></div>
            <div class="form-group checkbox-group"><input type="checkbox" id="custom_multiplier" name="custom_multiplier"{custom}><label for="custom_multiplier">Custom multipliers</label></div>
            <div class="form-group"><label for="multipliers">Multipliers</label><input type="text" id="multipliers" name="multipliers" placeholder="1.0, 1.5, 2.0" value="{multipliers}"></div>
            <button type="submit">Submit</button>
        </form>"#,
        symbol = sticky(fields, "symbol", ""),
        end_date = sticky(fields, "end_date", &today.to_string()),
        years = sticky(fields, "years_of_data", ""),
        multipliers = sticky(fields, "multipliers", ""),
    );
    tool("Volatility", &form, result)
}

pub fn monthly_volatility_page(fields: &FormFields, config: &Config, result: &str) -> String {
    let form = format!(
        r#"<form method="post" action="/monthly-volatility" class="tool-form">
            <div class="form-group"><label for="symbol">Symbol</label><input type="text" id="symbol" name="symbol" value="{symbol}" required></div>
            <div class="form-group"><label for="month">Month (MM)</label><input type="text" id="month" name="month" placeholder="06" maxlength="2" value="{month}" required></div>
            <div class="form-group"><label for="year">Year (YY)</label><input type="text" id="year" name="year" placeholder="25" maxlength="2" value="{year}" required></div>
            <button type="submit">Submit</button>
        </form>"#,
        symbol = sticky(fields, "symbol", &config.default_symbol),
        month = sticky(fields, "month", ""),
        year = sticky(fields, "year", ""),
    );
    tool("Monthly Volatility", &form, result)
}

pub fn simulation_page(fields: &FormFields, config: &Config, result: &str) -> String {
    let form = format!(
        r#"<form method="post" action="/simulation" class="tool-form">
            <div class="form-group"><label for="symbol">Symbol</label><input type="text" id="symbol" name="symbol" value="{symbol}" required></div>
            <button type="submit">Run Simulation</button>
        </form>"#,
        symbol = sticky(fields, "symbol", &config.default_symbol),
    );
    tool("Strategy Simulation", &form, result)
}

pub fn transactions_page(fields: &FormFields, today: NaiveDate, list: &str) -> String {
    let option_type = fields.get("option_type").unwrap_or("CE");
    let form = format!(
        r#"<form method="post" action="/transactions" class="tool-form">
            <div class="form-group"><label for="symbol">Symbol</label><input type="text" id="symbol" name="symbol" value="{symbol}" required></div>
            <div class="form-group"><label for="instrument">Instrument</label><input type="text" id="instrument" name="instrument" value="{instrument}" required></div>
            <div class="form-group"><label for="strike_price">Strike Price</label><input type="number" step="any" id="strike_price" name="strike_price" value="{strike}" required></div>
            <div class="form-group"><label for="option_type">Option Type</label>
                <select id="option_type" name="option_type"><option value="CE"{ce}>CE</option><option value="PE"{pe}>PE</option></select></div>
            <div class="form-group"><label for="lots">Lots</label><input type="number" id="lots" name="lots" value="{lots}" required></div>
            <div class="form-group"><label for="trade_date">Trade Date</label><input type="date" id="trade_date" name="trade_date" value="{trade_date}" required></div>
            <div class="form-group"><label for="expiry_date">Expiry Date</label><input type="date" id="expiry_date" name="expiry_date" value="{expiry_date}" required></div>
            <button type="submit">Create Transaction</button>
        </form>"#,
        symbol = sticky(fields, "symbol", ""),
        instrument = sticky(fields, "instrument", ""),
        strike = sticky(fields, "strike_price", ""),
        ce = selected(option_type, "CE"),
        pe = selected(option_type, "PE"),
        lots = sticky(fields, "lots", ""),
        trade_date = sticky(fields, "trade_date", &today.to_string()),
        expiry_date = sticky(fields, "expiry_date", ""),
    );

    format!(
        r#"{create}
        <div class="card">
            <div class="strike-row">
                <h3>Active Transactions</h3>
                <form method="post" action="/transactions/delete-all" data-confirm="Are you sure you want to delete ALL transactions? This action cannot be undone.">
                    <button type="submit" class="btn-danger">Delete All</button>
                </form>
            </div>
            <div id="transactions-container">{list}</div>
        </div>"#,
        create = tool("Create Transaction", &form, ""),
    )
}

pub fn strike_performance_page(fields: &FormFields, config: &Config, today: NaiveDate, result: &str) -> String {
    let form = format!(
        r#"<form method="post" action="/strike-performance" class="tool-form">
            <div class="form-group"><label for="symbol">Symbol</label><input type="text" id="symbol" name="symbol" value="{symbol}" required></div>
            <div class="form-group"><label for="end_date">End Date</label><input type="date" id="end_date" name="end_date" value="{end_date}" required></div>
            <div class="form-group"><label for="months">Number of Months</label><input type="number" id="months" name="months" min="1" max="{max}" value="{months}" required></div>
            <button type="submit">Analyze</button>
        </form>"#,
        symbol = sticky(fields, "symbol", &config.default_symbol),
        end_date = sticky(fields, "end_date", &today.to_string()),
        max = config.max_sweep_months,
        months = sticky(fields, "months", &DEFAULT_SWEEP_MONTHS.min(config.max_sweep_months).to_string()),
    );
    tool("Strike Performance", &form, result)
}

fn leg_row(index: usize, row: &LegRow, config: &Config) -> String {
    let checked = if row.selected { " checked" } else { "" };
    let step = format_strike(config.strike_step);
    let lots: String = LOT_CHOICES
        .iter()
        .filter_map(|n| {
            let quantity = n.checked_mul(config.lot_size)?.to_string();
            Some(format!(
                r#"<option value="{quantity}"{sel}>{n}</option>"#,
                sel = selected(&row.quantity, &quantity)
            ))
        })
        .collect();

    format!(
        r#"<div class="trade-row" data-trade-index="{index}">
            <div class="col-check"><input type="checkbox" name="trade_selected_{index}"{checked}></div>
            <div class="col-bs"><select name="action_{index}"><option value="BUY"{buy}>B</option><option value="SELL"{sell}>S</option></select></div>
            <div class="col-expiry"><input type="date" name="expiry_{index}" value="{expiry}"></div>
            <div class="col-strike"><div class="strike-controls">
                <button type="submit" name="op" value="strike:{index}:-{step}" class="strike-btn minus">−</button>
                <input type="number" name="strike_{index}" value="{strike}" step="50">
                <button type="submit" name="op" value="strike:{index}:{step}" class="strike-btn plus">+</button>
            </div></div>
            <div class="col-type"><select name="option_type_{index}"><option value="CE"{ce}>CE</option><option value="PE"{pe}>PE</option></select></div>
            <div class="col-lots"><select name="quantity_{index}">{lots}</select></div>
            <div class="col-premium"><input type="number" name="premium_{index}" placeholder="0.0" step="0.01" value="{premium}"></div>
            <div class="col-actions"><button type="submit" name="op" value="remove:{index}" class="delete-btn" formnovalidate>🗑</button></div>
            <input type="hidden" name="symbol_{index}" value="{symbol}">
        </div>"#,
        buy = selected(&row.action, "BUY"),
        sell = selected(&row.action, "SELL"),
        expiry = escape(&row.expiry),
        strike = escape(&row.strike),
        ce = selected(&row.option_type, "CE"),
        pe = selected(&row.option_type, "PE"),
        premium = escape(&row.premium),
        symbol = escape(&row.symbol),
    )
}

pub fn strategy_page(rows: &[LegRow], config: &Config, result: &str) -> String {
    let count = rows.iter().filter(|r| r.selected).count();
    let plural = if count == 1 { "" } else { "s" };
    let all_checked = if rows.iter().all(|r| r.selected) { " checked" } else { "" };
    let legs: String = rows
        .iter()
        .enumerate()
        .map(|(i, row)| leg_row(i, row, config))
        .collect();

    let form = format!(
        r#"<form method="post" action="/custom-strategy">
            <button type="submit" name="op" value="analyze" class="default-submit" tabindex="-1" aria-hidden="true"></button>
            <div class="strike-row">
                <div class="trade-counter">
                    <input type="checkbox" id="select-all-trades"{all_checked}>
                    <span id="trade-count">{count} trade{plural} selected</span>
                </div>
                <button type="submit" name="op" value="clear" class="btn-secondary">Clear New Trades</button>
            </div>
            <div class="trades-table">
                <div class="table-header">
                    <div></div><div>B/S</div><div>Expiry</div><div>Strike</div><div>Type</div><div>Lots</div><div>Premium</div><div></div>
                </div>
                {legs}
            </div>
            <div class="action-buttons">
                <button type="submit" name="op" value="add" class="btn-secondary">Add/Edit</button>
                <button type="submit" name="op" value="analyze">Analyze</button>
            </div>
        </form>"#
    );
    tool("New Strategy", &form, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    #[test]
    fn test_forms_keep_submitted_values() {
        let fields = FormFields::parse("symbol=%3Cx%3E&month=06&year=25");
        let html = monthly_volatility_page(&fields, &Config::default(), "");
        assert!(html.contains(r#"value="&lt;x&gt;""#));
        assert!(html.contains(r#"value="06""#));

        let html = strike_performance_page(&FormFields::default(), &Config::default(), today(), "");
        assert!(html.contains(r#"value="NSE:NIFTY50-INDEX""#));
        assert!(html.contains(r#"value="2025-07-09""#));
        assert!(html.contains(r#"max="24" value="12""#));
    }

    #[test]
    fn test_strategy_page_rows() {
        let config = Config::default();
        let mut second = LegRow::with_defaults(&config, today());
        second.selected = false;
        second.action = "SELL".to_string();
        let rows = vec![LegRow::with_defaults(&config, today()), second];

        let html = strategy_page(&rows, &config, "");
        assert!(html.contains("1 trade selected"));
        assert!(html.contains(r#"name="strike_1" value="25600""#));
        assert!(html.contains(r#"value="strike:0:-100""#));
        assert!(html.contains(r#"value="remove:1""#));
        assert!(html.contains(r#"<option value="75" selected>1</option>"#));
        assert!(html.contains(r#"<option value="SELL" selected>S</option>"#));
        assert!(!html.contains(r#"id="select-all-trades" checked"#));
    }

    #[test]
    fn test_enter_key_submits_analyze() {
        let config = Config::default();
        let html = strategy_page(&[LegRow::with_defaults(&config, today())], &config, "");
        let form = &html[html.find(r#"action="/custom-strategy""#).unwrap()..];
        let first_submit = &form[form.find(r#"type="submit""#).unwrap()..];
        assert!(first_submit.starts_with(r#"type="submit" name="op" value="analyze""#));
    }

    #[test]
    fn test_lot_choices_skip_overflowing_quantities() {
        let config = Config { lot_size: u32::MAX / 10, ..Config::default() };
        let html = strategy_page(&[LegRow::with_defaults(&config, today())], &config, "");
        assert!(html.contains(&format!(r#"<option value="{}" selected>1</option>"#, u32::MAX / 10)));
        assert!(html.contains(">10</option>"));
        assert!(!html.contains(">12</option>"));
    }

    #[test]
    fn test_header_nav_only_when_logged_in() {
        assert!(header(true).contains(r#"action="/logout""#));
        assert!(!header(false).contains("<nav>"));
    }
}
