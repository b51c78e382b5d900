//! Form parsing and validation
//!
//! Every tool page posts `application/x-www-form-urlencoded` bodies. Input
//! is validated here, before anything reaches the backend; failures carry
//! the exact message shown inline on the page.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::types::{
    LegAction, LoginRequest, NewTransaction, OptionType, StrategyLeg, VolatilityRequest, format_strike,
};

/// Lot counts offered per leg row
pub const LOT_CHOICES: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 15, 20];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decoded form body
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    pub fn parse(body: &str) -> Self {
        Self {
            values: url::form_urlencoded::parse(body.as_bytes()).into_owned().collect(),
        }
    }

    /// Trimmed value, `None` when absent or blank
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn required(&self, key: &str, label: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| DashboardError::Validation(format!("{label} is required")))
    }

    /// Checkbox state; unchecked boxes are not posted at all
    pub fn checked(&self, key: &str) -> bool {
        self.values
            .get(key)
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "off")
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn invalid(message: impl Into<String>) -> DashboardError {
    DashboardError::Validation(message.into())
}

fn parse_date(value: &str, label: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| invalid(format!("{label} must be a date in YYYY-MM-DD format")))
}

pub fn login_request(fields: &FormFields) -> Result<LoginRequest> {
    Ok(LoginRequest {
        username: fields.required("username", "Username")?.to_string(),
        password: fields.required("password", "Password")?.to_string(),
    })
}

pub fn volatility_request(fields: &FormFields) -> Result<VolatilityRequest> {
    let symbol = fields.required("symbol", "Symbol")?.to_string();
    let end_date = fields.required("end_date", "End date")?;
    parse_date(end_date, "End date")?;

    let years_of_data = fields
        .required("years_of_data", "Years of data")?
        .parse::<u32>()
        .ok()
        .filter(|y| *y > 0)
        .ok_or_else(|| invalid("Years of data must be a positive whole number"))?;

    let custom_multiplier = fields.checked("custom_multiplier");
    let multipliers = match fields.get("multipliers") {
        Some(raw) if custom_multiplier => Some(parse_multipliers(raw)?),
        _ => None,
    };

    Ok(VolatilityRequest {
        symbol,
        end_date: end_date.to_string(),
        years_of_data,
        custom_multiplier,
        multipliers,
    })
}

fn parse_multipliers(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|m| m.is_finite() && *m > 0.0)
                .ok_or_else(|| invalid("Multipliers must be comma-separated positive numbers"))
        })
        .collect()
}

/// Two-digit month, `01` through `12`
pub fn validate_month(value: &str) -> Result<String> {
    let value = value.trim();
    let in_range = value.len() == 2
        && value.bytes().all(|b| b.is_ascii_digit())
        && value.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m));
    if !in_range {
        return Err(invalid("Month must be a 2-digit number between 01 and 12"));
    }
    Ok(value.to_string())
}

/// Two-digit year, e.g. `24` for 2024
pub fn validate_year(value: &str) -> Result<String> {
    let value = value.trim();
    if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("Year must be a 2-digit number (e.g., 24 for 2024)"));
    }
    Ok(value.to_string())
}

/// Path parameters for the monthly volatility lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthQuery {
    pub symbol: String,
    pub mm: String,
    pub yy: String,
}

pub fn monthly_query(fields: &FormFields) -> Result<MonthQuery> {
    let symbol = fields.required("symbol", "Symbol")?.to_string();
    let mm = validate_month(fields.get("month").unwrap_or_default())?;
    let yy = validate_year(fields.get("year").unwrap_or_default())?;
    Ok(MonthQuery { symbol, mm, yy })
}

pub fn simulation_symbol(fields: &FormFields) -> Result<String> {
    Ok(fields.required("symbol", "Symbol")?.to_string())
}

pub fn new_transaction(fields: &FormFields) -> Result<NewTransaction> {
    let symbol = fields.required("symbol", "Symbol")?.to_string();
    let instrument = fields.required("instrument", "Instrument")?.to_string();

    let strike_price = fields
        .required("strike_price", "Strike price")?
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| invalid("Strike price must be a number"))?;

    let option_type = OptionType::parse(fields.required("option_type", "Option type")?)
        .ok_or_else(|| invalid("Option type must be CE or PE"))?;

    let lots = fields
        .required("lots", "Lots")?
        .parse::<i64>()
        .map_err(|_| invalid("Lots must be a whole number"))?;

    let trade_date = fields.required("trade_date", "Trade date")?;
    parse_date(trade_date, "Trade date")?;
    let expiry_date = fields.required("expiry_date", "Expiry date")?;
    parse_date(expiry_date, "Expiry date")?;

    Ok(NewTransaction {
        symbol,
        instrument,
        strike_price,
        option_type,
        lots,
        trade_date: trade_date.to_string(),
        expiry_date: expiry_date.to_string(),
    })
}

/// Strike performance sweep parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepRequest {
    pub symbol: String,
    pub end_date: NaiveDate,
    pub months: u32,
}

pub const DEFAULT_SWEEP_MONTHS: u32 = 12;

pub fn sweep_request(fields: &FormFields, config: &Config) -> Result<SweepRequest> {
    let symbol = fields
        .get("symbol")
        .unwrap_or(config.default_symbol.as_str())
        .to_string();
    let end_date = parse_date(fields.required("end_date", "End date")?, "End date")?;

    let max = config.max_sweep_months;
    let months = match fields.get("months") {
        None => DEFAULT_SWEEP_MONTHS.min(max),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=max).contains(m))
            .ok_or_else(|| invalid(format!("Months must be between 1 and {max}")))?,
    };

    Ok(SweepRequest { symbol, end_date, months })
}

// ============================================================================
// Custom strategy leg rows
// ============================================================================

/// One editable row of the leg builder, kept as typed so it can be re-rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegRow {
    pub selected: bool,
    pub action: String,
    pub expiry: String,
    pub strike: String,
    pub option_type: String,
    pub quantity: String,
    pub premium: String,
    pub symbol: String,
}

const ROW_FIELDS: [&str; 8] = [
    "trade_selected",
    "action",
    "expiry",
    "strike",
    "option_type",
    "quantity",
    "premium",
    "symbol",
];

impl LegRow {
    /// Fresh row: expiry tomorrow, default strike, one lot of a bought call
    pub fn with_defaults(config: &Config, today: NaiveDate) -> Self {
        let tomorrow = today + Duration::days(1);
        Self {
            selected: true,
            action: LegAction::Buy.to_string(),
            expiry: tomorrow.format(DATE_FORMAT).to_string(),
            strike: format_strike(config.default_strike),
            option_type: OptionType::Ce.to_string(),
            quantity: config.lot_size.to_string(),
            premium: String::new(),
            symbol: config.default_leg_symbol.clone(),
        }
    }

    fn from_fields(fields: &FormFields, index: usize) -> Self {
        let field = |name: &str| {
            fields
                .get(&format!("{name}_{index}"))
                .unwrap_or_default()
                .to_string()
        };
        Self {
            selected: fields.checked(&format!("trade_selected_{index}")),
            action: field("action"),
            expiry: field("expiry"),
            strike: field("strike"),
            option_type: field("option_type"),
            quantity: field("quantity"),
            premium: field("premium"),
            symbol: field("symbol"),
        }
    }

    /// The leg this row describes, `None` when a required field is missing
    pub fn to_leg(&self, default_symbol: &str) -> Option<StrategyLeg> {
        let symbol = match self.symbol.trim() {
            "" => default_symbol.to_string(),
            s => s.to_string(),
        };
        let expiry = format_expiry(&self.expiry)?;
        let strike = self
            .strike
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s != 0.0)?;
        let option_type = OptionType::parse(&self.option_type)?;
        let action = LegAction::parse(&self.action)?;
        let quantity = self.quantity.trim().parse::<u32>().ok().filter(|q| *q > 0)?;
        let premium = self
            .premium
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0);

        Some(StrategyLeg {
            symbol,
            expiry,
            strike,
            option_type,
            action,
            quantity,
            premium,
        })
    }
}

/// Rows posted by the leg builder, in index order
pub fn parse_leg_rows(fields: &FormFields) -> Vec<LegRow> {
    let indices: BTreeSet<usize> = fields
        .keys()
        .filter_map(|key| {
            let (name, index) = key.rsplit_once('_')?;
            if !ROW_FIELDS.contains(&name) {
                return None;
            }
            index.parse::<usize>().ok()
        })
        .collect();

    indices
        .into_iter()
        .map(|i| LegRow::from_fields(fields, i))
        .collect()
}

/// Edit applied to the leg builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegOp {
    Add,
    Remove(usize),
    Clear,
    Strike(usize, f64),
    Analyze,
}

impl LegOp {
    /// `add`, `remove:i`, `clear`, `strike:i:±step`, `analyze`
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split(':');
        match parts.next()? {
            "add" => Some(LegOp::Add),
            "clear" => Some(LegOp::Clear),
            "analyze" => Some(LegOp::Analyze),
            "remove" => Some(LegOp::Remove(parts.next()?.parse().ok()?)),
            "strike" => {
                let index = parts.next()?.parse().ok()?;
                let delta = parts.next()?.parse::<f64>().ok().filter(|d| d.is_finite())?;
                Some(LegOp::Strike(index, delta))
            }
            _ => None,
        }
    }
}

/// Apply a row edit; `Analyze` leaves the rows untouched
pub fn apply_leg_op(rows: &mut Vec<LegRow>, op: LegOp, config: &Config, today: NaiveDate) {
    match op {
        LegOp::Add => rows.push(LegRow::with_defaults(config, today)),
        LegOp::Remove(index) => {
            if index < rows.len() {
                rows.remove(index);
            }
        }
        LegOp::Clear => *rows = vec![LegRow::with_defaults(config, today)],
        LegOp::Strike(index, delta) => {
            if let Some(row) = rows.get_mut(index) {
                let current = row
                    .strike
                    .trim()
                    .parse::<f64>()
                    .unwrap_or(config.default_strike);
                row.strike = format_strike(current + delta);
            }
        }
        LegOp::Analyze => {}
    }
}

/// Legs of every selected row, in row order
pub fn collect_legs(rows: &[LegRow], default_symbol: &str) -> Result<Vec<StrategyLeg>> {
    let mut legs = Vec::new();
    for row in rows.iter().filter(|r| r.selected) {
        let leg = row.to_leg(default_symbol).ok_or_else(|| {
            invalid(format!("Please fill all required fields for Leg {}.", legs.len() + 1))
        })?;
        legs.push(leg);
    }

    if legs.is_empty() {
        return Err(invalid("Please add at least one strategy leg."));
    }
    Ok(legs)
}

/// Copy premiums of analysed legs back into the matching selected rows
pub fn write_back_premiums(rows: &mut [LegRow], analysed: &[StrategyLeg], default_symbol: &str) {
    let premiums: HashMap<String, f64> = analysed
        .iter()
        .filter_map(|leg| Some((leg.match_key(), leg.premium.filter(|p| *p != 0.0)?)))
        .collect();

    for row in rows.iter_mut().filter(|r| r.selected) {
        let Some(leg) = row.to_leg(default_symbol) else {
            continue;
        };
        if let Some(premium) = premiums.get(&leg.match_key()) {
            row.premium = format!("{premium:.2}");
        }
    }
}

/// `YYYY-MM-DD` to the backend's `DD-Mon-YYYY`
pub fn format_expiry(value: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()?;
    Some(date.format("%d-%b-%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    fn row(strike: &str, action: &str, option_type: &str) -> LegRow {
        LegRow {
            selected: true,
            action: action.to_string(),
            expiry: "2025-07-10".to_string(),
            strike: strike.to_string(),
            option_type: option_type.to_string(),
            quantity: "75".to_string(),
            premium: String::new(),
            symbol: "NIFTY".to_string(),
        }
    }

    #[test]
    fn test_parse_form_fields() {
        let fields = FormFields::parse("symbol=NSE%3ANIFTY50-INDEX&end_date=2025-06-30&blank=+&flag=on");
        assert_eq!(fields.get("symbol"), Some("NSE:NIFTY50-INDEX"));
        assert_eq!(fields.get("blank"), None);
        assert!(fields.checked("flag"));
        assert!(!fields.checked("missing"));
    }

    #[test]
    fn test_month_validation() {
        assert_eq!(validate_month("06").unwrap(), "06");
        assert_eq!(validate_month("12").unwrap(), "12");
        for bad in ["6", "00", "13", "1a", "006", ""] {
            let err = validate_month(bad).unwrap_err();
            assert_eq!(err.to_string(), "Month must be a 2-digit number between 01 and 12");
        }
    }

    #[test]
    fn test_year_validation() {
        assert_eq!(validate_year("24").unwrap(), "24");
        for bad in ["2024", "4", "y4"] {
            let err = validate_year(bad).unwrap_err();
            assert_eq!(err.to_string(), "Year must be a 2-digit number (e.g., 24 for 2024)");
        }
    }

    #[test]
    fn test_volatility_request() {
        let fields = FormFields::parse(
            "symbol=NSE%3ANIFTY50-INDEX&end_date=2025-06-30&years_of_data=3&custom_multiplier=on&multipliers=1.5%2C+2",
        );
        let request = volatility_request(&fields).unwrap();
        assert_eq!(request.years_of_data, 3);
        assert!(request.custom_multiplier);
        assert_eq!(request.multipliers, Some(vec![1.5, 2.0]));

        let fields = FormFields::parse("symbol=X&end_date=2025-06-30&years_of_data=0");
        assert!(volatility_request(&fields).is_err());

        let fields = FormFields::parse("symbol=X&end_date=30-06-2025&years_of_data=2");
        assert!(volatility_request(&fields).is_err());
    }

    #[test]
    fn test_new_transaction() {
        let fields = FormFields::parse(
            "symbol=NIFTY&instrument=OPTIDX&strike_price=25600&option_type=pe&lots=2&trade_date=2025-07-01&expiry_date=2025-07-31",
        );
        let tx = new_transaction(&fields).unwrap();
        assert_eq!(tx.option_type, OptionType::Pe);
        assert_eq!(tx.lots, 2);

        let fields = FormFields::parse("symbol=NIFTY&instrument=OPTIDX&strike_price=abc");
        assert_eq!(
            new_transaction(&fields).unwrap_err().to_string(),
            "Strike price must be a number"
        );
    }

    #[test]
    fn test_sweep_request_defaults_and_bounds() {
        let config = Config::default();

        let request = sweep_request(&FormFields::parse("end_date=2025-07-15"), &config).unwrap();
        assert_eq!(request.symbol, "NSE:NIFTY50-INDEX");
        assert_eq!(request.months, 12);

        let fields = FormFields::parse("end_date=2025-07-15&months=25");
        assert_eq!(
            sweep_request(&fields, &config).unwrap_err().to_string(),
            "Months must be between 1 and 24"
        );
        assert!(sweep_request(&FormFields::parse("months=3"), &config).is_err());
    }

    #[test]
    fn test_expiry_format() {
        assert_eq!(format_expiry("2025-07-10").as_deref(), Some("10-Jul-2025"));
        assert_eq!(format_expiry("2025-01-03").as_deref(), Some("03-Jan-2025"));
        assert!(format_expiry("10/07/2025").is_none());
    }

    #[test]
    fn test_parse_leg_rows_and_collect() {
        let fields = FormFields::parse(
            "op=analyze\
             &trade_selected_0=on&action_0=SELL&expiry_0=2025-07-10&strike_0=25600&option_type_0=CE&quantity_0=75&premium_0=&symbol_0=NIFTY\
             &trade_selected_1=on&action_1=SELL&expiry_1=2025-07-10&strike_1=25600&option_type_1=PE&quantity_1=150&premium_1=120.5&symbol_1=NIFTY\
             &action_2=BUY&expiry_2=2025-07-10&strike_2=26000&option_type_2=CE&quantity_2=75&symbol_2=NIFTY",
        );
        let rows = parse_leg_rows(&fields);
        assert_eq!(rows.len(), 3);
        assert!(!rows[2].selected);

        let legs = collect_legs(&rows, "NIFTY").unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].expiry, "10-Jul-2025");
        assert_eq!(legs[0].premium, None);
        assert_eq!(legs[1].option_type, OptionType::Pe);
        assert_eq!(legs[1].quantity, 150);
        assert_eq!(legs[1].premium, Some(120.5));
    }

    #[test]
    fn test_collect_legs_errors() {
        let mut incomplete = row("25600", "BUY", "CE");
        incomplete.strike = String::new();
        let rows = vec![row("25600", "SELL", "CE"), incomplete];
        assert_eq!(
            collect_legs(&rows, "NIFTY").unwrap_err().to_string(),
            "Please fill all required fields for Leg 2."
        );

        let mut unselected = row("25600", "BUY", "CE");
        unselected.selected = false;
        assert_eq!(
            collect_legs(&[unselected], "NIFTY").unwrap_err().to_string(),
            "Please add at least one strategy leg."
        );
        assert!(collect_legs(&[], "NIFTY").is_err());
    }

    #[test]
    fn test_blank_symbol_uses_default() {
        let mut blank = row("25600", "BUY", "CE");
        blank.symbol = String::new();
        let legs = collect_legs(&[blank], "BANKNIFTY").unwrap();
        assert_eq!(legs[0].symbol, "BANKNIFTY");
    }

    #[test]
    fn test_leg_ops() {
        let config = Config::default();
        let mut rows = vec![LegRow::with_defaults(&config, today())];
        assert_eq!(rows[0].expiry, "2025-07-10");
        assert_eq!(rows[0].strike, "25600");
        assert_eq!(rows[0].quantity, "75");

        apply_leg_op(&mut rows, LegOp::Add, &config, today());
        apply_leg_op(&mut rows, LegOp::Strike(1, 100.0), &config, today());
        assert_eq!(rows[1].strike, "25700");

        rows[0].strike = "not a strike".to_string();
        apply_leg_op(&mut rows, LegOp::Strike(0, -100.0), &config, today());
        assert_eq!(rows[0].strike, "25500");

        apply_leg_op(&mut rows, LegOp::Remove(0), &config, today());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].strike, "25700");

        apply_leg_op(&mut rows, LegOp::Remove(5), &config, today());
        assert_eq!(rows.len(), 1);

        apply_leg_op(&mut rows, LegOp::Add, &config, today());
        apply_leg_op(&mut rows, LegOp::Clear, &config, today());
        assert_eq!(rows, vec![LegRow::with_defaults(&config, today())]);
    }

    #[test]
    fn test_parse_leg_op() {
        assert_eq!(LegOp::parse("add"), Some(LegOp::Add));
        assert_eq!(LegOp::parse("remove:2"), Some(LegOp::Remove(2)));
        assert_eq!(LegOp::parse("strike:0:-100"), Some(LegOp::Strike(0, -100.0)));
        assert_eq!(LegOp::parse("strike:1:+50"), Some(LegOp::Strike(1, 50.0)));
        assert_eq!(LegOp::parse("remove:x"), None);
        assert_eq!(LegOp::parse("explode"), None);
    }

    #[test]
    fn test_write_back_premiums() {
        let mut rows = vec![row("25600", "SELL", "CE"), row("25600", "SELL", "PE")];
        rows[1].selected = false;

        let mut analysed = collect_legs(&rows[..1], "NIFTY").unwrap();
        analysed[0].premium = Some(142.456);
        let mut other = analysed[0].clone();
        other.option_type = OptionType::Pe;
        other.premium = Some(99.0);
        analysed.push(other);

        write_back_premiums(&mut rows, &analysed, "NIFTY");
        assert_eq!(rows[0].premium, "142.46");
        assert_eq!(rows[1].premium, "");
    }
}
