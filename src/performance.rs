//! Strike performance sweep
//!
//! Walks back month by month from an end date and, for each month, fetches
//! the volatility bands and the monthly strategy simulation side by side.
//! Months are processed strictly in order, oldest first.

use chrono::{Datelike, Months, NaiveDate};

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{MonthlyVolatility, SimulationRun};

/// One calendar month of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepMonth {
    pub year: i32,
    pub month: u32,
}

impl SweepMonth {
    /// Two-digit month, `01`..`12`
    pub fn mm(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Last two digits of the year
    pub fn yy(&self) -> String {
        format!("{:02}", self.year.rem_euclid(100))
    }

    /// Section header, e.g. `06/2025`
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

/// The `count` months before `end_date`'s month, oldest first
pub fn sweep_months(end_date: NaiveDate, count: u32) -> Vec<SweepMonth> {
    let mut cursor = end_date.with_day(1);
    let mut months = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let Some(previous) = cursor.and_then(|d| d.checked_sub_months(Months::new(1))) else {
            break;
        };
        months.push(SweepMonth {
            year: previous.year(),
            month: previous.month(),
        });
        cursor = Some(previous);
    }

    months.reverse();
    months
}

/// Backend calls a sweep depends on
pub(crate) trait MonthlySource {
    async fn monthly_volatility(&self, mm: &str, yy: &str, symbol: &str) -> Result<MonthlyVolatility>;
    async fn monthly_simulation(&self, mm: &str, yy: &str) -> Result<SimulationRun>;
}

impl MonthlySource for ApiClient {
    async fn monthly_volatility(&self, mm: &str, yy: &str, symbol: &str) -> Result<MonthlyVolatility> {
        ApiClient::monthly_volatility(self, mm, yy, symbol).await
    }

    async fn monthly_simulation(&self, mm: &str, yy: &str) -> Result<SimulationRun> {
        ApiClient::monthly_simulation(self, mm, yy).await
    }
}

/// Outcome of both calls for one month
#[derive(Debug)]
pub struct MonthOutcome {
    pub month: SweepMonth,
    pub volatility: Result<MonthlyVolatility>,
    pub simulation: Result<SimulationRun>,
}

impl MonthOutcome {
    /// Simulation run when it reported `success`
    pub fn successful_simulation(&self) -> Option<&SimulationRun> {
        self.simulation.as_ref().ok().filter(|run| run.is_success())
    }
}

/// Run the sweep, one month at a time, both calls of a month concurrently
pub(crate) async fn run_sweep<S: MonthlySource>(
    source: &S,
    symbol: &str,
    months: &[SweepMonth],
) -> Vec<MonthOutcome> {
    let mut outcomes = Vec::with_capacity(months.len());

    for month in months {
        let (mm, yy) = (month.mm(), month.yy());
        let (volatility, simulation) = futures::join!(
            source.monthly_volatility(&mm, &yy, symbol),
            source.monthly_simulation(&mm, &yy)
        );
        outcomes.push(MonthOutcome {
            month: *month,
            volatility,
            simulation,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::cell::RefCell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sweep_months_oldest_first() {
        let months = sweep_months(date(2025, 7, 15), 3);
        let labels: Vec<_> = months.iter().map(SweepMonth::label).collect();
        assert_eq!(labels, vec!["04/2025", "05/2025", "06/2025"]);
    }

    #[test]
    fn test_sweep_months_cross_year_boundary() {
        let months = sweep_months(date(2025, 3, 31), 4);
        let pairs: Vec<_> = months.iter().map(|m| (m.mm(), m.yy())).collect();
        assert_eq!(
            pairs,
            vec![
                ("11".to_string(), "24".to_string()),
                ("12".to_string(), "24".to_string()),
                ("01".to_string(), "25".to_string()),
                ("02".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_sweep_months_counts() {
        assert!(sweep_months(date(2025, 1, 1), 0).is_empty());
        assert_eq!(sweep_months(date(2025, 1, 1), 24).len(), 24);
        assert_eq!(sweep_months(date(2025, 1, 1), 1)[0], SweepMonth { year: 2024, month: 12 });
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(SweepMonth { year: 2009, month: 3 }.yy(), "09");
        assert_eq!(SweepMonth { year: 2100, month: 3 }.yy(), "00");
    }

    struct FakeSource {
        calls: RefCell<Vec<String>>,
        failing_month: &'static str,
    }

    impl MonthlySource for FakeSource {
        async fn monthly_volatility(&self, mm: &str, yy: &str, symbol: &str) -> Result<MonthlyVolatility> {
            self.calls.borrow_mut().push(format!("vol {mm}/{yy}"));
            if mm == self.failing_month {
                return Err(DashboardError::Api { status: 404, message: "No data".into() });
            }
            Ok(MonthlyVolatility {
                symbol: Some(symbol.to_string()),
                ..MonthlyVolatility::default()
            })
        }

        async fn monthly_simulation(&self, mm: &str, yy: &str) -> Result<SimulationRun> {
            self.calls.borrow_mut().push(format!("sim {mm}/{yy}"));
            Ok(SimulationRun {
                status: Some(if mm == "05" { "error" } else { "success" }.to_string()),
                data: None,
            })
        }
    }

    #[tokio::test]
    async fn test_run_sweep_in_month_order() {
        let source = FakeSource {
            calls: RefCell::new(Vec::new()),
            failing_month: "06",
        };
        let months = sweep_months(date(2025, 7, 15), 3);

        let outcomes = run_sweep(&source, "NSE:NIFTY50-INDEX", &months).await;
        assert_eq!(outcomes.len(), 3);

        let calls = source.calls.borrow();
        assert_eq!(
            *calls,
            vec!["vol 04/25", "sim 04/25", "vol 05/25", "sim 05/25", "vol 06/25", "sim 06/25"]
        );

        assert!(outcomes[0].volatility.is_ok());
        assert!(outcomes[0].successful_simulation().is_some());
        assert!(outcomes[1].successful_simulation().is_none());
        assert_eq!(
            outcomes[2].volatility.as_ref().unwrap_err().to_string(),
            "No data"
        );
    }
}
