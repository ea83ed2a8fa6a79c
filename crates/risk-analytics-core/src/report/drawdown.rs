use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RiskAnalyticsError;
use crate::types::{ratio_or_zero, round_currency, to_percent, Money};
use crate::RiskAnalyticsResult;

/// A dated NAV observation supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavObservation {
    pub date: NaiveDate,
    pub nav: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub nav: Money,
    /// Distance below the running peak
    pub drawdown: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownAnalysis {
    pub peak_nav: Money,
    pub trough_nav: Money,
    pub max_drawdown: Money,
    pub max_drawdown_percent: Decimal,
    /// Days from the peak to the trough of the deepest drawdown
    pub drawdown_duration_days: i64,
    /// Days from that trough back to the peak; `None` if not yet recovered
    pub recovery_duration_days: Option<i64>,
    pub current_drawdown: Money,
    pub current_drawdown_percent: Decimal,
    pub history: Vec<DrawdownPoint>,
}

impl DrawdownAnalysis {
    /// Summary for a single NAV snapshot: no history, so no drawdown.
    pub fn from_snapshot(nav: Money, date: NaiveDate) -> Self {
        let nav = round_currency(nav);
        Self {
            peak_nav: nav,
            trough_nav: nav,
            max_drawdown: Decimal::ZERO,
            max_drawdown_percent: Decimal::ZERO,
            drawdown_duration_days: 0,
            recovery_duration_days: Some(0),
            current_drawdown: Decimal::ZERO,
            current_drawdown_percent: Decimal::ZERO,
            history: vec![DrawdownPoint {
                date,
                nav,
                drawdown: Decimal::ZERO,
            }],
        }
    }

    /// Peak-to-trough analysis over a NAV series. Observations are sorted by
    /// date before analysis.
    pub fn from_history(observations: &[NavObservation]) -> RiskAnalyticsResult<Self> {
        if observations.is_empty() {
            return Err(RiskAnalyticsError::InsufficientData(
                "NAV history must contain at least one observation".into(),
            ));
        }
        if let Some(bad) = observations.iter().find(|o| o.nav < Decimal::ZERO) {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "nav_history.nav".into(),
                reason: format!("Negative NAV on {}", bad.date),
            });
        }

        let mut series = observations.to_vec();
        series.sort_by_key(|o| o.date);

        let mut peak = series[0].clone();
        let mut max_dd = Decimal::ZERO;
        let mut max_peak = series[0].clone();
        let mut max_trough = series[0].clone();
        let mut history = Vec::with_capacity(series.len());

        for obs in &series {
            if obs.nav > peak.nav {
                peak = obs.clone();
            }
            let dd = peak.nav - obs.nav;
            if dd > max_dd {
                max_dd = dd;
                max_peak = peak.clone();
                max_trough = obs.clone();
            }
            history.push(DrawdownPoint {
                date: obs.date,
                nav: round_currency(obs.nav),
                drawdown: round_currency(dd),
            });
        }

        let recovery_duration_days = if max_dd.is_zero() {
            Some(0)
        } else {
            series
                .iter()
                .find(|o| o.date > max_trough.date && o.nav >= max_peak.nav)
                .map(|o| (o.date - max_trough.date).num_days())
        };

        let last = &series[series.len() - 1];
        let current = peak.nav - last.nav;

        Ok(Self {
            peak_nav: round_currency(max_peak.nav),
            trough_nav: round_currency(max_trough.nav),
            max_drawdown: round_currency(max_dd),
            max_drawdown_percent: to_percent(ratio_or_zero(max_dd, max_peak.nav)),
            drawdown_duration_days: (max_trough.date - max_peak.date).num_days(),
            recovery_duration_days,
            current_drawdown: round_currency(current),
            current_drawdown_percent: to_percent(ratio_or_zero(current, peak.nav)),
            history,
        })
    }
}
