use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RiskAnalyticsError;
use crate::types::{Money, Rate};
use crate::RiskAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Collateral instrument classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollateralType {
    MediumTermNote,
    Bond,
    RealEstate,
    Token,
    Stablecoin,
    AmmLp,
}

impl CollateralType {
    /// Fixed-income instruments that carry rate and spread duration.
    pub fn is_bond_like(&self) -> bool {
        matches!(self, CollateralType::MediumTermNote | CollateralType::Bond)
    }
}

/// A single collateral position pledged to the facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralPosition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub collateral_type: CollateralType,
    pub face_value: Money,
    pub market_value: Money,
    pub custodian: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cusip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    /// Lendable fraction of market value (0–1)
    pub advance_rate: Rate,
    /// Price-risk discount (0–1)
    pub haircut: Rate,
    /// Annualised standard deviation of returns
    pub volatility: Rate,
    /// Grouping key for co-movement
    pub correlation_bucket: String,
    /// 1 (illiquid) to 10 (cash-like)
    pub liquidity_score: u8,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl CollateralPosition {
    /// Check the position invariants. Called by the registry before insert.
    pub fn validate(&self) -> RiskAnalyticsResult<()> {
        if self.id.trim().is_empty() {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "position.id".into(),
                reason: "Position id must not be empty".into(),
            });
        }
        if self.market_value < Decimal::ZERO {
            return Err(self.invalid("market_value", "Market value cannot be negative"));
        }
        if self.face_value < Decimal::ZERO {
            return Err(self.invalid("face_value", "Face value cannot be negative"));
        }
        if self.advance_rate < Decimal::ZERO || self.advance_rate > Decimal::ONE {
            return Err(self.invalid("advance_rate", "Advance rate must be between 0 and 1"));
        }
        if self.haircut < Decimal::ZERO || self.haircut > Decimal::ONE {
            return Err(self.invalid("haircut", "Haircut must be between 0 and 1"));
        }
        if self.volatility < Decimal::ZERO {
            return Err(self.invalid("volatility", "Volatility cannot be negative"));
        }
        if !(1..=10).contains(&self.liquidity_score) {
            return Err(self.invalid("liquidity_score", "Liquidity score must be between 1 and 10"));
        }
        if let Some(coupon) = self.coupon_rate {
            if coupon < Decimal::ZERO {
                return Err(self.invalid("coupon_rate", "Coupon rate cannot be negative"));
            }
        }
        Ok(())
    }

    fn invalid(&self, field: &str, reason: &str) -> RiskAnalyticsError {
        RiskAnalyticsError::InvalidInput {
            field: format!("positions.{}.{}", self.id, field),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
