use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::RiskAnalyticsError;
use crate::types::Money;
use crate::RiskAnalyticsResult;

use super::CollateralPosition;

/// The collateral snapshot the analytics run against.
///
/// Positions are validated on the way in and are only ever replaced
/// wholesale; nothing hands out mutable access to a stored position.
#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    positions: Vec<CollateralPosition>,
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a position.
    pub fn add(&mut self, position: CollateralPosition) -> RiskAnalyticsResult<()> {
        if let Err(e) = position.validate() {
            warn!(position = %position.id, error = %e, "rejected collateral position");
            return Err(e);
        }
        if self.positions.iter().any(|p| p.id == position.id) {
            return Err(RiskAnalyticsError::DuplicateId {
                kind: "position".into(),
                id: position.id,
            });
        }
        self.positions.push(position);
        Ok(())
    }

    /// Swap in a whole new snapshot. Every position is validated first; on
    /// any failure the current snapshot is left as it was.
    pub fn replace(&mut self, positions: Vec<CollateralPosition>) -> RiskAnalyticsResult<()> {
        let mut seen = HashSet::with_capacity(positions.len());
        for position in &positions {
            if let Err(e) = position.validate() {
                warn!(position = %position.id, error = %e, "rejected collateral snapshot");
                return Err(e);
            }
            if !seen.insert(position.id.as_str()) {
                return Err(RiskAnalyticsError::DuplicateId {
                    kind: "position".into(),
                    id: position.id.clone(),
                });
            }
        }
        self.positions = positions;
        Ok(())
    }

    pub fn get(&self, id: &str) -> RiskAnalyticsResult<&CollateralPosition> {
        self.positions
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| RiskAnalyticsError::UnknownPosition(id.to_string()))
    }

    pub fn positions(&self) -> &[CollateralPosition] {
        &self.positions
    }

    /// Owned copy for analyses that need to shock values.
    pub fn snapshot(&self) -> Vec<CollateralPosition> {
        self.positions.clone()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_market_value(&self) -> Money {
        total_market_value(&self.positions)
    }
}

/// Sum of market values across a position set.
pub fn total_market_value(positions: &[CollateralPosition]) -> Money {
    positions.iter().map(|p| p.market_value).sum::<Decimal>()
}
