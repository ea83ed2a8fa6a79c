//! Progress notifications
//!
//! Events are delivered synchronously to every registered observer, fire
//! and forget. Observers cannot fail the computation that emitted them.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::report::RiskRating;
use crate::types::{Money, Rate};

/// Notification emitted by the engine as analyses complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RiskEvent {
    PositionAdded { id: String },
    PositionsLoaded { count: usize },
    ScenarioAdded { id: String },
    VarComputed { confidence: Rate, parametric_var: Money, simulated_var: Money },
    StressCompleted { scenario_count: usize, margin_calls: usize },
    BorrowingBaseComputed { total_net_eligible: Money, available_capacity: Money },
    ReportGenerated { id: String, rating: RiskRating },
}

impl RiskEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RiskEvent::PositionAdded { .. } => "position:added",
            RiskEvent::PositionsLoaded { .. } => "positions:loaded",
            RiskEvent::ScenarioAdded { .. } => "scenario:added",
            RiskEvent::VarComputed { .. } => "var:computed",
            RiskEvent::StressCompleted { .. } => "stress:completed",
            RiskEvent::BorrowingBaseComputed { .. } => "borrowing_base:computed",
            RiskEvent::ReportGenerated { .. } => "report:generated",
        }
    }
}

/// Receiver of engine progress events.
pub trait RiskObserver: Send + Sync {
    fn on_event(&self, event: &RiskEvent);
}

/// Observer that keeps every event it receives, in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RiskEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RiskEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(RiskEvent::name).collect()
    }
}

impl RiskObserver for EventLog {
    fn on_event(&self, event: &RiskEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
