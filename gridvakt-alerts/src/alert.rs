//! Alert types and lifecycle events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gridvakt_core::topology::NodeId;
use gridvakt_detection::Severity;

/// Which inference rule produced an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertRule {
    DirectFailure,
    CascadeRisk,
}

/// De-duplication key. One alert is ACTIVE per key at any time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    pub source: NodeId,
    /// `None` for direct failures.
    pub victim: Option<NodeId>,
    pub rule: AlertRule,
}

impl AlertKey {
    pub fn direct(source: NodeId) -> Self {
        Self {
            source,
            victim: None,
            rule: AlertRule::DirectFailure,
        }
    }

    pub fn cascade(source: NodeId, victim: NodeId) -> Self {
        Self {
            source,
            victim: Some(victim),
            rule: AlertRule::CascadeRisk,
        }
    }
}

/// One active (or just-retired) alert. Created and destroyed only by the
/// lifecycle manager; other components receive copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub key: AlertKey,
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub last_renewed_at: DateTime<Utc>,
    /// `None` for CRITICAL alerts, which never expire on their own.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Lifecycle event delivered to the alert sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum AlertEvent {
    Raised(Alert),
    Renewed(Alert),
    Expired(Alert),
    Cleared(Alert),
}

impl AlertEvent {
    pub fn alert(&self) -> &Alert {
        match self {
            Self::Raised(a) | Self::Renewed(a) | Self::Expired(a) | Self::Cleared(a) => a,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Raised(_) => "raised",
            Self::Renewed(_) => "renewed",
            Self::Expired(_) => "expired",
            Self::Cleared(_) => "cleared",
        }
    }
}
