//! Deal entity and the closed set of deal statuses

use serde::{Serialize, Serializer};
use std::fmt;

/// Стадия сделки. Набор закрыт: любые другие значения отклоняются при загрузке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DealStatus {
    ClosedWon,
    InProgress,
    ClosedLost,
}

impl DealStatus {
    pub const ALL: [DealStatus; 3] = [
        DealStatus::ClosedWon,
        DealStatus::InProgress,
        DealStatus::ClosedLost,
    ];

    /// Wire name used in the dataset file and in analytics keys
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::ClosedWon => "Closed Won",
            DealStatus::InProgress => "In Progress",
            DealStatus::ClosedLost => "Closed Lost",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DealStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A sales opportunity with a monetary value and a status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub client: String,
    pub value: f64,
    pub status: DealStatus,
}

impl Deal {
    pub fn new(client: impl Into<String>, value: f64, status: DealStatus) -> Self {
        Self {
            client: client.into(),
            value,
            status,
        }
    }
}
