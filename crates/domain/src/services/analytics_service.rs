//! Sales analytics - aggregate statistics over the in-memory dataset
//!
//! Pure functions of the dataset; safe to call concurrently on every request.

use crate::entities::{Dataset, DealStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::AddAssign;

/// One value per deal status, keyed by the status wire names
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTally<T> {
    #[serde(rename = "Closed Won")]
    pub closed_won: T,
    #[serde(rename = "In Progress")]
    pub in_progress: T,
    #[serde(rename = "Closed Lost")]
    pub closed_lost: T,
}

impl<T: Copy> StatusTally<T> {
    pub fn get(&self, status: DealStatus) -> T {
        match status {
            DealStatus::ClosedWon => self.closed_won,
            DealStatus::InProgress => self.in_progress,
            DealStatus::ClosedLost => self.closed_lost,
        }
    }

    pub fn values(&self) -> [T; 3] {
        [self.closed_won, self.in_progress, self.closed_lost]
    }
}

impl<T: AddAssign> StatusTally<T> {
    pub fn add(&mut self, status: DealStatus, amount: T) {
        match status {
            DealStatus::ClosedWon => self.closed_won += amount,
            DealStatus::InProgress => self.in_progress += amount,
            DealStatus::ClosedLost => self.closed_lost += amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_deal_count: usize,
    pub deal_status_summary: StatusTally<usize>,
    pub deal_value_by_status: StatusTally<f64>,
    pub total_deal_value: f64,
    /// 0 when there are no deals
    pub average_deal_value: f64,
    /// Distinct region names, sorted
    pub region_distribution: Vec<String>,
}

pub fn compute_analytics(dataset: &Dataset) -> SalesAnalytics {
    let mut total_deal_count = 0usize;
    let mut total_deal_value = 0.0f64;
    let mut deal_status_summary = StatusTally::<usize>::default();
    let mut deal_value_by_status = StatusTally::<f64>::default();

    for deal in dataset.deals() {
        total_deal_count += 1;
        total_deal_value += deal.value;
        deal_status_summary.add(deal.status, 1);
        deal_value_by_status.add(deal.status, deal.value);
    }

    let average_deal_value = if total_deal_count > 0 {
        total_deal_value / total_deal_count as f64
    } else {
        0.0
    };

    let region_distribution: BTreeSet<&str> = dataset
        .sales_reps
        .iter()
        .map(|rep| rep.region.as_str())
        .collect();

    SalesAnalytics {
        total_deal_count,
        deal_status_summary,
        deal_value_by_status,
        total_deal_value,
        average_deal_value,
        region_distribution: region_distribution.into_iter().map(String::from).collect(),
    }
}
