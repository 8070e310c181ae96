use super::deal::{Deal, DealStatus};
use serde::{Deserialize, Serialize};

/// Client account owned by a sales representative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub industry: String,
    pub contact: String,
}

/// Sales representative with their pipeline and accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRep {
    pub id: u64,
    pub name: String,
    pub role: String,
    pub region: String,
    pub skills: Vec<String>,
    pub deals: Vec<Deal>,
    pub clients: Vec<Client>,
}

impl SalesRep {
    pub fn total_deal_value(&self) -> f64 {
        self.deals.iter().map(|d| d.value).sum()
    }

    pub fn deals_with_status(&self, status: DealStatus) -> impl Iterator<Item = &Deal> {
        self.deals.iter().filter(move |d| d.status == status)
    }

    pub fn value_with_status(&self, status: DealStatus) -> f64 {
        self.deals_with_status(status).map(|d| d.value).sum()
    }
}
