//! Dataset - the whole sales team, loaded once and never mutated
//!
//! Parsing goes through a raw mirror of the file schema so that schema
//! problems surface as specific `DomainError`s instead of a generic serde
//! message.

use super::deal::{Deal, DealStatus};
use super::sales_rep::{Client, SalesRep};
use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub sales_reps: Vec<SalesRep>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    sales_reps: Vec<RawSalesRep>,
}

#[derive(Deserialize)]
struct RawSalesRep {
    id: u64,
    name: String,
    role: String,
    region: String,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    deals: Vec<RawDeal>,
    #[serde(default)]
    clients: Vec<Client>,
}

#[derive(Deserialize)]
struct RawDeal {
    client: String,
    value: f64,
    status: String,
}

impl Dataset {
    pub fn new(sales_reps: Vec<SalesRep>) -> DomainResult<Self> {
        let dataset = Self { sales_reps };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parse and validate dataset JSON.
    pub fn from_json_slice(bytes: &[u8]) -> DomainResult<Self> {
        let raw: RawDataset = serde_json::from_slice(bytes)
            .map_err(|e| DomainError::MalformedDataset(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDataset) -> DomainResult<Self> {
        let mut sales_reps = Vec::with_capacity(raw.sales_reps.len());
        for rep in raw.sales_reps {
            let mut deals = Vec::with_capacity(rep.deals.len());
            for deal in rep.deals {
                let status = DealStatus::parse(&deal.status).ok_or_else(|| {
                    DomainError::UnknownDealStatus {
                        rep_id: rep.id,
                        client: deal.client.clone(),
                        status: deal.status.clone(),
                    }
                })?;
                deals.push(Deal::new(deal.client, deal.value, status));
            }

            sales_reps.push(SalesRep {
                id: rep.id,
                name: rep.name,
                role: rep.role,
                region: rep.region,
                skills: rep.skills,
                deals,
                clients: rep.clients,
            });
        }

        Self::new(sales_reps)
    }

    fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::with_capacity(self.sales_reps.len());
        for rep in &self.sales_reps {
            if !seen.insert(rep.id) {
                return Err(DomainError::DuplicateRepId(rep.id));
            }
            for deal in &rep.deals {
                if !deal.value.is_finite() || deal.value < 0.0 {
                    return Err(DomainError::InvalidDealValue {
                        rep_id: rep.id,
                        client: deal.client.clone(),
                        value: deal.value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn deals(&self) -> impl Iterator<Item = &Deal> {
        self.sales_reps.iter().flat_map(|rep| rep.deals.iter())
    }

    pub fn rep_count(&self) -> usize {
        self.sales_reps.len()
    }
}

/// Deserializing always validates
impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDataset::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "salesReps": [
            {
                "id": 1,
                "name": "Alice",
                "role": "Senior Sales Executive",
                "region": "North America",
                "skills": ["Negotiation", "CRM"],
                "deals": [
                    {"client": "Acme Corp", "value": 120000, "status": "Closed Won"},
                    {"client": "Globex", "value": 50000, "status": "In Progress"}
                ],
                "clients": [
                    {"name": "Acme Corp", "industry": "Manufacturing", "contact": "jane@acme.com"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_valid_dataset() {
        let dataset = Dataset::from_json_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rep_count(), 1);
        let rep = &dataset.sales_reps[0];
        assert_eq!(rep.skills, vec!["Negotiation", "CRM"]);
        assert_eq!(rep.deals[0].status, DealStatus::ClosedWon);
        assert_eq!(rep.deals[1].value, 50000.0);
        assert_eq!(rep.clients[0].industry, "Manufacturing");
    }

    #[test]
    fn test_serializes_with_source_field_names() {
        let dataset = Dataset::from_json_slice(SAMPLE.as_bytes()).unwrap();
        let value = serde_json::to_value(&dataset).unwrap();
        assert!(value.get("salesReps").is_some());
        assert_eq!(value["salesReps"][0]["deals"][0]["status"], "Closed Won");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = SAMPLE.replace("\"In Progress\"", "\"On Hold\"");
        let err = Dataset::from_json_slice(json.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownDealStatus {
                rep_id: 1,
                client: "Globex".to_string(),
                status: "On Hold".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_value_rejected() {
        let json = SAMPLE.replace("50000", "-5");
        let err = Dataset::from_json_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDealValue { value, .. } if value == -5.0));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let err = Dataset::from_json_slice(br#"{"reps": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDataset(_)));

        let err = Dataset::from_json_slice(b"not json").unwrap_err();
        assert!(matches!(err, DomainError::MalformedDataset(_)));
    }

    #[test]
    fn test_duplicate_rep_ids_rejected() {
        let rep = SalesRep {
            id: 7,
            name: "Bob".to_string(),
            role: "SDR".to_string(),
            region: "Europe".to_string(),
            skills: vec![],
            deals: vec![],
            clients: vec![],
        };
        let err = Dataset::new(vec![rep.clone(), rep]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateRepId(7));
    }

    #[test]
    fn test_serde_deserialize_validates() {
        let parsed: Dataset = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(parsed, Dataset::from_json_slice(SAMPLE.as_bytes()).unwrap());

        let negative = SAMPLE.replace("50000", "-5");
        let err = serde_json::from_str::<Dataset>(&negative).unwrap_err();
        assert!(err.to_string().contains("Invalid deal value"));

        let unknown = SAMPLE.replace("\"In Progress\"", "\"On Hold\"");
        let err = serde_json::from_str::<Dataset>(&unknown).unwrap_err();
        assert!(err.to_string().contains("'On Hold'"));
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let dataset = Dataset::from_json_slice(br#"{"salesReps": []}"#).unwrap();
        assert_eq!(dataset.rep_count(), 0);
        assert_eq!(dataset.deals().count(), 0);
    }
}
