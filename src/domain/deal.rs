use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

pub const NO_DATA_MESSAGE: &str = "No prices found";

/// Which product a price belongs to.
///
/// `Position` is the i-th item scraped from a page (1-based). Position i on
/// one site is only assumed, not known, to be the same product as position i
/// on another; use `Keyed` when the caller has a real product key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotIdentity {
    Position(usize),
    Keyed(String),
}

impl SlotIdentity {
    /// Slot for a zero-based list index.
    pub fn at_index(index: usize) -> Self {
        SlotIdentity::Position(index + 1)
    }
}

impl fmt::Display for SlotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotIdentity::Position(n) => write!(f, "Product {}", n),
            SlotIdentity::Keyed(key) => f.write_str(key),
        }
    }
}

impl Serialize for SlotIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestDeal {
    pub url: String,
    pub price: f64,
}

/// Slot -> cheapest offer, in the order slots were first seen.
pub type BestDeals = IndexMap<SlotIdentity, BestDeal>;

#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// The catalog had no pages at all.
    NoData,
    Deals(BestDeals),
}

impl Comparison {
    pub fn deals(&self) -> Option<&BestDeals> {
        match self {
            Comparison::NoData => None,
            Comparison::Deals(deals) => Some(deals),
        }
    }
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Comparison::NoData => serializer.serialize_str(NO_DATA_MESSAGE),
            Comparison::Deals(deals) => deals.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_labels_are_one_based() {
        assert_eq!(SlotIdentity::at_index(0).to_string(), "Product 1");
        assert_eq!(SlotIdentity::at_index(9).to_string(), "Product 10");
        assert_eq!(SlotIdentity::Keyed("akubra".into()).to_string(), "akubra");
    }

    #[test]
    fn comparison_serializes_deals_by_slot_label() {
        let mut deals = BestDeals::new();
        deals.insert(
            SlotIdentity::at_index(0),
            BestDeal {
                url: "B".to_string(),
                price: 9.99,
            },
        );

        let json = serde_json::to_value(Comparison::Deals(deals)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Product 1": {"url": "B", "price": 9.99}})
        );
    }

    #[test]
    fn no_data_serializes_as_message() {
        let json = serde_json::to_value(Comparison::NoData).unwrap();
        assert_eq!(json, serde_json::json!("No prices found"));
    }
}
