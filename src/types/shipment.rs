//! Shipment location and bill of lading records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current location of a shipment
///
/// Locations are free-form; two values carry meaning for the workflow.
/// `Source` marks a prepared shipment and `Destination` marks arrival.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentLocation {
    /// Goods prepared at the exporter's port
    Source,
    /// Goods arrived at the importer's port
    Destination,
    /// Any other carrier-reported location
    Elsewhere(String),
}

impl ShipmentLocation {
    pub const SOURCE: &'static str = "SOURCE";
    pub const DESTINATION: &'static str = "DESTINATION";
}

impl From<String> for ShipmentLocation {
    fn from(value: String) -> Self {
        if value == Self::SOURCE {
            ShipmentLocation::Source
        } else if value == Self::DESTINATION {
            ShipmentLocation::Destination
        } else {
            ShipmentLocation::Elsewhere(value)
        }
    }
}

impl From<&str> for ShipmentLocation {
    fn from(value: &str) -> Self {
        ShipmentLocation::from(value.to_string())
    }
}

impl From<ShipmentLocation> for String {
    fn from(location: ShipmentLocation) -> Self {
        location.to_string()
    }
}

impl fmt::Display for ShipmentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str(Self::SOURCE),
            Self::Destination => f.write_str(Self::DESTINATION),
            Self::Elsewhere(other) => f.write_str(other),
        }
    }
}

/// Carrier's receipt and title document for goods in transit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfLading {
    pub id: String,
    pub expiration_date: String,
    pub exporter: String,
    pub carrier: String,
    pub description_of_goods: String,
    pub amount: i64,
    pub beneficiary: String,
    pub source_port: String,
    pub destination_port: String,
}
