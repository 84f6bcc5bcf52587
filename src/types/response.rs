//! Success payloads returned by transitions and queries

use serde_json::json;

use super::error::WorkflowError;
use super::shipment::BillOfLading;

/// Successful outcome of an invocation
///
/// Transitions return `Empty`; queries return a small projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Empty,
    Status(String),
    Balance(i64),
    Location(String),
    ArrivalDate(String),
    BillOfLading(BillOfLading),
}

impl Response {
    /// Encode the response as the JSON payload handed back to the caller
    ///
    /// `Empty` has no payload. The bill of lading is returned as the raw
    /// record; the other projections are single-field objects.
    pub fn payload(&self) -> Result<Option<String>, WorkflowError> {
        let value = match self {
            Response::Empty => return Ok(None),
            Response::Status(status) => json!({ "Status": status }),
            Response::Balance(balance) => json!({ "Balance": balance.to_string() }),
            Response::Location(location) => json!({ "Location": location }),
            Response::ArrivalDate(date) => json!({ "ArrivalDate": date }),
            Response::BillOfLading(bill) => serde_json::to_value(bill)?,
        };
        Ok(Some(value.to_string()))
    }
}
