use kernel::repository::application::Decision;
use serde::{Deserialize, Serialize};

use super::{vendor::VendorResponse, venue::VenueResponse};

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecisionName {
    Approve,
    Reject,
}

impl From<DecisionName> for Decision {
    fn from(value: DecisionName) -> Self {
        match value {
            DecisionName::Approve => Decision::Approve,
            DecisionName::Reject => Decision::Reject,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub decision: DecisionName,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVendorsResponse {
    pub items: Vec<VendorResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVenuesResponse {
    pub items: Vec<VenueResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_is_lowercase() {
        let req: DecisionRequest =
            serde_json::from_value(serde_json::json!({ "decision": "approve" })).unwrap();
        assert_eq!(req.decision, DecisionName::Approve);
        assert!(serde_json::from_value::<DecisionRequest>(serde_json::json!({
            "decision": "maybe"
        }))
        .is_err());
    }
}
