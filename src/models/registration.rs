use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationStatus::Pending => "Pending",
            ConfirmationStatus::Confirmed => "Confirmed",
            ConfirmationStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Pending" => Some(ConfirmationStatus::Pending),
            "Confirmed" => Some(ConfirmationStatus::Confirmed),
            "Cancelled" => Some(ConfirmationStatus::Cancelled),
            _ => None,
        }
    }

    /// Pending may move to Confirmed or Cancelled; both of those are final.
    pub fn can_transition_to(self, next: ConfirmationStatus) -> bool {
        matches!(
            (self, next),
            (ConfirmationStatus::Pending, ConfirmationStatus::Confirmed)
                | (ConfirmationStatus::Pending, ConfirmationStatus::Cancelled)
        )
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant's enrollment in a camp (stored in `participants`)
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    /// Hex id of the parent campaign
    pub camp_id: String,
    #[serde(default)]
    pub camp_name: Option<String>,
    #[serde(default)]
    pub camp_fees: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub healthcare_professional: Option<String>,
    pub participant_name: String,
    pub participant_email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    pub payment_status: PaymentStatus,
    pub confirmation_status: ConfirmationStatus,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub camp_id: String,
    pub participant_name: String,
    pub participant_email: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfirmationRequest {
    pub confirmation_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_stored_spelling() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::Unpaid).unwrap(),
            serde_json::json!("unpaid")
        );
        assert_eq!(
            serde_json::to_value(ConfirmationStatus::Pending).unwrap(),
            serde_json::json!("Pending")
        );
        assert_eq!(
            mongodb::bson::to_bson(&PaymentStatus::Paid).unwrap(),
            mongodb::bson::Bson::String("paid".into())
        );
    }

    #[test]
    fn only_pending_can_move() {
        use ConfirmationStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn parse_rejects_free_text() {
        assert_eq!(ConfirmationStatus::parse(" Confirmed "), Some(ConfirmationStatus::Confirmed));
        assert_eq!(ConfirmationStatus::parse("confirmed"), None);
        assert_eq!(ConfirmationStatus::parse("Approved"), None);
    }
}
