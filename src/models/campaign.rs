use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Medical camp (stored in the `campains` collection)
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub camp_name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub camp_fees: f64,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub location: String,
    pub healthcare_professional: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub participant_count: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub camp_name: String,
    pub image: Option<String>,
    pub camp_fees: f64,
    pub date: String,
    pub time: Option<String>,
    pub location: String,
    pub healthcare_professional: String,
    pub description: Option<String>,
}

impl From<CreateCampaignRequest> for Campaign {
    fn from(req: CreateCampaignRequest) -> Self {
        Campaign {
            id: None,
            camp_name: req.camp_name,
            image: req.image,
            camp_fees: req.camp_fees,
            date: req.date,
            time: req.time,
            location: req.location,
            healthcare_professional: req.healthcare_professional,
            description: req.description,
            participant_count: 0,
        }
    }
}

/// Partial update; `participantCount` is only ever changed by registrations.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub camp_name: Option<String>,
    pub image: Option<String>,
    pub camp_fees: Option<f64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub healthcare_professional: Option<String>,
    pub description: Option<String>,
}

impl UpdateCampaignRequest {
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(v) = &self.camp_name {
            set.insert("campName", v);
        }
        if let Some(v) = &self.image {
            set.insert("image", v);
        }
        if let Some(v) = self.camp_fees {
            set.insert("campFees", v);
        }
        if let Some(v) = &self.date {
            set.insert("date", v);
        }
        if let Some(v) = &self.time {
            set.insert("time", v);
        }
        if let Some(v) = &self.location {
            set.insert("location", v);
        }
        if let Some(v) = &self.healthcare_professional {
            set.insert("healthcareProfessional", v);
        }
        if let Some(v) = &self.description {
            set.insert("description", v);
        }
        set
    }
}
