use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Free-form participant feedback; only the id is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex"
    )]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub body: Document,
}

impl Review {
    /// Builds an insertable review from a JSON object, dropping any client-chosen `_id`.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(_) => {
                let mut body = mongodb::bson::to_document(&value).ok()?;
                body.remove("_id");
                Some(Review { id: None, body })
            }
            _ => None,
        }
    }
}
