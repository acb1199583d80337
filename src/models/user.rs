use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct User {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_oid_as_hex"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub email: String, // unique index
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

/// Emails are stored and matched trimmed and lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateUserRequest> for User {
    /// Role is never taken from the client.
    fn from(req: CreateUserRequest) -> Self {
        User {
            id: None,
            email: normalize_email(&req.email),
            name: req.name,
            location: req.location,
            phone: req.phone,
            role: default_role(),
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name);
        }
        if let Some(location) = &self.location {
            set.insert("location", location);
        }
        if let Some(phone) = &self.phone {
            set.insert("phone", phone);
        }
        set
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub message: String,
    pub inserted_id: Option<String>,
}
