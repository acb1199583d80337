pub mod campaign;
pub mod payment;
pub mod registration;
pub mod results;
pub mod review;
pub mod user;

pub use campaign::*;
pub use payment::*;
pub use registration::*;
pub use results::*;
pub use review::*;
pub use user::*;

use mongodb::bson::oid::ObjectId;
use serde::Serializer;

/// Writes `_id` as a plain hex string for JSON clients.
///
/// Models are only serialized to BSON without an id (inserts), so the
/// hex form never reaches the database.
pub fn serialize_oid_as_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}
