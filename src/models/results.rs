use mongodb::bson::Bson;
use mongodb::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use serde::Serialize;

/// Write acknowledgements returned to clients, with ids rendered as hex.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub acknowledged: bool,
    pub inserted_id: Option<String>,
}

impl From<InsertOneResult> for InsertedResponse {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertedManyResponse {
    pub acknowledged: bool,
    pub inserted_count: usize,
    pub inserted_ids: Vec<String>,
}

impl From<InsertManyResult> for InsertedManyResponse {
    fn from(result: InsertManyResult) -> Self {
        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        let inserted_ids: Vec<String> = ids.iter().filter_map(|(_, id)| id_to_string(id)).collect();
        Self {
            acknowledged: true,
            inserted_count: inserted_ids.len(),
            inserted_ids,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdatedResponse {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeletedResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

fn id_to_string(id: &Bson) -> Option<String> {
    match id {
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::String(s) => Some(s.clone()),
        Bson::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn ids_render_as_hex() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), Some(oid.to_hex()));
        assert_eq!(id_to_string(&Bson::String("r-1".into())), Some("r-1".into()));
        assert_eq!(id_to_string(&Bson::Null), None);
    }
}
