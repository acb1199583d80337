use crate::{
    database::{MongoDB, REVIEWS},
    models::{InsertedManyResponse, InsertedResponse, Review},
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use serde_json::Value;

pub async fn list_reviews(db: &MongoDB) -> Result<Vec<Review>, AppError> {
    let cursor = db.collection::<Review>(REVIEWS).find(doc! {}).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn add_review(db: &MongoDB, body: Value) -> Result<InsertedResponse, AppError> {
    let review = Review::from_json(body)
        .ok_or_else(|| AppError::InvalidRequest("Review must be a JSON object".to_string()))?;

    let result = db.collection::<Review>(REVIEWS).insert_one(&review).await?;
    Ok(result.into())
}

/// Seeds the reviews collection from an array of objects.
pub async fn import_reviews(
    db: &MongoDB,
    items: Vec<Value>,
) -> Result<InsertedManyResponse, AppError> {
    if items.is_empty() {
        return Err(AppError::InvalidRequest("Expected a non-empty array".to_string()));
    }

    let reviews = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Review::from_json(item).ok_or_else(|| {
                AppError::InvalidRequest(format!("Item {} is not a JSON object", index))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let result = db
        .collection::<Review>(REVIEWS)
        .insert_many(&reviews)
        .await?;

    log::info!("✅ Imported {} reviews", result.inserted_ids.len());
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_db;
    use serde_json::json;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn import_then_list() {
        let db = test_db().await;

        let imported = import_reviews(
            &db,
            vec![
                json!({ "name": "Ayesha", "rating": 5 }),
                json!({ "name": "Jamal", "rating": 4 }),
            ],
        )
        .await
        .unwrap();
        assert_eq!(imported.inserted_count, 2);

        add_review(&db, json!({ "name": "Sadia", "feedback": "Quick checkup" }))
            .await
            .unwrap();

        let reviews = list_reviews(&db).await.unwrap();
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|r| r.id.is_some()));

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn import_rejects_non_objects_without_writing() {
        let db = test_db().await;

        let err = import_reviews(&db, vec![json!({ "ok": true }), json!(42)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(list_reviews(&db).await.unwrap().is_empty());

        db.database().drop().await.unwrap();
    }
}
