use crate::{
    database::{
        parse_id,
        query::{page_window, CampaignQuery, Page},
        MongoDB, CAMPAIGNS,
    },
    models::{
        Campaign, CreateCampaignRequest, DeletedResponse, InsertedResponse, UpdateCampaignRequest,
        UpdatedResponse,
    },
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

const POPULAR_LIMIT: i64 = 6;

pub async fn list_campaigns(db: &MongoDB, query: &CampaignQuery) -> Result<Vec<Campaign>, AppError> {
    let mut options = FindOptions::default();
    options.sort = query.sort();

    let cursor = db
        .collection::<Campaign>(CAMPAIGNS)
        .find(query.filter())
        .with_options(options)
        .await?;

    Ok(cursor.try_collect().await?)
}

pub async fn list_campaigns_page(
    db: &MongoDB,
    query: &CampaignQuery,
    page: i64,
) -> Result<Page<Campaign>, AppError> {
    let (skip, limit) = page_window(page)?;
    let collection = db.collection::<Campaign>(CAMPAIGNS);
    let filter = query.filter();

    let mut options = FindOptions::default();
    // A stable tiebreak keeps pages disjoint when the sort key repeats.
    options.sort = Some(match query.sort() {
        Some(mut sort) => {
            sort.insert("_id", 1);
            sort
        }
        None => doc! { "_id": 1 },
    });
    options.skip = u64::try_from(skip).ok();
    options.limit = Some(limit);

    let total = collection.count_documents(filter.clone()).await?;
    let cursor = collection.find(filter).with_options(options).await?;
    let items: Vec<Campaign> = cursor.try_collect().await?;

    Ok(Page::new(items, total, page))
}

pub async fn popular_campaigns(db: &MongoDB) -> Result<Vec<Campaign>, AppError> {
    let options = FindOptions::builder()
        .sort(doc! { "participantCount": -1 })
        .limit(POPULAR_LIMIT)
        .build();

    let cursor = db
        .collection::<Campaign>(CAMPAIGNS)
        .find(doc! {})
        .with_options(options)
        .await?;

    Ok(cursor.try_collect().await?)
}

pub async fn get_campaign(db: &MongoDB, id: &str) -> Result<Campaign, AppError> {
    let oid = parse_id(id, "camp")?;
    db.collection::<Campaign>(CAMPAIGNS)
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or_else(|| AppError::NotFound("Camp not found".to_string()))
}

pub async fn create_campaign(
    db: &MongoDB,
    request: CreateCampaignRequest,
) -> Result<InsertedResponse, AppError> {
    if request.camp_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("campName is required".to_string()));
    }
    if !request.camp_fees.is_finite() || request.camp_fees < 0.0 {
        return Err(AppError::InvalidRequest("campFees must be zero or positive".to_string()));
    }

    let campaign = Campaign::from(request);
    let result = db
        .collection::<Campaign>(CAMPAIGNS)
        .insert_one(&campaign)
        .await?;

    log::info!("✅ Camp created: {}", campaign.camp_name);
    Ok(result.into())
}

pub async fn update_campaign(
    db: &MongoDB,
    id: &str,
    request: &UpdateCampaignRequest,
) -> Result<UpdatedResponse, AppError> {
    let oid = parse_id(id, "camp")?;
    let set = request.to_set_document();
    if set.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }
    if let Some(fee) = request.camp_fees {
        if !fee.is_finite() || fee < 0.0 {
            return Err(AppError::InvalidRequest("campFees must be zero or positive".to_string()));
        }
    }

    let result = db
        .collection::<Campaign>(CAMPAIGNS)
        .update_one(doc! { "_id": oid }, doc! { "$set": set })
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Camp not found".to_string()));
    }
    Ok(result.into())
}

/// Registrations that reference the camp are left in place.
pub async fn delete_campaign(db: &MongoDB, id: &str) -> Result<DeletedResponse, AppError> {
    let oid = parse_id(id, "camp")?;
    let result = db
        .collection::<Campaign>(CAMPAIGNS)
        .delete_one(doc! { "_id": oid })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Camp not found".to_string()));
    }
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{query::PAGE_SIZE, test_db};

    fn camp(name: &str, fee: f64) -> CreateCampaignRequest {
        CreateCampaignRequest {
            camp_name: name.to_string(),
            image: None,
            camp_fees: fee,
            date: "2024-06-01".to_string(),
            time: None,
            location: "Dhaka".to_string(),
            healthcare_professional: "Dr. Rahman".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn pagination_reports_full_total() {
        let db = test_db().await;
        for i in 0..23 {
            create_campaign(&db, camp(&format!("Camp {:02}", i), 10.0)).await.unwrap();
        }

        let query = CampaignQuery::default();
        for (page, expected) in [(1, 10), (2, 10), (3, 3), (4, 0)] {
            let result = list_campaigns_page(&db, &query, page).await.unwrap();
            assert_eq!(result.items.len(), expected);
            assert_eq!(result.total, 23);
            assert_eq!(result.page_size, PAGE_SIZE);
        }

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn sort_by_fee_is_ascending() {
        let db = test_db().await;
        for (name, fee) in [("B", 30.0), ("A", 10.0), ("C", 20.0)] {
            create_campaign(&db, camp(name, fee)).await.unwrap();
        }

        let query = CampaignQuery { search: None, sort_by: Some("Camp_Fees".into()) };
        let fees: Vec<f64> = list_campaigns(&db, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.camp_fees)
            .collect();
        assert_eq!(fees, vec![10.0, 20.0, 30.0]);

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn missing_camp_is_not_found() {
        let db = test_db().await;
        let err = get_campaign(&db, &mongodb::bson::oid::ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        db.database().drop().await.unwrap();
    }
}
