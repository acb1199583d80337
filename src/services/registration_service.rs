use crate::{
    database::{
        parse_id, pipelines,
        query::{page_window, Page},
        MongoDB, CAMPAIGNS, PARTICIPANTS,
    },
    models::{
        normalize_email, Campaign, ConfirmationStatus, DeletedResponse, InsertedResponse,
        PaymentStatus, RegisterRequest, Registration, UpdatedResponse,
    },
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::ClientSession;

/// Inserts an unpaid, pending registration and bumps the camp's participant
/// count in one transaction.
pub async fn register_participant(
    db: &MongoDB,
    request: RegisterRequest,
) -> Result<InsertedResponse, AppError> {
    let camp_oid = parse_id(&request.camp_id, "camp")?;
    if request.participant_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("participantName is required".to_string()));
    }
    let email = normalize_email(&request.participant_email);
    if email.is_empty() {
        return Err(AppError::InvalidRequest("participantEmail is required".to_string()));
    }

    let inserted = db
        .transaction(|mut session| {
            let (email, request) = (&email, &request);
            async move {
                let result = insert_registration(db, &mut session, camp_oid, email, request).await;
                (session, result)
            }
        })
        .await?;

    log::info!("✅ Registered for camp {}", camp_oid.to_hex());
    Ok(inserted)
}

async fn insert_registration(
    db: &MongoDB,
    session: &mut ClientSession,
    camp_oid: ObjectId,
    email: &str,
    request: &RegisterRequest,
) -> Result<InsertedResponse, AppError> {
    let campaigns = db.collection::<Campaign>(CAMPAIGNS);

    let camp = campaigns
        .find_one(doc! { "_id": camp_oid })
        .session(&mut *session)
        .await?
        .ok_or_else(|| AppError::NotFound("Camp not found".to_string()))?;

    let registration = Registration {
        id: None,
        camp_id: camp_oid.to_hex(),
        camp_name: Some(camp.camp_name),
        camp_fees: Some(camp.camp_fees),
        location: Some(camp.location),
        healthcare_professional: Some(camp.healthcare_professional),
        participant_name: request.participant_name.trim().to_string(),
        participant_email: email.to_string(),
        age: request.age,
        phone: request.phone.clone(),
        gender: request.gender.clone(),
        emergency_contact: request.emergency_contact.clone(),
        payment_status: PaymentStatus::Unpaid,
        confirmation_status: ConfirmationStatus::Pending,
    };

    let inserted = db
        .collection::<Registration>(PARTICIPANTS)
        .insert_one(&registration)
        .session(&mut *session)
        .await
        .map_err(|e| AppError::from_write(e, "Already registered for this camp"))?;

    campaigns
        .update_one(doc! { "_id": camp_oid }, doc! { "$inc": { "participantCount": 1 } })
        .session(&mut *session)
        .await?;

    Ok(inserted.into())
}

/// Cancels a registration. The camp's participant count is not decremented.
pub async fn delete_registration(db: &MongoDB, id: &str) -> Result<DeletedResponse, AppError> {
    let oid = parse_id(id, "registration")?;
    let result = db
        .collection::<Registration>(PARTICIPANTS)
        .delete_one(doc! { "_id": oid })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Registration not found".to_string()));
    }
    Ok(result.into())
}

pub async fn get_registration(db: &MongoDB, id: &str) -> Result<Registration, AppError> {
    let oid = parse_id(id, "registration")?;
    db.collection::<Registration>(PARTICIPANTS)
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))
}

pub async fn all_registrations(db: &MongoDB) -> Result<Vec<Document>, AppError> {
    aggregate(db, pipelines::registrations_with_camp(None)).await
}

/// One page of the joined view. The total counts joined rows, so registrations whose
/// camp was deleted are neither listed nor counted.
pub async fn registrations_page(db: &MongoDB, page: i64) -> Result<Page<Document>, AppError> {
    let (skip, limit) = page_window(page)?;
    let faceted = aggregate(db, pipelines::registrations_with_camp_page(skip, limit)).await?;
    let (items, total) = faceted
        .first()
        .map(split_facet)
        .unwrap_or_default();
    Ok(Page::new(items, total, page))
}

fn split_facet(result: &Document) -> (Vec<Document>, u64) {
    let items = result
        .get_array("items")
        .map(|items| items.iter().filter_map(|v| v.as_document().cloned()).collect())
        .unwrap_or_default();
    let total = result
        .get_array("total")
        .ok()
        .and_then(|total| total.first())
        .and_then(|v| v.as_document())
        .and_then(|count| match count.get("count") {
            Some(Bson::Int32(n)) => u64::try_from(*n).ok(),
            Some(Bson::Int64(n)) => u64::try_from(*n).ok(),
            _ => None,
        })
        .unwrap_or(0);
    (items, total)
}

pub async fn registrations_for(db: &MongoDB, email: &str) -> Result<Vec<Document>, AppError> {
    let email = normalize_email(email);
    aggregate(db, pipelines::registrations_with_camp(Some(&email))).await
}

pub async fn analytics_for(db: &MongoDB, email: &str) -> Result<Vec<Document>, AppError> {
    let email = normalize_email(email);
    aggregate(db, pipelines::registration_analytics(&email)).await
}

/// Moves a registration along the confirmation transition table.
///
/// Re-applying the current status is a no-op; any other illegal move is a conflict.
pub async fn update_confirmation_status(
    db: &MongoDB,
    id: &str,
    requested: &str,
) -> Result<UpdatedResponse, AppError> {
    let next = ConfirmationStatus::parse(requested).ok_or_else(|| {
        AppError::InvalidRequest(format!(
            "Unknown confirmation status '{}' (expected Pending, Confirmed or Cancelled)",
            requested
        ))
    })?;

    let current = get_registration(db, id).await?;
    let oid = current.id.ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    if current.confirmation_status == next {
        return Ok(UpdatedResponse {
            acknowledged: true,
            matched_count: 1,
            modified_count: 0,
        });
    }
    if !current.confirmation_status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot change confirmation status from {} to {}",
            current.confirmation_status, next
        )));
    }

    // Guarding on the old status makes concurrent transitions lose cleanly.
    let result = db
        .collection::<Registration>(PARTICIPANTS)
        .update_one(
            doc! { "_id": oid, "confirmationStatus": current.confirmation_status.as_str() },
            doc! { "$set": { "confirmationStatus": next.as_str() } },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::Conflict(
            "Confirmation status changed concurrently".to_string(),
        ));
    }
    log::info!("✅ Registration {} is now {}", oid.to_hex(), next);
    Ok(result.into())
}

async fn aggregate(db: &MongoDB, pipeline: Vec<Document>) -> Result<Vec<Document>, AppError> {
    let cursor = db
        .collection::<Document>(PARTICIPANTS)
        .aggregate(pipeline)
        .await?;
    Ok(cursor.try_collect().await?)
}
