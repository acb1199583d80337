use crate::{
    database::{parse_id, pipelines, MongoDB, PARTICIPANTS, PAYMENTS},
    models::{
        normalize_email, Payment, PaymentIntentResponse, PaymentRecorded, PaymentStatus,
        RecordPaymentRequest,
    },
    services::{
        campaign_service,
        payment_gateway::{fee_to_cents, PaymentGateway, CURRENCY},
    },
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::ClientSession;

/// Creates a provider payment intent sized from the camp's fee.
pub async fn create_payment_intent(
    db: &MongoDB,
    gateway: &dyn PaymentGateway,
    camp_id: &str,
) -> Result<PaymentIntentResponse, AppError> {
    // Unknown or malformed camp ids are reported as bad requests.
    let camp = match campaign_service::get_campaign(db, camp_id).await {
        Ok(camp) => camp,
        Err(AppError::NotFound(_)) | Err(AppError::InvalidRequest(_)) => {
            return Err(AppError::InvalidRequest("Campaign not found".to_string()))
        }
        Err(e) => return Err(e),
    };

    let amount = fee_to_cents(camp.camp_fees)?;
    let intent = gateway.create_payment_intent(amount, CURRENCY).await?;

    Ok(PaymentIntentResponse {
        client_secret: intent.client_secret,
        amount: intent.amount,
        currency: intent.currency,
    })
}

/// Stores the payment and marks the registration paid in one transaction.
///
/// `transactionId` is unique, so a replayed request is rejected instead of
/// recorded twice.
pub async fn record_payment(
    db: &MongoDB,
    request: RecordPaymentRequest,
) -> Result<PaymentRecorded, AppError> {
    let registration_oid = parse_id(&request.participant_id, "registration")?;
    if request.transaction_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("transactionId is required".to_string()));
    }

    let payment = Payment {
        id: None,
        participant_id: registration_oid.to_hex(),
        transaction_id: request.transaction_id.trim().to_string(),
        email: normalize_email(&request.email),
        amount: request.amount,
        date: BsonDateTime::now(),
    };

    let recorded = db
        .transaction(|mut session| {
            let payment = &payment;
            async move {
                let result = insert_payment(db, &mut session, registration_oid, payment).await;
                (session, result)
            }
        })
        .await?;

    log::info!(
        "✅ Payment {} recorded for registration {}",
        payment.transaction_id,
        payment.participant_id
    );
    Ok(recorded)
}

async fn insert_payment(
    db: &MongoDB,
    session: &mut ClientSession,
    registration_oid: ObjectId,
    payment: &Payment,
) -> Result<PaymentRecorded, AppError> {
    let inserted = db
        .collection::<Payment>(PAYMENTS)
        .insert_one(payment)
        .session(&mut *session)
        .await
        .map_err(|e| AppError::from_write(e, "Payment already recorded"))?;

    let paid = mongodb::bson::to_bson(&PaymentStatus::Paid)?;
    let updated = db
        .collection::<Document>(PARTICIPANTS)
        .update_one(
            doc! { "_id": registration_oid },
            doc! { "$set": { "paymentStatus": paid } },
        )
        .session(&mut *session)
        .await?;

    if updated.matched_count == 0 {
        return Err(AppError::NotFound("Registration not found".to_string()));
    }

    let inserted_id = inserted
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_default();

    Ok(PaymentRecorded {
        inserted_id,
        modified_count: updated.modified_count,
    })
}

pub async fn payment_history(db: &MongoDB, email: &str) -> Result<Vec<Document>, AppError> {
    let email = normalize_email(email);
    let cursor = db
        .collection::<Document>(PAYMENTS)
        .aggregate(pipelines::payments_with_registration(&email))
        .await?;
    Ok(cursor.try_collect().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_db;
    use crate::models::{CreateCampaignRequest, RegisterRequest};
    use crate::services::payment_gateway::PaymentIntent;
    use crate::services::registration_service;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create_payment_intent(
            &self,
            amount_cents: i64,
            currency: &str,
        ) -> Result<PaymentIntent, AppError> {
            self.calls
                .lock()
                .unwrap()
                .push((amount_cents, currency.to_string()));
            Ok(PaymentIntent {
                id: "pi_test".to_string(),
                client_secret: "pi_test_secret".to_string(),
                amount: amount_cents,
                currency: currency.to_string(),
            })
        }
    }

    async fn seed(db: &MongoDB, fee: f64) -> (String, String) {
        let camp_id = crate::services::campaign_service::create_campaign(
            db,
            CreateCampaignRequest {
                camp_name: "Dental Drive".to_string(),
                image: None,
                camp_fees: fee,
                date: "2024-07-15".to_string(),
                time: None,
                location: "Sylhet".to_string(),
                healthcare_professional: "Dr. Akter".to_string(),
                description: None,
            },
        )
        .await
        .unwrap()
        .inserted_id
        .unwrap();

        let registration_id = registration_service::register_participant(
            db,
            RegisterRequest {
                camp_id: camp_id.clone(),
                participant_name: "Karim".to_string(),
                participant_email: "karim@example.com".to_string(),
                age: None,
                phone: Some("017".to_string()),
                gender: Some("male".to_string()),
                emergency_contact: None,
            },
        )
        .await
        .unwrap()
        .inserted_id
        .unwrap();

        (camp_id, registration_id)
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set
    async fn intent_amount_is_fee_in_cents() {
        let db = test_db().await;
        let (camp_id, _) = seed(&db, 12.5).await;
        let gateway = RecordingGateway::default();

        let intent = create_payment_intent(&db, &gateway, &camp_id).await.unwrap();
        assert_eq!(intent.client_secret, "pi_test_secret");
        assert_eq!(*gateway.calls.lock().unwrap(), vec![(1250, "usd".to_string())]);

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set
    async fn unknown_camp_is_a_bad_request() {
        let db = test_db().await;
        let gateway = RecordingGateway::default();

        for camp_id in [ObjectId::new().to_hex(), "garbage".to_string()] {
            let err = create_payment_intent(&db, &gateway, &camp_id).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Campaign not found"));
        }
        assert!(gateway.calls.lock().unwrap().is_empty());

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set
    async fn payment_marks_only_payment_status() {
        let db = test_db().await;
        let (_, registration_id) = seed(&db, 20.0).await;
        let before = registration_service::get_registration(&db, &registration_id)
            .await
            .unwrap();

        let recorded = record_payment(
            &db,
            RecordPaymentRequest {
                participant_id: registration_id.clone(),
                transaction_id: "pi_123".to_string(),
                email: "karim@example.com".to_string(),
                amount: 20.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(recorded.modified_count, 1);

        let after = registration_service::get_registration(&db, &registration_id)
            .await
            .unwrap();
        assert_eq!(after.payment_status, PaymentStatus::Paid);

        let mut expected = mongodb::bson::to_document(&before).unwrap();
        expected.insert("paymentStatus", "paid");
        assert_eq!(mongodb::bson::to_document(&after).unwrap(), expected);

        let history = payment_history(&db, "karim@example.com").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].get_str("transactionId").unwrap(), "pi_123");
        assert_eq!(history[0].get_str("campName").unwrap(), "Dental Drive");

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set
    async fn replayed_transaction_is_a_conflict() {
        let db = test_db().await;
        let (_, registration_id) = seed(&db, 20.0).await;
        let request = || RecordPaymentRequest {
            participant_id: registration_id.clone(),
            transaction_id: "pi_dup".to_string(),
            email: "karim@example.com".to_string(),
            amount: 20.0,
        };

        record_payment(&db, request()).await.unwrap();
        let err = record_payment(&db, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        db.database().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set
    async fn missing_registration_rolls_back_payment() {
        let db = test_db().await;
        let err = record_payment(
            &db,
            RecordPaymentRequest {
                participant_id: ObjectId::new().to_hex(),
                transaction_id: "pi_orphan".to_string(),
                email: "x@example.com".to_string(),
                amount: 5.0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let count = db
            .collection::<Document>(PAYMENTS)
            .count_documents(doc! {})
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.database().drop().await.unwrap();
    }
}
