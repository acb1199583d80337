//! Aggregation pipelines that join registrations and payments with their parents.
//!
//! Stored references are hex strings, so every join first coerces the string into an
//! ObjectId, looks up the parent, unwinds the single-element array, then projects the flat
//! shape the web client renders. Ids and dates leave the pipeline as plain strings.

use super::{CAMPAIGNS, PARTICIPANTS};
use mongodb::bson::{doc, Document};

/// Coerce `local` into an ObjectId, look it up in `from`, and unwind into `as_field`.
fn join_stages(local: &str, from: &str, as_field: &str) -> Vec<Document> {
    let key = format!("{}ObjectId", as_field);
    vec![
        doc! { "$addFields": { &key: { "$toObjectId": format!("${}", local) } } },
        doc! {
            "$lookup": {
                "from": from,
                "localField": &key,
                "foreignField": "_id",
                "as": as_field,
            }
        },
        doc! { "$unwind": format!("${}", as_field) },
    ]
}

fn registration_projection() -> Document {
    doc! {
        "$project": {
            "_id": { "$toString": "$_id" },
            "campId": 1,
            "campName": "$camp.campName",
            "campFees": "$camp.campFees",
            "date": "$camp.date",
            "location": "$camp.location",
            "healthcareProfessional": "$camp.healthcareProfessional",
            "participantName": 1,
            "participantEmail": 1,
            "paymentStatus": 1,
            "confirmationStatus": 1,
        }
    }
}

/// Registrations (optionally for one participant) joined with their campaign.
pub fn registrations_with_camp(participant_email: Option<&str>) -> Vec<Document> {
    let mut pipeline = Vec::new();
    if let Some(email) = participant_email {
        pipeline.push(doc! { "$match": { "participantEmail": email } });
    }
    pipeline.extend(join_stages("campId", CAMPAIGNS, "camp"));
    pipeline.push(registration_projection());
    pipeline
}

/// Management view for one page, windowed after the join so rows whose camp is gone
/// never count against a page. The single result document is
/// `{ items: [...], total: [{ count }] }`; `total` is empty when nothing joins.
pub fn registrations_with_camp_page(skip: i64, limit: i64) -> Vec<Document> {
    let mut pipeline = join_stages("campId", CAMPAIGNS, "camp");
    let items = vec![
        doc! { "$skip": skip },
        doc! { "$limit": limit },
        registration_projection(),
    ];
    pipeline.push(doc! { "$sort": { "_id": 1 } });
    pipeline.push(doc! {
        "$facet": {
            "items": items,
            "total": [{ "$count": "count" }],
        }
    });
    pipeline
}

/// Per-participant chart data.
pub fn registration_analytics(participant_email: &str) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "participantEmail": participant_email } }];
    pipeline.extend(join_stages("campId", CAMPAIGNS, "camp"));
    pipeline.push(doc! {
        "$project": {
            "_id": 0,
            "campName": "$camp.campName",
            "campFees": "$camp.campFees",
            "date": "$camp.date",
            "location": "$camp.location",
            "participantCount": "$camp.participantCount",
            "paymentStatus": 1,
        }
    });
    pipeline
}

/// Payment history: payment -> registration -> campaign, filtered by participant email.
pub fn payments_with_registration(participant_email: &str) -> Vec<Document> {
    let mut pipeline = join_stages("participantId", PARTICIPANTS, "registration");
    pipeline.push(doc! { "$match": { "registration.participantEmail": participant_email } });
    pipeline.extend(join_stages("registration.campId", CAMPAIGNS, "camp"));
    pipeline.push(doc! {
        "$project": {
            "_id": { "$toString": "$_id" },
            "transactionId": 1,
            "date": { "$dateToString": { "date": "$date" } },
            "amount": 1,
            "campName": "$camp.campName",
            "campFees": "$camp.campFees",
            "participantName": "$registration.participantName",
            "paymentStatus": "$registration.paymentStatus",
            "confirmationStatus": "$registration.confirmationStatus",
        }
    });
    pipeline
}
