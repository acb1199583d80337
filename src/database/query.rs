use crate::utils::AppError;
use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: u64 = 10;

/// Fields matched by the free-text campaign search.
pub const CAMPAIGN_SEARCH_FIELDS: [&str; 5] = [
    "campName",
    "description",
    "date",
    "location",
    "healthcareProfessional",
];

/// Query-string parameters accepted by the campaign listings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    RegisteredMember,
    CampFees,
    CampName,
}

impl SortKey {
    /// Unknown keys fall back to natural order, same as an absent key.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Registerd_Member" | "Registered_Member" => Some(SortKey::RegisteredMember),
            "Camp_Fees" => Some(SortKey::CampFees),
            "Camp_Name" => Some(SortKey::CampName),
            _ => None,
        }
    }

    pub fn to_document(self) -> Document {
        match self {
            SortKey::RegisteredMember => doc! { "participantCount": -1 },
            SortKey::CampFees => doc! { "campFees": 1 },
            SortKey::CampName => doc! { "campName": 1 },
        }
    }
}

impl CampaignQuery {
    pub fn filter(&self) -> Document {
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => search_filter(term, &CAMPAIGN_SEARCH_FIELDS),
            _ => Document::new(),
        }
    }

    pub fn sort(&self) -> Option<Document> {
        self.sort_by
            .as_deref()
            .and_then(SortKey::parse)
            .map(SortKey::to_document)
    }
}

/// `$or` of case-insensitive literal substring matches, one per field.
pub fn search_filter(term: &str, fields: &[&str]) -> Document {
    let pattern = regex::escape(term);
    let clauses: Vec<Bson> = fields
        .iter()
        .map(|field| {
            Bson::Document(doc! { *field: { "$regex": pattern.as_str(), "$options": "i" } })
        })
        .collect();

    doc! { "$or": clauses }
}

/// `(skip, limit)` for a 1-based page number; anything below 1 reads as page 1.
///
/// Pages whose offset does not fit a signed 64-bit skip are rejected.
pub fn page_window(page: i64) -> Result<(i64, i64), AppError> {
    let limit = PAGE_SIZE as i64;
    page.max(1)
        .checked_sub(1)
        .and_then(|before| before.checked_mul(limit))
        .map(|skip| (skip, limit))
        .ok_or_else(|| AppError::InvalidRequest(format!("Page {} is out of range", page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: i64) -> Self {
        Self {
            items,
            total,
            page: page.max(1) as u64,
            page_size: PAGE_SIZE,
            total_pages: total.div_ceil(PAGE_SIZE),
        }
    }
}
