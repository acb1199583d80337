use crate::utils::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const CURRENCY: &str = "usd";

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

/// Seam over the card processor so handlers can run against a fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError>;
}

/// Camp fee in major units to the smallest currency unit.
pub fn fee_to_cents(fee: f64) -> Result<i64, AppError> {
    if !fee.is_finite() || fee <= 0.0 {
        return Err(AppError::InvalidRequest(format!(
            "Camp fee must be positive, got {}",
            fee
        )));
    }
    Ok((fee * 100.0).round() as i64)
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: &str, secret_key: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::PaymentProvider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Form POST for a new intent. No idempotency key is sent: each checkout
    /// gets a fresh intent.
    fn intent_request(&self, amount_cents: i64, currency: &str) -> reqwest::Result<reqwest::Request> {
        let amount = amount_cents.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        self.client
            .post(format!("{}/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .build()
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError> {
        log::info!("💳 Creating payment intent: {} {}", amount_cents, currency);

        let request = self
            .intent_request(amount_cents, currency)
            .map_err(|e| AppError::PaymentProvider(format!("Invalid request: {}", e)))?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::PaymentProvider(detail));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Failed to parse response: {}", e)))?;

        log::info!("✅ Payment intent created: {}", intent.id);
        Ok(intent)
    }
}
