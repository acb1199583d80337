use crate::utils::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// JWT claims: the caller's payload plus issue and expiry times.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Issues and verifies HS256 bearer tokens with one process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Signs `payload` (a JSON object) with `exp = now + ttl`.
    pub fn issue(&self, payload: Value) -> Result<String, AppError> {
        self.issue_at(payload, Utc::now().timestamp())
    }

    fn issue_at(&self, payload: Value, iat: i64) -> Result<String, AppError> {
        let payload = match payload {
            Value::Object(map) => map,
            _ => {
                return Err(AppError::InvalidRequest(
                    "Token payload must be a JSON object".to_string(),
                ))
            }
        };

        if let Some(key) = RESERVED_CLAIMS.iter().find(|k| payload.contains_key(**k)) {
            return Err(AppError::InvalidRequest(format!(
                "Token payload may not set '{}'",
                key
            )));
        }

        let claims = Claims {
            iat,
            exp: iat + self.ttl.num_seconds(),
            payload,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Serialization(format!("Failed to sign token: {}", e)))
    }

    /// Checks signature and expiry; any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    #[test]
    fn token_decodes_to_original_payload() {
        let svc = service();
        let payload = json!({ "email": "nadia@example.com", "nested": { "a": [1, 2] } });

        let token = svc.issue(payload.clone()).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(Value::Object(claims.payload.clone()), payload);
        assert_eq!(claims.email(), Some("nadia@example.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let issued = Utc::now().timestamp() - 3601;
        let token = svc.issue_at(json!({ "email": "a@b.com" }), issued).unwrap();

        assert!(matches!(svc.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_just_inside_window_is_accepted() {
        let svc = service();
        let issued = Utc::now().timestamp() - 3500;
        let token = svc.issue_at(json!({ "email": "a@b.com" }), issued).unwrap();

        assert!(svc.verify(&token).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue(json!({ "email": "a@b.com" })).unwrap();
        let other = TokenService::new("another-secret", 3600);

        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(service().verify("not.a.jwt"), Err(AppError::Unauthorized)));
        assert!(matches!(service().verify(""), Err(AppError::Unauthorized)));
    }

    #[test]
    fn payload_must_be_an_object_without_reserved_claims() {
        let svc = service();
        assert!(matches!(
            svc.issue(json!("a@b.com")),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            svc.issue(json!({ "email": "a@b.com", "exp": 1 })),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
