use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use reelhub_config::IdentitySettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Session claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // external user id
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Verifies provider-issued session tokens. Sign-in itself happens at the
/// provider; nothing here mints tokens.
pub struct AuthService {
    validation: Validation,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(settings: &IdentitySettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        Self {
            validation,
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
        }
    }

    pub fn verify_session_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("Missing subject".to_string()));
        }

        Ok(token_data.claims)
    }
}
