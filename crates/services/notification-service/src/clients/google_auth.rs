//! Google OAuth2 access tokens for a service account (JWT-bearer grant).

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{AppError, AppResult};
use domain::{
    ServiceAccountKey, ASSERTION_LIFETIME_SECONDS, FCM_MESSAGING_SCOPE, JWT_BEARER_GRANT_TYPE,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Source of bearer tokens for the FCM API.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> AppResult<String>;
}

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges a service account key for short-lived access tokens.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: Client,
}

impl ServiceAccountTokenProvider {
    /// Fails when the key's private key is not a valid RSA PEM.
    pub fn new(key: ServiceAccountKey, http: Client) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AppError::configuration(format!("FCM credential parsing: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            http,
        })
    }

    /// Sign the RS256 assertion for the given issue time.
    fn assertion(&self, issued_at: i64) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: FCM_MESSAGING_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECONDS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign assertion: {}", e)))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        debug!("Requesting Google OAuth access token");
        let assertion = self.assertion(Utc::now().timestamp())?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::upstream(format!("Could not get access token from Google: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Could not get access token from Google ({}): {}",
                status, detail
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Malformed Google token response: {}", e)))?;

        debug!("Obtained Google OAuth access token");
        Ok(token.access_token)
    }
}
