//! Google ID token verification through the `tokeninfo` endpoint.
//!
//! Google validates the signature and expiry; this adapter checks the
//! audience against the configured OAuth client id and maps the claims into a
//! [`VerifiedIdentity`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError, VerifiedIdentity};
use crate::domain::{Role, UserId, UserProfile};

pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
struct TokenInfoDto {
    aud: String,
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl TokenInfoDto {
    fn into_identity(self, client_id: &str) -> Result<VerifiedIdentity, IdentityProviderError> {
        if self.aud != client_id {
            return Err(IdentityProviderError::rejected(
                "token was issued for another client",
            ));
        }
        let subject = UserId::new(self.sub)
            .map_err(|err| IdentityProviderError::rejected(format!("invalid subject: {err}")))?;
        Ok(VerifiedIdentity {
            subject,
            role: Role::default(),
            profile: UserProfile {
                name: self.name,
                email: self.email,
                image: self.picture,
            },
        })
    }
}

/// [`IdentityProvider`] backed by Google's `tokeninfo` endpoint.
pub struct GoogleTokenVerifier {
    client: Client,
    endpoint: String,
    client_id: String,
}

impl GoogleTokenVerifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            client_id: client_id.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityProviderError> {
        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|err| IdentityProviderError::unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let info: TokenInfoDto = response
            .json()
            .await
            .map_err(|err| IdentityProviderError::unavailable(format!("invalid tokeninfo: {err}")))?;
        let identity = info.into_identity(&self.client_id)?;
        debug!(subject = %identity.subject, "identity token verified");
        Ok(identity)
    }
}

fn map_status_error(status: StatusCode) -> IdentityProviderError {
    if status.is_client_error() {
        IdentityProviderError::rejected(format!("tokeninfo returned {}", status.as_u16()))
    } else {
        IdentityProviderError::unavailable(format!("tokeninfo returned {}", status.as_u16()))
    }
}
