//! REST API payloads for the upstream dashboard server.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/signin` with a personal access token.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub credentials: TokenCredentials,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenCredentials {
    #[serde(rename = "personalAccessTokenName")]
    pub token_name: String,
    #[serde(rename = "personalAccessTokenSecret")]
    pub token_secret: String,
    pub site: SiteSelector,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSelector {
    #[serde(rename = "contentUrl")]
    pub content_url: String,
}

/// Response of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub credentials: IssuedCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuedCredentials {
    pub token: String,
    pub site: SiteRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteRef {
    pub id: String,
}

/// An authenticated REST session. Signing out consumes it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub site_id: String,
}

impl From<SignInResponse> for Session {
    fn from(response: SignInResponse) -> Self {
        Self {
            token: response.credentials.token,
            site_id: response.credentials.site.id,
        }
    }
}
