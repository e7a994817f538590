//! Tableau REST client.
//!
//! Only the three calls an export needs. The caller owns the session
//! lifecycle: sign in, fetch one or more views, sign out.

use reqwest::{Client, Response};
use tracing::{debug, info};

use viewexport_core::{Error, Result, TableauConfig};

use crate::types::*;

const AUTH_HEADER: &str = "X-Tableau-Auth";

pub struct TableauClient {
    http: Client,
    config: TableauConfig,
}

impl TableauClient {
    pub fn new(config: TableauConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: TableauConfig) -> Self {
        Self { http, config }
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.config.server.trim_end_matches('/'),
            self.config.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Sign in with the configured personal access token.
    pub async fn sign_in(&self) -> Result<Session> {
        let body = SignInRequest {
            credentials: TokenCredentials {
                token_name: self.config.pat_name.clone(),
                token_secret: self.config.pat_secret.clone(),
                site: SiteSelector {
                    content_url: self.config.site_content_url.clone(),
                },
            },
        };

        let response = self
            .http
            .post(self.api_url("auth/signin"))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Sign-in request failed: {}", e)))?;
        let response = ensure_success(response, "Sign-in").await?;

        let parsed: SignInResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Malformed sign-in response: {}", e)))?;
        let session = Session::from(parsed);
        info!("Signed in to {} (site {})", self.config.server, session.site_id);
        Ok(session)
    }

    /// Full data of a view as CSV text.
    pub async fn fetch_view_csv(&self, session: &Session, view_id: &str) -> Result<String> {
        validate_view_id(view_id)?;
        let url = self.api_url(&format!(
            "sites/{}/views/{}/data?maxAge=0",
            session.site_id, view_id
        ));

        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, &session.token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("View data request failed: {}", e)))?;
        let response = ensure_success(response, "View data").await?;

        let csv = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read view data: {}", e)))?;
        debug!("Fetched view {} ({} bytes)", view_id, csv.len());
        Ok(csv)
    }

    /// Invalidate the session token.
    pub async fn sign_out(&self, session: Session) -> Result<()> {
        let response = self
            .http
            .post(self.api_url("auth/signout"))
            .header(AUTH_HEADER, &session.token)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Sign-out request failed: {}", e)))?;
        ensure_success(response, "Sign-out").await?;
        debug!("Signed out of site {}", session.site_id);
        Ok(())
    }
}

async fn ensure_success(response: Response, call: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Upstream(format!("{} failed with {}: {}", call, status, body)))
}

/// View ids are LUIDs or names made of URL-safe characters only.
fn validate_view_id(view_id: &str) -> Result<()> {
    let valid = !view_id.is_empty()
        && view_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidRequest(format!("Invalid view id: {:?}", view_id)))
    }
}
