use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CheckError;
use crate::types::AuthMethod;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}

impl TokenResponse {
    fn into_header(self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Obtains the `Authorization` header value for the management API.
pub struct Authenticator {
    http: reqwest::Client,
    identity_host: String,
}

impl Authenticator {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_identity_host(http, "localhost")
    }

    /// Managed-identity requests go to `http://{identity_host}:{port}`.
    pub fn with_identity_host(http: reqwest::Client, identity_host: impl Into<String>) -> Self {
        Self { http, identity_host: identity_host.into() }
    }

    pub async fn authorize(&self, method: &AuthMethod) -> Result<String, CheckError> {
        match method {
            AuthMethod::ServicePrincipal { authority_url, tenant_id, client_id, client_secret } => {
                self.authenticate(authority_url, tenant_id, client_id, client_secret).await
            }
            AuthMethod::ManagedIdentity { local_port, resource } => {
                self.authenticate_via_managed_identity(*local_port, resource).await
            }
        }
    }

    /// Client-credentials grant against `{authority_url}/{tenant_id}/oauth2/token`.
    pub async fn authenticate(
        &self,
        authority_url: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, CheckError> {
        let url = format!("{}/{}/oauth2/token", authority_url.trim_end_matches('/'), tenant_id);
        info!("Authenticating service principal {} against tenant {}", client_id, tenant_id);

        let res = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("resource", crate::types::DEFAULT_IDENTITY_RESOURCE),
            ])
            .send()
            .await
            .map_err(|e| CheckError::Authentication(e.to_string()))?;

        read_token(res).await
    }

    /// Token from the local managed-identity endpoint, which insists on `Metadata: true`.
    pub async fn authenticate_via_managed_identity(
        &self,
        local_port: u16,
        resource: &str,
    ) -> Result<String, CheckError> {
        let url = format!("http://{}:{}/oauth2/token", self.identity_host, local_port);
        info!("Requesting managed identity token from port {}", local_port);

        let res = self
            .http
            .get(&url)
            .query(&[("resource", resource)])
            .header("Metadata", "true")
            .send()
            .await
            .map_err(|e| CheckError::Authentication(e.to_string()))?;

        read_token(res).await
    }
}

async fn read_token(res: reqwest::Response) -> Result<String, CheckError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| CheckError::Authentication(e.to_string()))?;

    if !status.is_success() {
        warn!("Token endpoint returned {}", status);
        return Err(CheckError::Authentication(body));
    }

    let token: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| CheckError::Authentication(format!("unexpected token response: {}", e)))?;
    Ok(token.into_header())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_header() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"token_type": "Bearer", "access_token": "abc", "expires_in": "3599"}"#).unwrap();
        assert_eq!(token.into_header(), "Bearer abc");
    }
}
