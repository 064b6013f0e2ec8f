//! Admin channel client.
//!
//! Plain JSON over HTTP with the `X-SwyS3-Token` bearer header:
//! `POST /v1/api/admin/<cmd>` for key management,
//! `POST /v1/api/notify/subscribe` for event subscription, and
//! `GET`/`PUT /v1/sysctl[/<name>]` for runtime parameters.
//!
//! Transport failures map to `Error::Network`; a response with a
//! non-success status maps to `Error::AdminStatus` carrying the status
//! code and body text. Nothing is retried.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use sctl_core::admin::{
    AdminApi, KeyPair, KeydelRequest, KeygenRequest, SubscribeRequest, SysctlEntry,
};
use sctl_core::{Error, Result, normalize_endpoint};

const TOKEN_HEADER: &str = "X-SwyS3-Token";

const ADMIN_BASE: &str = "/v1/api/admin/";
const NOTIFY_SUBSCRIBE: &str = "/v1/api/notify/subscribe";
const SYSCTL_BASE: &str = "/v1/sysctl";

/// JSON/HTTP client for the admin side channel.
pub struct AdminClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl AdminClient {
    /// Create an admin client for the given endpoint and token.
    ///
    /// An unset token becomes an empty header value; the server rejects
    /// it, not this client.
    pub fn new(endpoint: Option<&str>, token: Option<&str>) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint.unwrap_or_default());
        let base = Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("bad endpoint '{endpoint}': {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: token.unwrap_or_default().to_string(),
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Config(format!("bad admin path '{path}': {e}")))
    }

    /// POST a JSON body and check the response against `expect`.
    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        expect: StatusCode,
    ) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        tracing::debug!(url = %url, "admin request");

        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check_status(response, expect).await
    }

    async fn check_status(
        response: reqwest::Response,
        expect: StatusCode,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status != expect {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AdminStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn sysctl_fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path)?)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let response = Self::check_status(response, StatusCode::OK).await?;
        response
            .json()
            .await
            .map_err(|e| Error::General(format!("bad sysctl response: {e}")))
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn keygen(&self, req: &KeygenRequest) -> Result<KeyPair> {
        let response = self
            .post_json(&format!("{ADMIN_BASE}keygen"), req, StatusCode::OK)
            .await?;

        response
            .json()
            .await
            .map_err(|e| Error::General(format!("bad keygen response: {e}")))
    }

    async fn keydel(&self, access_key_id: &str) -> Result<()> {
        let req = KeydelRequest {
            access_key_id: access_key_id.to_string(),
        };
        self.post_json(&format!("{ADMIN_BASE}keydel"), &req, StatusCode::OK)
            .await?;
        Ok(())
    }

    async fn sysctl_all(&self) -> Result<Vec<SysctlEntry>> {
        self.sysctl_fetch(SYSCTL_BASE).await
    }

    async fn sysctl_get(&self, name: &str) -> Result<SysctlEntry> {
        self.sysctl_fetch(&format!("{SYSCTL_BASE}/{name}")).await
    }

    async fn sysctl_set(&self, name: &str, value: &str) -> Result<()> {
        // The wire format is the JSON-quoted value as a text/plain body.
        let body = serde_json::to_string(value).map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .http
            .put(self.url(&format!("{SYSCTL_BASE}/{name}"))?)
            .header(TOKEN_HEADER, &self.token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check_status(response, StatusCode::OK).await?;
        Ok(())
    }

    async fn subscribe(&self, req: &SubscribeRequest) -> Result<()> {
        // The notify endpoint acknowledges with 202 Accepted, not 200.
        self.post_json(NOTIFY_SUBSCRIBE, req, StatusCode::ACCEPTED)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = AdminClient::new(Some("localhost:8787"), Some("tok")).unwrap();
        assert_eq!(
            client.url("/v1/api/admin/keygen").unwrap().as_str(),
            "http://localhost:8787/v1/api/admin/keygen"
        );
        assert_eq!(
            client.url("/v1/sysctl/acc_max").unwrap().as_str(),
            "http://localhost:8787/v1/sysctl/acc_max"
        );
    }

    #[test]
    fn test_new_accepts_scheme() {
        let client = AdminClient::new(Some("https://s3.example.com"), None).unwrap();
        assert_eq!(client.base.scheme(), "https");
        assert!(client.token.is_empty());
    }

    #[test]
    fn test_sysctl_value_is_json_quoted() {
        let body = serde_json::to_string("10").unwrap();
        assert_eq!(body, "\"10\"");
    }
}
