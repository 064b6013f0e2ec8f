//! Admin side-channel types and interface.
//!
//! The admin API is plain JSON over HTTP authorized with the
//! `X-SwyS3-Token` header: key issuance/revocation and notification
//! subscription go through `POST /v1/api/...`, runtime parameters through
//! `GET`/`PUT /v1/sysctl`. Field names below match the service wire
//! format exactly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request body for access-key issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeygenRequest {
    pub namespace: String,
    /// Key lifetime in seconds, 0 meaning unbounded
    pub lifetime: u32,
    /// Restrict the key to one bucket when set
    pub bucket: Option<String>,
}

/// An issued access key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    #[serde(rename = "access-key-id")]
    pub access_key_id: String,
    #[serde(rename = "access-key-secret")]
    pub access_key_secret: String,
}

/// Request body for access-key revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeydelRequest {
    #[serde(rename = "access-key-id")]
    pub access_key_id: String,
}

/// One runtime parameter as reported by the sysctl endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysctlEntry {
    pub name: String,
    pub value: String,
}

impl std::fmt::Display for SysctlEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>16} = {}", self.name, self.value)
    }
}

/// Request body for subscribing a queue to bucket events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub namespace: String,
    pub bucket: String,
    /// Operations to notify about; the service currently supports `put`
    pub ops: String,
    pub queue: String,
}

/// Admin capability consumed by the CLI.
///
/// Every method is a single HTTP round-trip; no retry.
#[async_trait]
pub trait AdminApi {
    /// Issue an access key scoped to a namespace (and optionally a bucket).
    async fn keygen(&self, req: &KeygenRequest) -> Result<KeyPair>;

    /// Revoke an access key by id.
    async fn keydel(&self, access_key_id: &str) -> Result<()>;

    /// Fetch all runtime parameters, in server-returned order.
    async fn sysctl_all(&self) -> Result<Vec<SysctlEntry>>;

    /// Fetch one runtime parameter by name.
    async fn sysctl_get(&self, name: &str) -> Result<SysctlEntry>;

    /// Set one runtime parameter; the wire body is the JSON-quoted value.
    async fn sysctl_set(&self, name: &str, value: &str) -> Result<()>;

    /// Subscribe a queue to bucket put events.
    async fn subscribe(&self, req: &SubscribeRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_wire_names() {
        let json = r#"{"access-key-id":"AKEY","access-key-secret":"SKEY"}"#;
        let pair: KeyPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.access_key_id, "AKEY");
        assert_eq!(pair.access_key_secret, "SKEY");

        let back = serde_json::to_string(&pair).unwrap();
        assert!(back.contains("\"access-key-id\""));
        assert!(back.contains("\"access-key-secret\""));
    }

    #[test]
    fn test_keygen_request_serialization() {
        let req = KeygenRequest {
            namespace: "ns".to_string(),
            lifetime: 300,
            bucket: Some("b".to_string()),
        };
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(json["namespace"], "ns");
        assert_eq!(json["lifetime"], 300);
        assert_eq!(json["bucket"], "b");
    }

    #[test]
    fn test_sysctl_entry_display() {
        let e = SysctlEntry {
            name: "fn_tryrun_rate".to_string(),
            value: "10".to_string(),
        };
        assert_eq!(e.to_string(), "  fn_tryrun_rate = 10");
    }

    #[test]
    fn test_subscribe_request_fields() {
        let req = SubscribeRequest {
            namespace: "ns".to_string(),
            bucket: "b".to_string(),
            ops: "put".to_string(),
            queue: "q".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ops"], "put");
        assert_eq!(json["queue"], "q");
    }
}
