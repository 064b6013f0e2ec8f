//! Credential resolution.
//!
//! Every invocation resolves an endpoint URL, an access key pair and
//! (for admin commands) an admin token from, in precedence order:
//! command-line flags, the persisted credentials file, and an optional
//! key listing file supplied with `--conf`. Later sources fill only
//! fields left unset by earlier ones.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory under the user's home holding all secret material.
const SECRETS_DIR: &str = ".swysecrets";

/// Persisted credentials file name, inside [`SECRETS_DIR`].
const CREDS_FILE: &str = "s3ctl.json";

/// Service secrets file scanned for the admin token, inside [`SECRETS_DIR`].
const TOKEN_FILE: &str = "s3";

/// Line prefix marking the admin token inside the service secrets file.
const TOKEN_PREFIX: &str = "\"S3TOKEN\":";

/// Raw credential inputs as they arrive from the command line.
#[derive(Debug, Clone, Default)]
pub struct CredSources {
    pub access_key_id: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint_url: Option<String>,
    pub admin_secret: Option<String>,
    /// Path to a key listing file (`Key:` / `Secret:` / `Endpoint` lines)
    pub conf: Option<PathBuf>,
}

/// Fully resolved credential record.
///
/// Fields stay `None` when no source supplied them; missing fields are not
/// an error here and surface later as remote-call failures.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub access_key_id: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint_url: Option<String>,
    pub admin_secret: Option<String>,
}

/// Serde model of the persisted credentials file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCreds {
    #[serde(rename = "access-key-id")]
    pub access_key_id: Option<String>,
    #[serde(rename = "access-key-secret")]
    pub access_key_secret: Option<String>,
    #[serde(rename = "endpoint-url")]
    pub endpoint_url: Option<String>,
}

impl Credentials {
    /// Resolve credentials from flags, the credentials file and the
    /// optional listing file, in that order of precedence.
    pub fn resolve(sources: &CredSources) -> Result<Self> {
        let mut creds = Self {
            access_key_id: sources.access_key_id.clone(),
            secret_key: sources.secret_key.clone(),
            endpoint_url: sources.endpoint_url.clone(),
            admin_secret: sources.admin_secret.clone(),
        };

        if let Some(stored) = read_stored(&creds_path()) {
            creds.merge_stored(&stored);
        }

        if let Some(conf) = &sources.conf {
            tracing::debug!(path = %conf.display(), "loading creds from listing file");
            let text = fs::read_to_string(conf)
                .map_err(|e| Error::Config(format!("can't read {}: {e}", conf.display())))?;
            creds.merge_listing(&text);
        }

        Ok(creds)
    }

    /// Fill unset fields from the persisted credentials file.
    fn merge_stored(&mut self, stored: &StoredCreds) {
        if self.access_key_id.is_none() {
            self.access_key_id = stored.access_key_id.clone();
        }
        if self.secret_key.is_none() {
            self.secret_key = stored.access_key_secret.clone();
        }
        if self.endpoint_url.is_none() {
            self.endpoint_url = stored.endpoint_url.clone();
        }
    }

    /// Fill unset fields from a key listing file.
    ///
    /// Recognized lines: `Key: <id>`, `Secret: <secret>`, `Endpoint <url>`.
    /// Anything else is ignored.
    fn merge_listing(&mut self, text: &str) {
        for line in text.lines() {
            let mut words = line.split_whitespace();
            let (Some(tag), Some(value)) = (words.next(), words.next()) else {
                continue;
            };
            match tag {
                "Key:" if self.access_key_id.is_none() => {
                    self.access_key_id = Some(value.to_string());
                }
                "Secret:" if self.secret_key.is_none() => {
                    self.secret_key = Some(value.to_string());
                }
                "Endpoint" if self.endpoint_url.is_none() => {
                    self.endpoint_url = Some(value.to_string());
                }
                _ => {}
            }
        }
    }

    /// Try to scrape the admin token from the service secrets file when
    /// none was supplied. Failure is not an error; the missing token
    /// surfaces as an admin-call failure.
    pub fn guess_admin_token(&mut self) {
        if self.admin_secret.is_some() {
            return;
        }
        let path = token_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                self.admin_secret = scrape_admin_token(&text);
                if self.admin_secret.is_none() {
                    tracing::debug!(path = %path.display(), "no admin token line found");
                }
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "can't read secrets file");
            }
        }
    }

    /// Persist the current key pair and endpoint to the credentials file,
    /// mode 0600. Last writer wins; the tool is not designed for
    /// concurrent self-invocation.
    pub fn save(&self) -> Result<()> {
        let stored = StoredCreds {
            access_key_id: self.access_key_id.clone(),
            access_key_secret: self.secret_key.clone(),
            endpoint_url: self.endpoint_url.clone(),
        };
        write_stored(&creds_path(), &stored)
    }
}

/// Extract the quoted token from the `"S3TOKEN":` line of the service
/// secrets file, if present.
pub fn scrape_admin_token(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.trim_start().strip_prefix(TOKEN_PREFIX) {
            let token = rest.trim().trim_end_matches(',').trim_matches('"');
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

/// Prepend `http://` when the endpoint carries no scheme; the service
/// historically speaks plain HTTP on its admin port.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

fn secrets_dir() -> PathBuf {
    // Env override keeps tests away from the real home directory.
    if let Ok(dir) = std::env::var("S3CTL_SECRETS_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir().unwrap_or_default().join(SECRETS_DIR)
}

fn creds_path() -> PathBuf {
    secrets_dir().join(CREDS_FILE)
}

fn token_path() -> PathBuf {
    secrets_dir().join(TOKEN_FILE)
}

/// Read and parse the credentials file; absent or malformed files are
/// silently ignored.
fn read_stored(path: &Path) -> Option<StoredCreds> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(stored) => Some(stored),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed credentials file");
            None
        }
    }
}

fn write_stored(path: &Path, stored: &StoredCreds) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let text = serde_json::to_string(stored).map_err(|e| Error::General(e.to_string()))?;
    fs::write(path, text)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(key: Option<&str>, secret: Option<&str>, endpoint: Option<&str>) -> Credentials {
        Credentials {
            access_key_id: key.map(String::from),
            secret_key: secret.map(String::from),
            endpoint_url: endpoint.map(String::from),
            admin_secret: None,
        }
    }

    #[test]
    fn test_stored_fills_only_unset() {
        let stored = StoredCreds {
            access_key_id: Some("file-key".to_string()),
            access_key_secret: Some("file-secret".to_string()),
            endpoint_url: Some("file-endpoint".to_string()),
        };

        let mut creds = flags(Some("flag-key"), None, None);
        creds.merge_stored(&stored);

        assert_eq!(creds.access_key_id.as_deref(), Some("flag-key"));
        assert_eq!(creds.secret_key.as_deref(), Some("file-secret"));
        assert_eq!(creds.endpoint_url.as_deref(), Some("file-endpoint"));
    }

    #[test]
    fn test_listing_fills_only_unset() {
        let text = "Key: listed-key\nSecret: listed-secret\nEndpoint listed-endpoint\n";

        let mut creds = flags(Some("flag-key"), Some("flag-secret"), None);
        creds.merge_listing(text);

        // Flags win over the listing file, field by field.
        assert_eq!(creds.access_key_id.as_deref(), Some("flag-key"));
        assert_eq!(creds.secret_key.as_deref(), Some("flag-secret"));
        assert_eq!(creds.endpoint_url.as_deref(), Some("listed-endpoint"));
    }

    #[test]
    fn test_listing_ignores_unrelated_lines() {
        let text = "Account: whatever\n\nKey:\nEndpoint http://host:8787\n";

        let mut creds = flags(None, None, None);
        creds.merge_listing(text);

        // `Key:` with no value and unknown tags are skipped.
        assert_eq!(creds.access_key_id, None);
        assert_eq!(creds.endpoint_url.as_deref(), Some("http://host:8787"));
    }

    #[test]
    fn test_stored_roundtrip_and_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s3ctl.json");
        let stored = StoredCreds {
            access_key_id: Some("AKEY".to_string()),
            access_key_secret: Some("SKEY".to_string()),
            endpoint_url: Some("http://host:8787".to_string()),
        };

        write_stored(&path, &stored).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"access-key-id\""));
        assert!(text.contains("\"access-key-secret\""));
        assert!(text.contains("\"endpoint-url\""));

        let back = read_stored(&path).unwrap();
        assert_eq!(back.access_key_id.as_deref(), Some("AKEY"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_read_stored_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_stored(&dir.path().join("absent.json")).is_none());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        assert!(read_stored(&bad).is_none());
    }

    #[test]
    fn test_scrape_admin_token() {
        let text = "\"S3ADDR\": \"127.0.0.1\",\n\"S3TOKEN\": \"deadbeef\",\n";
        assert_eq!(scrape_admin_token(text).as_deref(), Some("deadbeef"));

        assert_eq!(scrape_admin_token("\"S3TOKEN\": \"tok\""), Some("tok".to_string()));
        assert_eq!(scrape_admin_token("no token here"), None);
        assert_eq!(scrape_admin_token("\"S3TOKEN\": \"\""), None);
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("host:8787"), "http://host:8787");
        assert_eq!(normalize_endpoint("http://host:8787"), "http://host:8787");
        assert_eq!(normalize_endpoint("https://s3.example.com"), "https://s3.example.com");
    }
}
