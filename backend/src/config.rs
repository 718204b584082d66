use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use affiliate_shared::store::StoreConfig;
use anyhow::{Context, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_API_KEY_FILE: &str = "data/webhook_api_key";

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub api_key: ApiKey,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT `{raw}`"))?,
            None => DEFAULT_PORT,
        };
        let key_file = PathBuf::from(
            get("WEBHOOK_API_KEY_FILE").unwrap_or_else(|| DEFAULT_API_KEY_FILE.to_string()),
        );

        Ok(Self {
            port,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            static_dir: PathBuf::from(
                get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
            api_key: ApiKey::resolve(get("WEBHOOK_API_KEY"), &key_file)?,
            store: StoreConfig::from_lookup(&lookup)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Where the webhook secret came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    File(PathBuf),
    /// Created at this startup and persisted to the path so restarts reuse it.
    Generated(PathBuf),
}

/// Shared secret expected in the `x-api-key` header of ingestion requests.
#[derive(Clone)]
pub struct ApiKey {
    secret: String,
    source: ApiKeySource,
}

impl ApiKey {
    pub fn new(secret: impl Into<String>, source: ApiKeySource) -> Self {
        Self {
            secret: secret.into(),
            source,
        }
    }

    /// Resolution order: explicit value, then the key file, then a freshly
    /// generated key written to the key file.
    pub fn resolve(explicit: Option<String>, key_file: &Path) -> Result<Self> {
        if let Some(secret) = explicit {
            return Ok(Self::new(secret, ApiKeySource::Environment));
        }

        if key_file.exists() {
            let secret = fs::read_to_string(key_file)
                .with_context(|| format!("failed to read API key file {}", key_file.display()))?;
            let secret = secret.trim();
            if !secret.is_empty() {
                return Ok(Self::new(secret, ApiKeySource::File(key_file.to_path_buf())));
            }
        }

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = hex::encode(bytes);
        persist_secret(key_file, &secret)?;
        Ok(Self::new(secret, ApiKeySource::Generated(key_file.to_path_buf())))
    }

    /// Compares SHA-256 digests so the comparison time does not depend on how
    /// much of the secret a caller guessed.
    pub fn matches(&self, candidate: &str) -> bool {
        Sha256::digest(candidate.as_bytes()) == Sha256::digest(self.secret.as_bytes())
    }

    pub fn source(&self) -> &ApiKeySource {
        &self.source
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// True when an operator supplied the key rather than the server minting it.
    pub fn is_configured(&self) -> bool {
        !matches!(self.source, ApiKeySource::Generated(_))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("secret", &"***")
            .field("source", &self.source)
            .finish()
    }
}

fn persist_secret(path: &Path, secret: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, format!("{secret}\n"))
        .with_context(|| format!("failed to persist API key to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn explicit_key_wins_and_counts_as_configured() {
        let dir = tempfile::tempdir().expect("temp dir");
        let key = ApiKey::resolve(Some("secret".to_string()), &dir.path().join("key"))
            .expect("resolve key");
        assert_eq!(key.source(), &ApiKeySource::Environment);
        assert!(key.is_configured());
        assert!(key.matches("secret"));
        assert!(!key.matches("secret "));
        assert!(!dir.path().join("key").exists());
    }

    #[test]
    fn generated_key_is_persisted_and_reused() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("webhook_api_key");

        let first = ApiKey::resolve(None, &path).expect("generate key");
        assert_eq!(first.source(), &ApiKeySource::Generated(path.clone()));
        assert!(!first.is_configured());
        assert_eq!(first.secret().len(), 64);

        let second = ApiKey::resolve(None, &path).expect("reload key");
        assert_eq!(second.source(), &ApiKeySource::File(path.clone()));
        assert_eq!(second.secret(), first.secret());
    }

    #[test]
    fn debug_output_hides_secret() {
        let key = ApiKey::new("hunter2", ApiKeySource::Environment);
        assert!(!format!("{key:?}").contains("hunter2"));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let dir = tempfile::tempdir().expect("temp dir");
        let key_file = dir.path().join("key").display().to_string();
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080".to_string()),
            ("WEBHOOK_API_KEY", "abc".to_string()),
            ("WEBHOOK_API_KEY_FILE", key_file),
            ("SQLITE_PATH", "tmp/site.db".to_string()),
        ]))
        .expect("config");

        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.static_dir, PathBuf::from("dist"));
        assert!(config.api_key.matches("abc"));
        assert_eq!(config.store, StoreConfig::Sqlite {
            path: PathBuf::from("tmp/site.db")
        });
    }

    #[test]
    fn invalid_port_fails_startup() {
        let result = Config::from_lookup(lookup(&[
            ("PORT", "eighty".to_string()),
            ("WEBHOOK_API_KEY", "abc".to_string()),
        ]));
        assert!(result.is_err());
    }
}
