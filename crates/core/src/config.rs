//! Configuration management
//!
//! Configuration is resolved once, before any task runs, into an immutable
//! [`CloudConfiguration`]. Sources, from lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. `config.toml` in `$CSUTIL_CONFIG_DIR` or `<config dir>/csutil/`
//! 3. `CSUTIL_*` environment variables
//! 4. explicit [`Overrides`] (CLI flags)
//!
//! Environment access goes through a lookup function so callers (and tests)
//! decide where variables come from.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::scheduler::DEFAULT_CONCURRENCY;

/// Current configuration file schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Provider used when nothing selects one
pub const DEFAULT_PLATFORM: Platform = Platform::Ibm;

/// Region used for IBM COS when none is configured
pub const DEFAULT_IBM_REGION: &str = "us-standard";

pub const ENV_CONFIG_DIR: &str = "CSUTIL_CONFIG_DIR";
pub const ENV_PLATFORM: &str = "CSUTIL_DEFAULT_PLATFORM";
pub const ENV_CONCURRENCY: &str = "CSUTIL_CONCURRENCY";
pub const ENV_TIMEOUT_SECS: &str = "CSUTIL_TIMEOUT_SECS";
pub const ENV_IBM_COS_ENDPOINT: &str = "CSUTIL_IBM_COS_ENDPOINT";
pub const ENV_IBM_ACCESS_KEY_ID: &str = "CSUTIL_IBM_ACCESS_KEY_ID";
pub const ENV_IBM_SECRET_ACCESS_KEY: &str = "CSUTIL_IBM_SECRET_ACCESS_KEY";
pub const ENV_IBM_REGION: &str = "CSUTIL_IBM_REGION";
pub const ENV_AZURE_CONNECTION_STRING: &str = "CSUTIL_AZURE_CONNECTION_STRING";
pub const ENV_AZURE_ACCOUNT_NAME: &str = "CSUTIL_AZURE_STORAGE_ACCOUNT_NAME";
pub const ENV_AZURE_TENANT_ID: &str = "CSUTIL_AZURE_TENANT_ID";
pub const ENV_AZURE_CLIENT_ID: &str = "CSUTIL_AZURE_CLIENT_ID";
pub const ENV_AZURE_CLIENT_SECRET: &str = "CSUTIL_AZURE_CLIENT_SECRET";
pub const ENV_LOCAL_ROOT: &str = "CSUTIL_LOCAL_ROOT";

/// Supported storage platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ibm,
    Azure,
    Local,
}

impl Platform {
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Ibm => "ibm",
            Platform::Azure => "azure",
            Platform::Local => "local",
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ibm" => Ok(Platform::Ibm),
            "azure" => Ok(Platform::Azure),
            "local" => Ok(Platform::Local),
            other => Err(Error::Config(format!(
                "Cloud platform '{other}' is not supported (expected ibm, azure or local)"
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IBM Cloud Object Storage connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbmConfig {
    pub cos_endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

/// How the Azure provider authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AzureAuth {
    /// Shared account key, usually taken from a connection string
    AccessKey(String),
    /// Service principal (client secret credential)
    ServicePrincipal {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

/// Azure Blob / Data Lake Storage settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureConfig {
    pub account: String,
    pub auth: AzureAuth,
}

/// Local directory provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    /// Each bucket is a directory under this root
    pub root: PathBuf,
}

/// The active provider and its credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    Ibm(IbmConfig),
    Azure(AzureConfig),
    Local(LocalConfig),
}

impl ProviderConfig {
    pub fn platform(&self) -> Platform {
        match self {
            ProviderConfig::Ibm(_) => Platform::Ibm,
            ProviderConfig::Azure(_) => Platform::Azure,
            ProviderConfig::Local(_) => Platform::Local,
        }
    }
}

/// Scheduler and deadline settings for every batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSettings {
    /// Maximum number of tasks running at once
    pub concurrency: usize,
    /// Deadline applied to each broker call
    pub timeout: Option<Duration>,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }
}

/// Fully resolved, read-only configuration for one broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfiguration {
    pub provider: ProviderConfig,
    pub transfer: TransferSettings,
}

impl CloudConfiguration {
    /// Resolve configuration from the default file and the process environment
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let manager = ConfigManager::from_lookup(&lookup)?;
        manager.load()?.resolve(&lookup, overrides)
    }

    pub fn platform(&self) -> Platform {
        self.provider.platform()
    }
}

/// Values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platform: Option<Platform>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// On-disk configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Active platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default)]
    pub transfer: TransferSection,

    #[serde(default)]
    pub ibm: IbmSection,

    #[serde(default)]
    pub azure: AzureSection,

    #[serde(default)]
    pub local: LocalSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            platform: None,
            transfer: TransferSection::default(),
            ibm: IbmSection::default(),
            azure: AzureSection::default(),
            local: LocalSection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferSection {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IbmSection {
    pub cos_endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AzureSection {
    pub connection_string: Option<String>,
    pub storage_account_name: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSection {
    pub root: Option<PathBuf>,
}

impl ConfigFile {
    /// Layer environment variables and overrides on top of this file
    pub fn resolve<L>(self, lookup: L, overrides: &Overrides) -> Result<CloudConfiguration>
    where
        L: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let platform = match overrides.platform {
            Some(platform) => platform,
            None => match env(ENV_PLATFORM).or(self.platform) {
                Some(name) => name.parse()?,
                None => DEFAULT_PLATFORM,
            },
        };

        let concurrency = match overrides.concurrency {
            Some(n) => n,
            None => match env(ENV_CONCURRENCY) {
                Some(raw) => parse_number::<usize>(ENV_CONCURRENCY, &raw)?,
                None => self.transfer.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            },
        };
        if concurrency == 0 {
            return Err(Error::Config("Concurrency must be at least 1".into()));
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => Some(parse_number::<u64>(ENV_TIMEOUT_SECS, &raw)?),
                None => self.transfer.timeout_secs,
            },
        };

        let provider = match platform {
            Platform::Ibm => ProviderConfig::Ibm(resolve_ibm(self.ibm, &env)?),
            Platform::Azure => ProviderConfig::Azure(resolve_azure(self.azure, &env)?),
            Platform::Local => ProviderConfig::Local(LocalConfig {
                root: env(ENV_LOCAL_ROOT)
                    .map(PathBuf::from)
                    .or(self.local.root)
                    .ok_or_else(|| missing(Platform::Local, &[ENV_LOCAL_ROOT]))?,
            }),
        };

        Ok(CloudConfiguration {
            provider,
            transfer: TransferSettings {
                concurrency,
                // Zero disables the deadline
                timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            },
        })
    }
}

fn resolve_ibm(file: IbmSection, env: &impl Fn(&str) -> Option<String>) -> Result<IbmConfig> {
    let cos_endpoint = env(ENV_IBM_COS_ENDPOINT).or(file.cos_endpoint);
    let access_key_id = env(ENV_IBM_ACCESS_KEY_ID).or(file.access_key_id);
    let secret_access_key = env(ENV_IBM_SECRET_ACCESS_KEY).or(file.secret_access_key);

    let (Some(cos_endpoint), Some(access_key_id), Some(secret_access_key)) =
        (cos_endpoint, access_key_id, secret_access_key)
    else {
        return Err(missing(
            Platform::Ibm,
            &[
                ENV_IBM_COS_ENDPOINT,
                ENV_IBM_ACCESS_KEY_ID,
                ENV_IBM_SECRET_ACCESS_KEY,
            ],
        ));
    };

    let url = Url::parse(&cos_endpoint)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "IBM COS endpoint must be an http(s) URL, got '{cos_endpoint}'"
        )));
    }

    Ok(IbmConfig {
        cos_endpoint: cos_endpoint.trim_end_matches('/').to_string(),
        access_key_id,
        secret_access_key,
        region: env(ENV_IBM_REGION)
            .or(file.region)
            .unwrap_or_else(|| DEFAULT_IBM_REGION.to_string()),
    })
}

fn resolve_azure(
    file: AzureSection,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<AzureConfig> {
    // A connection string wins over a service principal
    if let Some(conn) = env(ENV_AZURE_CONNECTION_STRING).or(file.connection_string) {
        return parse_connection_string(&conn);
    }

    let account = env(ENV_AZURE_ACCOUNT_NAME).or(file.storage_account_name);
    let tenant_id = env(ENV_AZURE_TENANT_ID).or(file.tenant_id);
    let client_id = env(ENV_AZURE_CLIENT_ID).or(file.client_id);
    let client_secret = env(ENV_AZURE_CLIENT_SECRET).or(file.client_secret);

    match (account, tenant_id, client_id, client_secret) {
        (Some(account), Some(tenant_id), Some(client_id), Some(client_secret)) => {
            Ok(AzureConfig {
                account,
                auth: AzureAuth::ServicePrincipal {
                    tenant_id,
                    client_id,
                    client_secret,
                },
            })
        }
        _ => Err(missing(
            Platform::Azure,
            &[
                ENV_AZURE_CONNECTION_STRING,
                ENV_AZURE_ACCOUNT_NAME,
                ENV_AZURE_TENANT_ID,
                ENV_AZURE_CLIENT_ID,
                ENV_AZURE_CLIENT_SECRET,
            ],
        )),
    }
}

/// Parse `AccountName=...;AccountKey=...` out of an Azure connection string
pub fn parse_connection_string(conn: &str) -> Result<AzureConfig> {
    let mut account = None;
    let mut key = None;

    for part in conn.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((name, value)) = part.split_once('=') else {
            return Err(Error::Config(
                "Malformed Azure connection string: expected Name=Value pairs".into(),
            ));
        };
        match name {
            "AccountName" => account = Some(value.to_string()),
            // Keys are base64 and may end in '=' padding
            "AccountKey" => key = Some(value.to_string()),
            _ => {}
        }
    }

    match (account, key) {
        (Some(account), Some(key)) if !account.is_empty() && !key.is_empty() => Ok(AzureConfig {
            account,
            auth: AzureAuth::AccessKey(key),
        }),
        _ => Err(Error::Config(
            "Azure connection string must contain AccountName and AccountKey".into(),
        )),
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got '{raw}'")))
}

fn missing(platform: Platform, vars: &[&str]) -> Error {
    Error::Config(format!(
        "Missing credentials for platform '{platform}'. Set: {}",
        vars.join(", ")
    ))
}

/// Configuration manager handles locating and loading the config file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Locate the config file via `CSUTIL_CONFIG_DIR` or the platform config dir
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_dir = match lookup(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("csutil"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load the configuration file
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: ConfigFile = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade csutil.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(pairs: &[(&str, &str)], overrides: &Overrides) -> Result<CloudConfiguration> {
        let env = vars(pairs);
        ConfigFile::default().resolve(|k| env.get(k).cloned(), overrides)
    }

    fn ibm_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_IBM_COS_ENDPOINT, "https://s3.us-south.cloud-object-storage.appdomain.cloud/"),
            (ENV_IBM_ACCESS_KEY_ID, "access"),
            (ENV_IBM_SECRET_ACCESS_KEY, "secret"),
        ]
    }

    #[test]
    fn test_default_platform_is_ibm() {
        let config = resolve(&ibm_env(), &Overrides::default()).unwrap();
        let ProviderConfig::Ibm(ibm) = &config.provider else {
            panic!("expected IBM provider");
        };
        assert_eq!(
            ibm.cos_endpoint,
            "https://s3.us-south.cloud-object-storage.appdomain.cloud"
        );
        assert_eq!(ibm.region, DEFAULT_IBM_REGION);
        assert_eq!(config.transfer, TransferSettings::default());
    }

    #[test]
    fn test_missing_ibm_credentials() {
        let err = resolve(&[(ENV_IBM_COS_ENDPOINT, "https://cos")], &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(ENV_IBM_ACCESS_KEY_ID));
    }

    #[test]
    fn test_invalid_ibm_endpoint() {
        let mut env = ibm_env();
        env[0] = (ENV_IBM_COS_ENDPOINT, "not a url");
        assert!(matches!(
            resolve(&env, &Overrides::default()),
            Err(Error::InvalidUrl(_))
        ));

        env[0] = (ENV_IBM_COS_ENDPOINT, "ftp://cos.example.com");
        assert!(matches!(
            resolve(&env, &Overrides::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_platform() {
        let err = resolve(&[(ENV_PLATFORM, "gcp")], &Overrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("gcp"));
    }

    #[test]
    fn test_only_active_provider_requires_credentials() {
        // IBM credentials are absent, but Local is active
        let config = resolve(
            &[(ENV_PLATFORM, "local"), (ENV_LOCAL_ROOT, "/srv/buckets")],
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(
            config.provider,
            ProviderConfig::Local(LocalConfig {
                root: PathBuf::from("/srv/buckets")
            })
        );
    }

    #[test]
    fn test_azure_connection_string_preferred() {
        let config = resolve(
            &[
                (ENV_PLATFORM, "AZURE"),
                (
                    ENV_AZURE_CONNECTION_STRING,
                    "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5==;EndpointSuffix=core.windows.net",
                ),
                (ENV_AZURE_ACCOUNT_NAME, "ignored"),
            ],
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(
            config.provider,
            ProviderConfig::Azure(AzureConfig {
                account: "acct".into(),
                auth: AzureAuth::AccessKey("a2V5==".into()),
            })
        );
    }

    #[test]
    fn test_azure_service_principal() {
        let config = resolve(
            &[
                (ENV_PLATFORM, "azure"),
                (ENV_AZURE_ACCOUNT_NAME, "acct"),
                (ENV_AZURE_TENANT_ID, "tenant"),
                (ENV_AZURE_CLIENT_ID, "client"),
                (ENV_AZURE_CLIENT_SECRET, "shh"),
            ],
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.platform(), Platform::Azure);

        let err = resolve(
            &[(ENV_PLATFORM, "azure"), (ENV_AZURE_ACCOUNT_NAME, "acct")],
            &Overrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(ENV_AZURE_CLIENT_SECRET));
    }

    #[test]
    fn test_malformed_connection_string() {
        assert!(parse_connection_string("AccountName=acct").is_err());
        assert!(parse_connection_string("garbage").is_err());
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut env = ibm_env();
        env.push((ENV_PLATFORM, ""));
        env.push((ENV_CONCURRENCY, " "));
        let config = resolve(&env, &Overrides::default()).unwrap();
        assert_eq!(config.platform(), Platform::Ibm);
        assert_eq!(config.transfer.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_transfer_settings() {
        let mut env = ibm_env();
        env.push((ENV_CONCURRENCY, "4"));
        env.push((ENV_TIMEOUT_SECS, "30"));
        let config = resolve(&env, &Overrides::default()).unwrap();
        assert_eq!(config.transfer.concurrency, 4);
        assert_eq!(config.transfer.timeout, Some(Duration::from_secs(30)));

        env.push((ENV_CONCURRENCY, "lots"));
        let env_map = vars(&env);
        let err = ConfigFile::default()
            .resolve(|k| env_map.get(k).cloned(), &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains(ENV_CONCURRENCY));
    }

    #[test]
    fn test_zero_concurrency_rejected_and_zero_timeout_disables() {
        let err = resolve(
            &ibm_env(),
            &Overrides {
                concurrency: Some(0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = resolve(
            &ibm_env(),
            &Overrides {
                timeout_secs: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(config.transfer.timeout.is_none());
    }

    #[test]
    fn test_overrides_win() {
        let mut env = ibm_env();
        env.push((ENV_CONCURRENCY, "4"));
        env.push((ENV_LOCAL_ROOT, "/data"));
        let config = resolve(
            &env,
            &Overrides {
                platform: Some(Platform::Local),
                concurrency: Some(16),
                timeout_secs: Some(5),
            },
        )
        .unwrap();
        assert_eq!(config.platform(), Platform::Local);
        assert_eq!(config.transfer.concurrency, 16);
        assert_eq!(config.transfer.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_file_values_below_env() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            schema_version = 1
            platform = "local"

            [transfer]
            concurrency = 3
            timeout_secs = 60

            [local]
            root = "/from/file"
            "#,
        )
        .unwrap();

        let file = ConfigManager::with_path(path).load().unwrap();
        let env = vars(&[(ENV_LOCAL_ROOT, "/from/env")]);
        let config = file
            .resolve(|k| env.get(k).cloned(), &Overrides::default())
            .unwrap();

        assert_eq!(config.transfer.concurrency, 3);
        assert_eq!(config.transfer.timeout, Some(Duration::from_secs(60)));
        assert_eq!(
            config.provider,
            ProviderConfig::Local(LocalConfig {
                root: PathBuf::from("/from/env")
            })
        );
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let config = manager.load().unwrap();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert!(config.platform.is_none());
    }

    #[test]
    fn test_schema_version_too_new() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        std::fs::write(
            manager.config_path(),
            format!("schema_version = {}\n", SCHEMA_VERSION + 1),
        )
        .unwrap();

        let result = manager.load();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("newer than supported"));
    }

    #[test]
    fn test_config_dir_from_lookup() {
        let manager =
            ConfigManager::from_lookup(|k| (k == ENV_CONFIG_DIR).then(|| "/etc/csutil".into()))
                .unwrap();
        assert_eq!(
            manager.config_path(),
            &PathBuf::from("/etc/csutil/config.toml")
        );
    }
}
