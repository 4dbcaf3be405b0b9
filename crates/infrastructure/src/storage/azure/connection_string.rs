//! Azure Storage connection strings
//!
//! `DefaultEndpointsProtocol=https;AccountName=...;AccountKey=...;EndpointSuffix=core.windows.net`
//! with an optional `BlobEndpoint`, or `UseDevelopmentStorage=true` for the
//! local emulator.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use url::Url;

use blob_log_domain::shared_kernel::ConfigError;

/// Well-known account of the storage emulator
pub const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
pub const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
pub const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

#[derive(Clone)]
pub struct AzureConnectionString {
    pub account_name: String,
    pub account_key: Vec<u8>,
    pub blob_endpoint: Url,
}

impl std::fmt::Debug for AzureConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConnectionString")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("blob_endpoint", &self.blob_endpoint.as_str())
            .finish()
    }
}

impl AzureConnectionString {
    pub fn parse(connection_string: &str) -> Result<Self, ConfigError> {
        let pairs: HashMap<String, String> = connection_string
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                    .ok_or_else(|| {
                        ConfigError::InvalidConnectionString(format!(
                            "expected key=value, got: {}",
                            part
                        ))
                    })
            })
            .collect::<Result<_, _>>()?;

        if pairs
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Self::development();
        }

        let account_name = pairs
            .get("accountname")
            .cloned()
            .ok_or_else(|| missing("AccountName"))?;
        let account_key_b64 = pairs.get("accountkey").ok_or_else(|| missing("AccountKey"))?;
        let account_key = STANDARD.decode(account_key_b64).map_err(|e| {
            ConfigError::InvalidConnectionString(format!("AccountKey is not valid base64: {}", e))
        })?;

        let blob_endpoint = match pairs.get("blobendpoint") {
            Some(endpoint) => parse_endpoint(endpoint)?,
            None => {
                let protocol = pairs
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = pairs
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                parse_endpoint(&format!("{}://{}.blob.{}", protocol, account_name, suffix))?
            }
        };

        Ok(Self {
            account_name,
            account_key,
            blob_endpoint,
        })
    }

    /// Settings of the local storage emulator
    pub fn development() -> Result<Self, ConfigError> {
        Ok(Self {
            account_name: DEV_ACCOUNT_NAME.to_string(),
            account_key: STANDARD.decode(DEV_ACCOUNT_KEY).map_err(|e| {
                ConfigError::InvalidConnectionString(format!("emulator key: {}", e))
            })?,
            blob_endpoint: parse_endpoint(DEV_BLOB_ENDPOINT)?,
        })
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::InvalidConnectionString(format!("missing {}", key))
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(endpoint.trim_end_matches('/')).map_err(|e| {
        ConfigError::InvalidConnectionString(format!("invalid endpoint {}: {}", endpoint, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidConnectionString(format!(
            "unsupported endpoint scheme: {}",
            other
        ))),
    }
}
