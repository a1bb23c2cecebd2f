//! Command line and environment configuration.

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use starling_api::{ApiConfig, DEFAULT_BASE_URL, SigningKeyMaterial};
use std::path::PathBuf;
use tracing::warn;

pub const MISSING_TOKEN_MESSAGE: &str = "starling-bank-mcp: No access token provided. Set it in the `STARLING_BANK_ACCESS_TOKEN` environment variable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "starling-bank-mcp", version, about = "Starling Bank MCP server")]
pub struct Cli {
    /// Personal access token for the Starling API.
    #[arg(long, env = "STARLING_BANK_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, env = "STARLING_BANK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Signing key PEM: a P-256 (prime256v1) EC private key, SEC1 or PKCS#8. Literal `\n`
    /// sequences are accepted.
    #[arg(long, env = "STARLING_BANK_PRIVATE_KEY_PEM", hide_env_values = true)]
    pub private_key_pem: Option<String>,

    /// Read the signing key PEM from a file instead. Ignored when `--private-key-pem` is set.
    #[arg(long, env = "STARLING_BANK_PRIVATE_KEY_PATH")]
    pub private_key_path: Option<PathBuf>,

    /// Key UID registered with Starling for the signing key.
    #[arg(long, env = "STARLING_BANK_PRIVATE_KEY_UID")]
    pub private_key_uid: Option<String>,

    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    #[arg(long, env = "MCP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Tracing filter directive, e.g. `info` or `starling_api=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// # Errors
    ///
    /// Fails when no non-empty access token was given.
    pub fn access_token(&self) -> anyhow::Result<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .context(MISSING_TOKEN_MESSAGE)
    }

    /// Signing key material, if both the PEM and the UID are configured.
    ///
    /// A PEM without a UID (or the reverse) is reported and ignored; signed calls then fail
    /// with a configuration error.
    ///
    /// # Errors
    ///
    /// Fails when `--private-key-path` points at a file that cannot be read.
    pub async fn signing_material(&self) -> anyhow::Result<Option<SigningKeyMaterial>> {
        let pem = match (&self.private_key_pem, &self.private_key_path) {
            (Some(pem), _) if !pem.trim().is_empty() => Some(pem.clone()),
            (_, Some(path)) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("read signing key {}", path.display()))?,
            ),
            _ => None,
        };
        let uid = self
            .private_key_uid
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        match (pem, uid) {
            (Some(pem), Some(uid)) => Ok(Some(SigningKeyMaterial::new(&pem, uid))),
            (None, None) => Ok(None),
            (Some(_), None) => {
                warn!("signing key PEM configured without STARLING_BANK_PRIVATE_KEY_UID; payments are disabled");
                Ok(None)
            }
            (None, Some(_)) => {
                warn!("signing key UID configured without a PEM; payments are disabled");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Fails on a missing token, an unreadable key file or an invalid base URL.
    pub async fn api_config(&self) -> anyhow::Result<ApiConfig> {
        let config = ApiConfig::new(self.access_token()?)
            .with_base_url(self.base_url.trim())
            .with_signing(self.signing_material().await?);
        config.validate().context("invalid API configuration")?;
        Ok(config)
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
