//! Client configuration.

use crate::error::{Result, StarlingApiError};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.starlingbank.com";

/// Private key used to sign payment requests, plus the key UID registered with Starling.
#[derive(Clone)]
pub struct SigningKeyMaterial {
    pub private_key_pem: String,
    pub key_uid: String,
}

impl SigningKeyMaterial {
    /// Build key material from a PEM string.
    ///
    /// PEMs passed through environment variables often arrive with literal `\n` escapes instead
    /// of line breaks; those are expanded here.
    #[must_use]
    pub fn new(private_key_pem: &str, key_uid: impl Into<String>) -> Self {
        Self {
            private_key_pem: private_key_pem.replace("\\n", "\n"),
            key_uid: key_uid.into(),
        }
    }
}

impl std::fmt::Debug for SigningKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyMaterial")
            .field("private_key_pem", &"<redacted>")
            .field("key_uid", &self.key_uid)
            .finish()
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: String,
    pub signing: Option<SigningKeyMaterial>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            signing: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_signing(mut self, signing: Option<SigningKeyMaterial>) -> Self {
        self.signing = signing;
        self
    }

    /// Check the parts of the configuration that can be checked without the network.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the access token is empty or the base URL is not an
    /// absolute `http(s)` URL.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(StarlingApiError::Configuration(
                "access token must not be empty".to_string(),
            ));
        }
        let url = Url::parse(&self.base_url).map_err(|e| {
            StarlingApiError::Configuration(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StarlingApiError::Configuration(format!(
                "unsupported base URL scheme '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("signing", &self.signing)
            .finish()
    }
}
