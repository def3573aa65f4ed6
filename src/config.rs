//! Tunables for the device operations.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host tool can
//! embed a partial `[hoth]` section in its own configuration file and omit
//! anything it does not care about.

use serde::Deserialize;

use crate::domain::tokens::params::MAX_TOKEN_RESPONSE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenQueryConfig {
    /// Response capacity for `GetTokensInSet`, and the ceiling on the token blob.
    pub max_token_response_len: usize,
}

impl Default for TokenQueryConfig {
    fn default() -> Self {
        Self {
            max_token_response_len: MAX_TOKEN_RESPONSE_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Largest provisioning log the host will reassemble.
    pub log_max_len: usize,
    /// Bytes requested per chunked read.
    pub chunk_max_len: usize,
    /// Largest certificate accepted from validate-and-sign.
    pub cert_max_len: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            log_max_len: 2048,
            chunk_max_len: 1008,
            cert_max_len: 240,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HothConfig {
    pub tokens: TokenQueryConfig,
    pub provisioning: ProvisioningConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_limits() {
        let cfg = HothConfig::default();
        assert_eq!(cfg.tokens.max_token_response_len, 1024);
        assert_eq!(cfg.provisioning.chunk_max_len, 1008);
        assert_eq!(cfg.provisioning.log_max_len, 2048);
        assert_eq!(cfg.provisioning.cert_max_len, 240);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: HothConfig =
            serde_json::from_str(r#"{ "tokens": { "max_token_response_len": 512 } }"#).unwrap();
        assert_eq!(cfg.tokens.max_token_response_len, 512);
        assert_eq!(cfg.provisioning, ProvisioningConfig::default());

        let empty: HothConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, HothConfig::default());
    }
}
