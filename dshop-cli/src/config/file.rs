//! TOML file configuration structures.
//!
//! These structs map directly to the `dshop.toml` file format. Every
//! section and field is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: ApiConfig,
    pub gateway: GatewayConfig,
    pub session: SessionConfig,
}

/// Backend API section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    pub base_url: String,
    /// Per-call timeout for order and payment calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_owned(),
            timeout_secs: 15,
        }
    }
}

/// Payment gateway section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub script_url: String,
    /// Merchant name shown in the payment widget.
    pub display_name: String,
    /// `#rrggbb`
    pub theme_color: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            script_url: dshop_core::gateway::DEFAULT_SCRIPT_URL.to_owned(),
            display_name: dshop_core::checkout::DEFAULT_MERCHANT_NAME.to_owned(),
            theme_color: dshop_core::checkout::DEFAULT_THEME_COLOR.to_owned(),
        }
    }
}

/// Persisted login section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the session file lives. A leading `~/` expands to `$HOME`.
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: "~/.dshop/session.json".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r##"
[api]
base_url = "https://shop.example.com/api/"
timeout_secs = 20

[gateway]
script_url = "https://checkout.razorpay.com/v1/checkout.js"
display_name = "Corner Store"
theme_color = "#112233"

[session]
path = "/tmp/dshop-session.json"
"##;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api/");
        assert_eq!(config.api.timeout_secs, 20);
        assert_eq!(config.gateway.display_name, "Corner Store");
        assert_eq!(config.session.path, "/tmp/dshop-session.json");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: FileConfig = toml::from_str("[api]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.base_url, "http://localhost:8080/api/");
        assert_eq!(config.gateway, GatewayConfig::default());
        assert_eq!(config.gateway.theme_color, "#4f46e5");
        assert_eq!(config.session.path, "~/.dshop/session.json");
    }
}
