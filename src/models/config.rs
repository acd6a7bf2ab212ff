//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::facet::AddressDraft;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Cookie signing key material, at least 64 bytes.
    pub secret: String,
    /// Root of the storefront REST backend.
    pub backend_url: String,
    /// Storefront root; checkout visits without a basket are sent here.
    pub storefront_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_calling_code")]
    pub country_calling_code: u16,
    #[serde(default = "default_country")]
    pub country_name: String,
    pub pickup_address: AddressDraft,
}

fn default_request_timeout() -> u64 {
    15
}

fn default_calling_code() -> u16 {
    49
}

fn default_country() -> String {
    "Germany".to_string()
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        backend_url: "http://127.0.0.1:9/".to_string(),
        storefront_url: "/".to_string(),
        request_timeout_secs: 5,
        country_calling_code: 49,
        country_name: "Germany".to_string(),
        pickup_address: AddressDraft {
            building_number: "7".to_string(),
            street: "Marktplatz".to_string(),
            town: "Heidelberg".to_string(),
            pincode: "69117".to_string(),
        },
    }
}
