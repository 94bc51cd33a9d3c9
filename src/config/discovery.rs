use serde::{Serialize, Deserialize};

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Service type tag peers browse and advertise under
    pub service_type: String,

    /// Start browsing for peers on startup
    pub auto_start_discovery: bool,

    /// Start advertising this device on startup
    pub auto_start_advertising: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: "nearlink-p2p".to_string(),
            auto_start_discovery: true,
            auto_start_advertising: true,
        }
    }
}
