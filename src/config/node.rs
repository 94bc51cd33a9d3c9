use serde::{Serialize, Deserialize};

/// Node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Fixed peer identifier; generated by the transport when absent
    pub peer_id: Option<String>,

    /// Display name advertised to nearby peers
    pub display_name: String,

    /// Log level
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            peer_id: None,
            display_name: "nearlink-node".to_string(),
            log_level: "info".to_string(),
        }
    }
}
