use serde::{Serialize, Deserialize};

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Display names to auto-invite when discovered; empty disables
    /// auto-invite
    pub auto_invite_names: Vec<String>,

    /// How long an invited peer has to answer, in seconds
    pub invite_timeout_secs: u64,

    /// Accept incoming invitations from peers we are not connected to
    pub auto_accept: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_invite_names: vec![],
            invite_timeout_secs: 20,
            auto_accept: true,
        }
    }
}
