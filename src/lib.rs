// Nearlink - peer discovery and session membership for ad-hoc local networks

pub mod config;
pub mod registry;
pub mod service;
pub mod transport;

// Initialize logging
pub fn init_logger() {
    env_logger::init();
}
