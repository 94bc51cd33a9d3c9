// Peer membership module

pub mod identity;
pub mod policy;
pub mod registry;
pub mod state;

pub use identity::PeerIdentity;
pub use registry::PeerRegistry;
pub use state::ConnectionState;
