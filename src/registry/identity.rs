use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};

/// Identity of a nearby peer.
///
/// The identifier is opaque and owned by the transport; the display name
/// is whatever the peer advertises about itself. Two identities are the
/// same peer if and only if their identifiers match, regardless of
/// display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerIdentity {
    /// Opaque identifier assigned by the transport
    id: String,

    /// Human-readable name advertised by the peer
    display_name: String,
}

impl PeerIdentity {
    /// Create a new peer identity
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Get the opaque identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the advertised display name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl PartialEq for PeerIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PeerIdentity {}

impl Hash for PeerIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_by_identifier_only() {
        let a = PeerIdentity::new("peer-1", "Kitchen iPad");
        let b = PeerIdentity::new("peer-1", "Renamed iPad");
        let c = PeerIdentity::new("peer-2", "Kitchen iPad");

        // Same id, different name: same peer
        assert_eq!(a, b);

        // Different id, same name: different peers
        assert_ne!(a, c);
    }

    #[test]
    fn hash_follows_equality() {
        let mut set = HashSet::new();
        set.insert(PeerIdentity::new("peer-1", "Kitchen iPad"));
        set.insert(PeerIdentity::new("peer-1", "Renamed iPad"));
        set.insert(PeerIdentity::new("peer-2", "Kitchen iPad"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_shows_name_and_id() {
        let peer = PeerIdentity::new("peer-1", "Kitchen iPad");
        assert_eq!(format!("{}", peer), "Kitchen iPad (peer-1)");
    }
}
