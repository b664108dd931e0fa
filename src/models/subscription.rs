use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an entity watched for real-time updates.
///
/// The connection manager keys its active-subscription set on the full
/// `(entity, id)` pair. The set survives reconnects: every entry is replayed
/// to the server each time the connection reaches Open, and entries leave the
/// set only through an explicit unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    /// Entity kind, e.g. `"transaction"` or `"vault"`.
    pub entity: String,
    /// Entity identifier.
    pub id: String,
}

impl Subscription {
    /// Create a subscription key.
    pub fn new(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_set_semantics() {
        let mut set = HashSet::new();
        assert!(set.insert(Subscription::new("transaction", "T1")));
        assert!(!set.insert(Subscription::new("transaction", "T1")));
        assert!(set.insert(Subscription::new("vault", "T1")));
        assert_eq!(set.len(), 2);

        assert!(set.remove(&Subscription::new("transaction", "T1")));
        assert!(!set.remove(&Subscription::new("transaction", "T1")));
        assert_eq!(set.len(), 1);
    }
}
