//! ID types and their generators
//!
//! Nodes and connections are numbered by counters owned by the network that
//! creates them. Ids are handed out in creation order and never reused, even
//! when a node is pruned later.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a track node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identifier of a track connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Monotonic id source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` ids were requested
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.checked_add(1).expect("id counter overflow");
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.next
    }
}
