//! Shared registry of transaction processors available for dispatch.
//!
//! Records are keyed by `(family, version)` with multiplicity: several
//! connections may register the same processor type (horizontal scaling
//! of one worker family) and each gets its own record. A secondary index
//! from connection to held keys makes connection-scoped removal
//! proportional to that connection's records rather than a full scan.
//!
//! All mutations run under a single lock, so removing a connection is
//! atomic: a concurrent reader sees either all of its records or none.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use crate::protocol::HeaderStyle;

/// Identity of the network connection a processor registered over.
///
/// Assigned by the transport layer and stable for the connection's
/// lifetime. This is the key used to purge a connection's records on
/// unregistration or disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a connection identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A family of interchangeable workers: family name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessorType {
    pub family: String,
    pub version: String,
}

impl ProcessorType {
    /// Create a processor type key.
    pub fn new(family: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ProcessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.version)
    }
}

/// One registered worker instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processor {
    /// Connection that registered this worker; the removal key.
    pub connection_id: ConnectionId,
    /// Address prefixes this worker claims authority over.
    pub namespaces: Vec<String>,
    /// Maximum concurrent units of work; always > 0 in a stored record.
    pub max_occupancy: u32,
    /// Whether dispatched work headers are sent pre-parsed or raw.
    pub header_style: HeaderStyle,
}

impl Processor {
    /// Create a processor record.
    pub fn new(
        connection_id: ConnectionId,
        namespaces: Vec<String>,
        max_occupancy: u32,
        header_style: HeaderStyle,
    ) -> Self {
        Self {
            connection_id,
            namespaces,
            max_occupancy,
            header_style,
        }
    }
}

#[derive(Default)]
struct Inner {
    /// Records per processor type.
    by_type: HashMap<ProcessorType, Vec<Processor>>,
    /// Which types each connection holds records under.
    by_connection: HashMap<ConnectionId, HashSet<ProcessorType>>,
}

/// Concurrency-safe multimap of registered processors.
///
/// Shared between the registration handlers and the work dispatcher.
/// Records are created only by registration and destroyed only by
/// [`ProcessorRegistry::remove_connection`] (invoked on unregistration
/// and on connection loss).
#[derive(Default)]
pub struct ProcessorRegistry {
    inner: RwLock<Inner>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record for the given processor type.
    ///
    /// Insertion appends: an existing record for the same type held by
    /// another connection is never replaced.
    pub fn insert(&self, processor_type: ProcessorType, processor: Processor) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner
            .by_connection
            .entry(processor.connection_id.clone())
            .or_default()
            .insert(processor_type.clone());
        inner
            .by_type
            .entry(processor_type)
            .or_default()
            .push(processor);
    }

    /// Remove every record registered by `connection_id`, across all
    /// processor types.
    ///
    /// Returns the number of records removed. Removing for a connection
    /// with no records is a no-op, not an error.
    pub fn remove_connection(&self, connection_id: &ConnectionId) -> usize {
        let mut inner = self.inner.write().expect("registry lock poisoned");

        let types = match inner.by_connection.remove(connection_id) {
            Some(types) => types,
            None => return 0,
        };

        let mut removed = 0;
        for processor_type in types {
            if let Some(records) = inner.by_type.get_mut(&processor_type) {
                let before = records.len();
                records.retain(|p| &p.connection_id != connection_id);
                removed += before - records.len();
                if records.is_empty() {
                    inner.by_type.remove(&processor_type);
                }
            }
        }
        removed
    }

    /// Snapshot of the records registered for a processor type.
    pub fn processors_for(&self, processor_type: &ProcessorType) -> Vec<Processor> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .by_type
            .get(processor_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Processor types the connection currently holds records under.
    pub fn connection_types(&self, connection_id: &ConnectionId) -> Vec<ProcessorType> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .by_connection
            .get(connection_id)
            .map(|types| types.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of stored records.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.by_type.values().map(Vec::len).sum()
    }

    /// Check whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
