/*!
 * Descriptor Table
 * Guest-visible fd numbers mapped to host resource handles
 */

use crate::core::Fd;
use dashmap::DashMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

/// The host-side object behind a guest fd.
#[derive(Debug)]
pub enum HostResource {
    Stdin,
    Stdout,
    Stderr,
    /// A real host file, owned by the table entry
    File(File),
    /// Lives entirely in the guest's own virtual filesystem; no host backing
    Virtual,
}

impl HostResource {
    /// Whether a host-level handle exists for this resource.
    #[inline]
    #[must_use]
    pub const fn is_host_backed(&self) -> bool {
        !matches!(self, HostResource::Virtual)
    }
}

/// One live descriptor.
#[derive(Debug)]
pub struct DescriptorEntry {
    pub resource: HostResource,
    /// Path the descriptor was opened with, when known
    pub path: Option<PathBuf>,
}

impl DescriptorEntry {
    #[must_use]
    pub fn new(resource: HostResource) -> Self {
        Self { resource, path: None }
    }

    #[must_use]
    pub fn with_path(resource: HostResource, path: PathBuf) -> Self {
        Self { resource, path: Some(path) }
    }
}

/// Shared map from guest fd to host resource.
///
/// The table is the single owner of every entry; handlers look entries up
/// per call and never cache them. Calls in this domain only consult the
/// table; open/close/dup live in the file-I/O domain but mutate the same
/// instance, so insertion and removal are part of the contract here too.
///
/// One table per sandbox context. Never share an instance across contexts.
pub struct DescriptorTable {
    entries: DashMap<Fd, Arc<DescriptorEntry>, ahash::RandomState>,
}

impl DescriptorTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// A table pre-populated with the three standard streams.
    #[must_use]
    pub fn with_stdio() -> Self {
        let table = Self::new();
        table.insert(0, DescriptorEntry::new(HostResource::Stdin));
        table.insert(1, DescriptorEntry::new(HostResource::Stdout));
        table.insert(2, DescriptorEntry::new(HostResource::Stderr));
        table
    }

    /// Look up a live descriptor. `None` means the guest passed a closed or
    /// never-opened fd; the caller must translate that to EBADF and must
    /// not touch the host.
    #[must_use]
    pub fn lookup(&self, fd: Fd) -> Option<Arc<DescriptorEntry>> {
        self.entries.get(&fd).map(|entry| Arc::clone(entry.value()))
    }

    /// Install `entry` under `fd`, replacing any previous mapping.
    pub fn insert(&self, fd: Fd, entry: DescriptorEntry) {
        self.entries.insert(fd, Arc::new(entry));
    }

    /// Drop the mapping for `fd`. Returns the entry if one was live.
    pub fn remove(&self, fd: Fd) -> Option<Arc<DescriptorEntry>> {
        self.entries.remove(&fd).map(|(_, entry)| entry)
    }

    /// Visit every live descriptor. Used by whole-table operations (`sync`).
    pub fn for_each(&self, mut visit: impl FnMut(Fd, &DescriptorEntry)) {
        for item in self.entries.iter() {
            visit(*item.key(), item.value());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::with_stdio()
    }
}
