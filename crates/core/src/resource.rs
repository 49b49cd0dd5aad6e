use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct ResourceInner {
    id: u64,
    label: String,
}

/// Identity token for an exclusive resource (a disk channel, a device, ...).
///
/// Handles compare by identity, not by value: two handles created with the
/// same label are different resources, while clones of one handle are the
/// same resource. Each handle is stamped with a process-wide issue id that
/// orders the scheduler's resource groups.
#[derive(Clone)]
pub struct ResourceHandle(Arc<ResourceInner>);

impl ResourceHandle {
    /// Issue a new resource identity.
    pub fn new(label: impl Into<String>) -> Self {
        let id = NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed);
        Self(Arc::new(ResourceInner {
            id,
            label: label.into(),
        }))
    }

    /// Issue sequence number. Unique per handle, increasing in creation order.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Human-readable name for logging.
    pub fn label(&self) -> &str {
        &self.0.label
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ResourceHandle {}

impl Hash for ResourceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({}#{})", self.0.label, self.0.id)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.0.label, self.0.id)
    }
}
