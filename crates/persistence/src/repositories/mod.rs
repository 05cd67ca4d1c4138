//! Repository implementations over whole-document stores.

pub mod device;
pub mod status;
pub mod status_list;

pub use device::DeviceRepository;
pub use status::StatusRepository;
pub use status_list::StatusListRepository;

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Serializes read-modify-write cycles against one document.
///
/// When disabled, concurrent mutations race and the last write wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct WriteLock(Option<Arc<Mutex<()>>>);

impl WriteLock {
    pub(crate) fn new(serialize: bool) -> Self {
        if serialize {
            Self(Some(Arc::new(Mutex::new(()))))
        } else {
            Self(None)
        }
    }

    pub(crate) async fn acquire(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.0 {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}
