use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

// ---------------------------------------------------------------------------
// Memo – per-loader memoization table
// ---------------------------------------------------------------------------

struct MemoEntry<V> {
    value: Arc<V>,
    loaded_at: Instant,
}

/// Memoization table mapping a loader key to its loaded value and load time.
///
/// Values are never invalidated for the life of the process; new data on
/// disk requires a restart. Load failures are not stored, so a later call
/// with the same key retries the read.
pub struct Memo<K, V> {
    entries: Mutex<HashMap<K, MemoEntry<V>>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Memo {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Memo<K, V> {
    /// Return the cached value for `key`, running `load` on the first call.
    ///
    /// The table lock is held across `load`; loads are blocking local reads
    /// in a single-threaded render model, so there is nothing to overlap.
    pub fn get_or_load<E>(
        &self,
        key: &K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(&entry.value));
        }
        let value = Arc::new(load()?);
        entries.insert(
            key.clone(),
            MemoEntry {
                value: Arc::clone(&value),
                loaded_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// When the value for `key` was loaded, if it is resident.
    pub fn loaded_at(&self, key: &K) -> Option<Instant> {
        self.entries.lock().get(key).map(|e| e.loaded_at)
    }
}
