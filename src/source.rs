//! Where splitters get their options from.
//!
//! A splitter takes exactly one snapshot of its options at the start of a
//! call and uses it until the call returns. Publishing new options through a
//! [`LiveOptions`] affects the next call, never one that is already running:
//!
//! ```text
//! publish(A)   split #1 ─── snapshot A ─────────────── done
//! publish(B)                       split #2 ─── snapshot B ─── done
//!                                  (split #1 still sees A)
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

/// A provider of immutable option snapshots.
pub trait OptionsSource<T>: Send + Sync {
    /// The current options. Cheap: clones an `Arc`.
    fn snapshot(&self) -> Arc<T>;
}

/// A fixed set of options.
impl<T: Send + Sync> OptionsSource<T> for Arc<T> {
    fn snapshot(&self) -> Arc<T> {
        Arc::clone(self)
    }
}

/// Options that can be replaced between calls, e.g. on config file reload.
///
/// ```rust
/// use kerf::{LiveOptions, OptionsSource, TextSplitterOptions};
///
/// let live = LiveOptions::new(TextSplitterOptions::prose(500));
/// let before = live.snapshot();
///
/// live.publish(TextSplitterOptions::prose(200));
///
/// assert_eq!(before.chunk_size, 500); // held snapshots never change
/// assert_eq!(live.snapshot().chunk_size, 200);
/// ```
#[derive(Debug, Default)]
pub struct LiveOptions<T> {
    current: RwLock<Arc<T>>,
}

impl<T> LiveOptions<T> {
    /// Start with `initial` as the current snapshot.
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Replace the current snapshot. Calls already in flight keep theirs.
    pub fn publish(&self, next: T) {
        *self.current.write() = Arc::new(next);
    }
}

impl<T: Send + Sync> OptionsSource<T> for LiveOptions<T> {
    fn snapshot(&self) -> Arc<T> {
        Arc::clone(&*self.current.read())
    }
}
