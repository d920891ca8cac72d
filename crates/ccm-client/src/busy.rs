use std::sync::atomic::{AtomicUsize, Ordering};

/// Advisory in-flight counter backing `is_loading()` / `is_copying()`.
///
/// It does not serialize anything: overlapping operations each hold their
/// own guard and the flag reads true while any of them is running.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(AtomicUsize);

impl BusyFlag {
    pub(crate) fn enter(&self) -> BusyGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        BusyGuard(&self.0)
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// Clears its share of the flag on drop, including on early return.
pub(crate) struct BusyGuard<'a>(&'a AtomicUsize);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
