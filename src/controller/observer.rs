//! Observer interface for hosts that render form state.

use crate::state::FormSnapshot;

/// Receives a fresh snapshot after every form state change.
///
pub trait FormObserver: Send + Sync {
    fn notify(&self, snapshot: &FormSnapshot);
}

impl<F> FormObserver for F
where
    F: Fn(&FormSnapshot) + Send + Sync,
{
    fn notify(&self, snapshot: &FormSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);
