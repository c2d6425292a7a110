use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-permit busy flag for a flow's outbound requests.
///
/// The permit releases the flag when dropped, including when the holding
/// future is cancelled mid-await, so an abandoned request can never leave a
/// flow stuck busy.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Take the permit; `None` while another request holds it.
    pub fn acquire(&self) -> Option<InFlightPermit> {
        if self.0.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(InFlightPermit(Arc::clone(&self.0)))
        }
    }
}

pub struct InFlightPermit(Arc<AtomicBool>);

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
