// Common test utilities

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::timeout;

use myid_core::domains::profile::models::ProfileRecord;
use myid_core::domains::session::SessionSnapshot;
use myid_core::kernel::deps::CoreDeps;
use myid_core::kernel::test_dependencies::{
    test_config, FakeIdentityProvider, MemoryProfileStore, RecordingNotifier,
};
use myid_core::kernel::traits::{BaseIdentityProvider, BaseNotifier, BaseProfileStore};

/// Holds the fake collaborators alongside the dependency container built
/// from them, so tests can drive flows through `deps()` and then assert on
/// what reached each fake.
pub struct TestHarness {
    pub provider: Arc<FakeIdentityProvider>,
    pub store: Arc<MemoryProfileStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_provider(FakeIdentityProvider::new())
    }

    pub fn with_provider(provider: FakeIdentityProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            store: Arc::new(MemoryProfileStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    pub fn deps(&self) -> CoreDeps {
        CoreDeps::new(
            Arc::clone(&self.provider) as Arc<dyn BaseIdentityProvider>,
            Arc::clone(&self.store) as Arc<dyn BaseProfileStore>,
            Arc::clone(&self.notifier) as Arc<dyn BaseNotifier>,
            test_config(),
        )
    }
}

/// A stored profile for "Somchai", registered under the local-format number
/// 0899999999.
pub fn somchai_profile() -> ProfileRecord {
    ProfileRecord {
        username: "somchai".to_string(),
        full_name: "Somchai Jaidee".to_string(),
        phone: "0899999999".to_string(),
        email: "somchai@gmail.com".to_string(),
        created_at: Utc::now(),
        provider: "email".to_string(),
    }
}

/// Wait until the session gate publishes a snapshot matching `pred`, failing
/// the test after one second.
pub async fn wait_for_snapshot(
    rx: &mut watch::Receiver<SessionSnapshot>,
    pred: impl Fn(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    timeout(Duration::from_secs(1), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if pred(&snapshot) {
                    return SessionSnapshot::clone(&snapshot);
                }
            }
            rx.changed().await.expect("session channel closed");
        }
    })
    .await
    .expect("timed out waiting for session snapshot")
}
