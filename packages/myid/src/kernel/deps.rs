//! Core dependencies for flows (using traits for testability)
//!
//! This module provides the central dependency container used by the login,
//! registration, resolution and session flows. All external collaborators
//! sit behind trait abstractions to enable testing.

use std::sync::Arc;

use crate::config::Config;
use crate::kernel::traits::{BaseIdentityProvider, BaseNotifier, BaseProfileStore};

/// Dependencies accessible to every flow.
#[derive(Clone)]
pub struct CoreDeps {
    pub provider: Arc<dyn BaseIdentityProvider>,
    pub store: Arc<dyn BaseProfileStore>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub config: Config,
}

impl CoreDeps {
    pub fn new(
        provider: Arc<dyn BaseIdentityProvider>,
        store: Arc<dyn BaseProfileStore>,
        notifier: Arc<dyn BaseNotifier>,
        config: Config,
    ) -> Self {
        Self {
            provider,
            store,
            notifier,
            config,
        }
    }
}
