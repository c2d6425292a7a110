use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domains::profile::models::ProfileRecord;
use crate::domains::profile::resolver;
use crate::kernel::deps::CoreDeps;
use crate::kernel::traits::Identity;

/// Tri-state session. Driven solely by the provider's notifications; UI
/// code never sets it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthSession {
    /// The gate has not yet heard from the provider.
    Authenticating,
    Unauthenticated,
    Authenticated(Identity),
}

/// Surfaces a request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home,
}

/// Snapshot republished to dependents on every session change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: AuthSession,
    /// Cached profile for display (e.g. greeting by username), resolved when
    /// an identity newly appears.
    pub profile: Option<ProfileRecord>,
}

/// Process-wide listener reflecting the provider's session into the app.
///
/// Spawned once at startup; dropping the gate aborts the listener task.
pub struct SessionGate {
    deps: CoreDeps,
    snapshot: watch::Receiver<SessionSnapshot>,
    listener: JoinHandle<()>,
}

impl SessionGate {
    /// Subscribe to the provider's session channel and start reflecting it.
    pub fn spawn(deps: CoreDeps) -> Self {
        let (tx, rx) = watch::channel(SessionSnapshot {
            session: AuthSession::Authenticating,
            profile: None,
        });

        let mut changes = deps.provider.session_changes();
        let task_deps = deps.clone();
        let listener = tokio::spawn(async move {
            // (uid, cached profile) of the identity last seen, so a repeated
            // notification for the same principal does not re-resolve.
            let mut last: Option<(String, Option<ProfileRecord>)> = None;

            loop {
                let current: Option<Identity> = changes.borrow_and_update().as_ref().cloned();

                let snapshot = match current {
                    Some(identity) => {
                        let profile = match &last {
                            Some((uid, cached)) if *uid == identity.uid => cached.clone(),
                            _ => match resolver::resolve(
                                &identity,
                                task_deps.store.as_ref(),
                                &task_deps.config.country_code,
                            )
                            .await
                            {
                                Ok(profile) => profile,
                                Err(err) => {
                                    error!("profile resolution failed: {err:#}");
                                    None
                                }
                            },
                        };
                        last = Some((identity.uid.clone(), profile.clone()));
                        SessionSnapshot {
                            session: AuthSession::Authenticated(identity),
                            profile,
                        }
                    }
                    None => {
                        last = None;
                        SessionSnapshot {
                            session: AuthSession::Unauthenticated,
                            profile: None,
                        }
                    }
                };

                if tx.send(snapshot).is_err() {
                    break;
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
            info!("session listener stopped");
        });

        Self {
            deps,
            snapshot: rx,
            listener,
        }
    }

    /// Channel dependents react to; every session change delivers a new
    /// snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.snapshot.borrow().session,
            AuthSession::Authenticated(_)
        )
    }

    /// Route guard. Authenticated users are sent away from the login and
    /// registration surfaces; everyone else is kept off the home surface.
    /// Callers should wait out `Authenticating` before routing.
    pub fn route(&self, requested: Route) -> Route {
        if self.is_authenticated() {
            match requested {
                Route::Login | Route::Register => Route::Home,
                Route::Home => Route::Home,
            }
        } else {
            match requested {
                Route::Home => Route::Login,
                other => other,
            }
        }
    }

    /// Sign out through the provider; the state transition arrives back
    /// through the subscription. Callers should also reset any login flow to
    /// drop its verifier.
    pub async fn sign_out(&self) {
        self.deps.provider.sign_out().await;
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
