//! Session domain - the process-wide session gate
//!
//! Single source of truth for "is someone logged in". Reflects the identity
//! provider's session channel into the application and owns all route
//! guarding; no other component may declare a user authenticated.

pub mod gate;

pub use gate::{AuthSession, Route, SessionGate, SessionSnapshot};
