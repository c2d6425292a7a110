//! Registration domain - account plus profile creation
//!
//! Validates the form, enforces phone uniqueness ahead of identity creation,
//! writes the profile record keyed by the new uid, and fires a best-effort
//! welcome notification.

pub mod workflow;

pub use workflow::{sanitize_email_prefix, RegistrationFlow, RegistrationForm};
