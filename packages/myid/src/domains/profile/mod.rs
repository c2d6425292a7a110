//! Profile domain - the stored user profile and its resolver
//!
//! Profiles are written once at registration and resolved after login by
//! provider uid, with a phone-index fallback for accounts that signed in by
//! OTP before ever registering a linked profile key.

pub mod models;
pub mod resolver;

pub use models::ProfileRecord;
pub use resolver::resolve;
