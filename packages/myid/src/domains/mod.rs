pub mod auth;
pub mod profile;
pub mod registration;
pub mod session;
