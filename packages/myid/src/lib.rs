// MyID - Identity Core
//
// This crate provides the identity-resolution and authentication core for
// the MyID account system: phone/OTP and email/password login, registration
// with phone-uniqueness enforcement, profile resolution, and the
// process-wide session gate.
//
// Flows live in domains/*; infrastructure trait seams and adapters live in
// kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
