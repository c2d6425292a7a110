//! Auth domain - phone/OTP and email/password login
//!
//! Responsibilities:
//! - Six-slot OTP input assembly (focus advance, backspace-back, paste-fill)
//! - The dual-mode login state machine and its step transitions
//! - Phone number normalization between local and E.164 form

pub mod login;
pub mod otp;
pub mod phone;

pub use login::{LoginFlow, LoginMode, PhoneStep};
pub use otp::OtpBuffer;
