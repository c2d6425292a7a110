pub mod busy;
pub mod errors;

pub use busy::{InFlight, InFlightPermit};
pub use errors::{AuthError, ProviderError};
