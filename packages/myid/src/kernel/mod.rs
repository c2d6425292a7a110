// Kernel - infrastructure layer
//
// Trait seams for external collaborators, the dependency container handed to
// every flow, concrete adapters (Identity Platform, EmailJS), and the fake
// implementations used by the integration tests.

pub mod deps;
pub mod emailjs;
pub mod identity_platform;
pub mod test_dependencies;
pub mod traits;

pub use deps::CoreDeps;
pub use emailjs::EmailJsClient;
pub use identity_platform::IdentityPlatform;
pub use traits::{
    BaseConfirmation, BaseIdentityProvider, BaseNotifier, BaseProfileStore, Identity,
    VerifierToken, WelcomeParams,
};
