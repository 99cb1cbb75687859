mod config;
mod errors;
mod storage;

pub use config::VERIFICATION_TOKEN_TTL;
pub use errors::RegistrationError;
pub use storage::VerificationTokenStore;

pub(crate) async fn init() -> Result<(), RegistrationError> {
    VerificationTokenStore::init().await
}
