mod errors;
mod storage;
mod types;

pub use errors::SessionError;
pub use storage::RefreshTokenStore;
pub use types::RefreshTokenRecord;

pub(crate) async fn init() -> Result<(), SessionError> {
    RefreshTokenStore::init().await
}
