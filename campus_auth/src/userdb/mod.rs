mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use storage::UserStore;
pub use types::{Credential, ProfileUpdate, StudentProfile, User, UserRole};

pub(crate) async fn init() -> Result<(), UserError> {
    UserStore::init().await
}
