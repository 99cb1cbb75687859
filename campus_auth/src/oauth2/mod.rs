mod config;
mod errors;
mod idtoken;
mod types;

pub use errors::OAuth2Error;
pub use idtoken::verify_google_id_token;
pub use types::IdInfo;
