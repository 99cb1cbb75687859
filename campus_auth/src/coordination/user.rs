use crate::utils::gen_random_string;

use super::errors::AuthFlowError;

/// Generate the identifier for a new user record.
pub(super) fn gen_new_user_id() -> Result<String, AuthFlowError> {
    Ok(gen_random_string(32)?)
}
