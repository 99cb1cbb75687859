//! Shared test bootstrap: environment loading, one-time store setup and a
//! helper that walks a fresh account through the whole registration flow.

use std::sync::Once;

use crate::coordination::{
    CompleteRegistrationRequest, complete_registration, initiate_registration, verify_email,
};
use crate::notify::test_support::RecordingMailer;
use crate::userdb::UserStore;

static ENV_INIT: Once = Once::new();

fn init_env() {
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        // Default to a file-backed SQLite database. Pooled connections to
        // sqlite::memory: would each open their own empty database.
        if std::env::var("GENERIC_DATA_STORE_TYPE").is_err() {
            let db_path = std::env::temp_dir().join("campus_auth_test.db");
            let _ = std::fs::remove_file(&db_path);
            unsafe {
                std::env::set_var("GENERIC_DATA_STORE_TYPE", "sqlite");
                std::env::set_var(
                    "GENERIC_DATA_STORE_URL",
                    format!("sqlite:{}", db_path.display()),
                );
            }
        }
    });
}

/// Prepare the test environment and make sure every table exists. Safe to
/// call at the top of every test.
pub(crate) async fn init_test_environment() {
    init_env();
    crate::init().await.expect("test stores should initialize");
}

/// An email address no other test run has seen.
pub(crate) fn unique_test_email() -> String {
    format!("{}@test.example", uuid::Uuid::new_v4())
}

/// Extract the token query parameter carried by a verification link or
/// completion redirect.
pub(crate) fn token_from_link(link: &str) -> String {
    let start = link.find("token=").expect("link should carry a token") + "token=".len();
    link[start..]
        .split('&')
        .next()
        .expect("token parameter should have a value")
        .to_string()
}

/// Run initiation, email verification and completion for `email`, returning
/// the new user's id.
pub(crate) async fn register_verified_user(email: &str, password: &str) -> String {
    let mailer = RecordingMailer::default();
    initiate_registration(email, false, &mailer)
        .await
        .expect("initiation should succeed");

    let link = {
        let sent = mailer.sent.lock().expect("mailer mutex poisoned");
        sent.last().expect("one email should have been sent").1.clone()
    };
    let redirect = verify_email(&token_from_link(&link), false)
        .await
        .expect("verification should succeed");

    complete_registration(CompleteRegistrationRequest {
        token: token_from_link(&redirect),
        password: password.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone_number: "+254700000000".to_string(),
        dormitory: "Qejani".to_string(),
        building: "Block A".to_string(),
        room: "A12".to_string(),
    })
    .await
    .expect("completion should succeed");

    UserStore::get_credential_by_email(email)
        .await
        .expect("credential lookup should succeed")
        .expect("credential should exist")
        .user_id
}
