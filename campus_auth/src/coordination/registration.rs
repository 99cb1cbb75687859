//! Registration flows: initiation, email verification and completion.
//!
//! Initiation is deliberately idempotent-looking from the outside: it
//! succeeds for brand new emails and for unverified retries alike, and only
//! a verified account makes it fail. Each retry replaces the outstanding
//! verification token, so at most one link per email is ever live.

use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::{APP_URL, FRONTEND_URL_COMPLETE_SIGNUP, MOBILE_URL_COMPLETE_SIGNUP};
use crate::notify::VerificationMailer;
use crate::password::hash_password;
use crate::registration::{VERIFICATION_TOKEN_TTL, VerificationTokenStore};
use crate::token::{
    COMPLETION_TOKEN_TTL, CompletionClaims, sign_completion_token, verify_completion_token,
};
use crate::userdb::{ProfileUpdate, User, UserStore};

use super::errors::AuthFlowError;
use super::user::gen_new_user_id;

/// Everything the completion step needs: the completion token plus the
/// password and profile fields collected by the signup form.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteRegistrationRequest {
    pub token: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub dormitory: String,
    pub building: String,
    pub room: String,
}

/// Start (or restart) registration for an email address.
///
/// A new email gets a pending user with its credential, empty student
/// profile and verification token created atomically. An unverified email
/// gets its token replaced. A verified email is rejected.
pub async fn initiate_registration(
    email: &str,
    is_mobile: bool,
    mailer: &dyn VerificationMailer,
) -> Result<String, AuthFlowError> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::seconds(*VERIFICATION_TOKEN_TTL);

    match UserStore::get_credential_by_email(email).await? {
        Some(credential) => {
            let user = UserStore::get_user(&credential.user_id).await?.ok_or_else(|| {
                AuthFlowError::Database(format!(
                    "Credential without user row: {}",
                    credential.user_id
                ))
            })?;
            if user.verified {
                return Err(AuthFlowError::AlreadyRegistered.log());
            }
            VerificationTokenStore::upsert_token(&user.id, &token, expires_at).await?;
        }
        None => {
            let user = User::new_pending(gen_new_user_id()?);
            UserStore::create_pending_user(user, email, &token, expires_at).await?;
        }
    }

    let link = format!(
        "{}/api/auth/signup/verify?token={}&mobile={}",
        *APP_URL, token, is_mobile
    );
    // Delivery is best-effort: state is already committed and the user can
    // always re-initiate to get a fresh link.
    if let Err(e) = mailer.send_verification_email(email, &link).await {
        tracing::error!("Failed to send verification email to {}: {}", email, e);
    }

    Ok("Verification email sent".to_string())
}

/// Consume a verification token and hand back the redirect URL carrying the
/// completion token. The verification token is single-use; a second click on
/// the same link fails.
pub async fn verify_email(token: &str, is_mobile: bool) -> Result<String, AuthFlowError> {
    let user_id = VerificationTokenStore::consume_token(token, Utc::now())
        .await?
        .ok_or_else(|| AuthFlowError::InvalidOrExpiredToken.log())?;

    let claims = CompletionClaims::new(user_id, *COMPLETION_TOKEN_TTL);
    let completion_token = sign_completion_token(&claims)?;

    let redirect = if is_mobile {
        format!("{}/{}", *MOBILE_URL_COMPLETE_SIGNUP, completion_token)
    } else {
        format!("{}?token={}", *FRONTEND_URL_COMPLETE_SIGNUP, completion_token)
    };
    Ok(redirect)
}

/// Finish registration: set the password and profile fields and mark the
/// user verified, in one transaction.
pub async fn complete_registration(
    request: CompleteRegistrationRequest,
) -> Result<String, AuthFlowError> {
    let claims =
        verify_completion_token(&request.token).map_err(|_| AuthFlowError::Unauthorized.log())?;

    match UserStore::get_user(&claims.user_id).await? {
        None => {
            return Err(AuthFlowError::InvalidState("User not found".to_string()).log());
        }
        Some(user) if user.verified => {
            return Err(AuthFlowError::InvalidState("User already verified".to_string()).log());
        }
        Some(_) => {}
    }

    let password_hash = hash_password(&request.password)?;
    let profile = ProfileUpdate {
        first_name: request.first_name,
        last_name: request.last_name,
        phone_number: request.phone_number,
        dormitory: request.dormitory,
        building: request.building,
        room: request.room,
    };
    UserStore::finalize_registration(&claims.user_id, &profile, &password_hash).await?;

    Ok("Registration completed successfully".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::test_support::RecordingMailer;
    use crate::test_utils::{
        init_test_environment, register_verified_user, token_from_link, unique_test_email,
    };
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_initiation_creates_pending_user_and_sends_link() {
        init_test_environment().await;
        let mailer = RecordingMailer::default();
        let email = unique_test_email();

        let message = initiate_registration(&email, false, &mailer)
            .await
            .expect("initiation should succeed");
        assert_eq!(message, "Verification email sent");

        let sent = mailer.sent.lock().expect("mailer mutex poisoned");
        assert_eq!(sent.len(), 1);
        let (to, link) = &sent[0];
        assert_eq!(to, &email);
        assert!(link.contains("/api/auth/signup/verify?token="));
        assert!(link.ends_with("&mobile=false"));

        let credential = UserStore::get_credential_by_email(&email)
            .await
            .expect("lookup should succeed")
            .expect("credential should exist");
        assert!(credential.password_hash.is_none());

        let user = UserStore::get_user(&credential.user_id)
            .await
            .expect("lookup should succeed")
            .expect("user should exist");
        assert!(!user.verified);

        let profile = UserStore::get_student_profile(&user.id)
            .await
            .expect("lookup should succeed")
            .expect("student profile should exist");
        assert_eq!(profile.dormitory, None);
    }

    #[tokio::test]
    #[serial]
    async fn test_initiation_succeeds_even_when_email_delivery_fails() {
        init_test_environment().await;
        let mailer = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        let email = unique_test_email();

        initiate_registration(&email, true, &mailer)
            .await
            .expect("initiation should succeed despite delivery failure");

        // The pending account was still committed
        assert!(
            UserStore::get_credential_by_email(&email)
                .await
                .expect("lookup should succeed")
                .is_some()
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_reinitiation_invalidates_previous_token() {
        init_test_environment().await;
        let mailer = RecordingMailer::default();
        let email = unique_test_email();

        initiate_registration(&email, false, &mailer)
            .await
            .expect("first initiation should succeed");
        initiate_registration(&email, false, &mailer)
            .await
            .expect("second initiation should succeed");

        let (first_token, second_token) = {
            let sent = mailer.sent.lock().expect("mailer mutex poisoned");
            assert_eq!(sent.len(), 2);
            (token_from_link(&sent[0].1), token_from_link(&sent[1].1))
        };
        assert_ne!(first_token, second_token);

        assert!(matches!(
            verify_email(&first_token, false).await,
            Err(AuthFlowError::InvalidOrExpiredToken)
        ));
        verify_email(&second_token, false)
            .await
            .expect("the replacement token should verify");
    }

    #[tokio::test]
    #[serial]
    async fn test_initiation_rejects_verified_account() {
        init_test_environment().await;
        let email = unique_test_email();
        register_verified_user(&email, "hunter2hunter2").await;

        let mailer = RecordingMailer::default();
        assert!(matches!(
            initiate_registration(&email, false, &mailer).await,
            Err(AuthFlowError::AlreadyRegistered)
        ));
        assert!(mailer.sent.lock().expect("mailer mutex poisoned").is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_verification_token_is_single_use() {
        init_test_environment().await;
        let mailer = RecordingMailer::default();
        let email = unique_test_email();

        initiate_registration(&email, false, &mailer)
            .await
            .expect("initiation should succeed");
        let token = {
            let sent = mailer.sent.lock().expect("mailer mutex poisoned");
            token_from_link(&sent[0].1)
        };

        verify_email(&token, false)
            .await
            .expect("first use should succeed");
        assert!(matches!(
            verify_email(&token, false).await,
            Err(AuthFlowError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_expired_verification_token_rejected() {
        init_test_environment().await;
        let mailer = RecordingMailer::default();
        let email = unique_test_email();

        initiate_registration(&email, false, &mailer)
            .await
            .expect("initiation should succeed");
        let user_id = UserStore::get_credential_by_email(&email)
            .await
            .expect("lookup should succeed")
            .expect("credential should exist")
            .user_id;

        // Replace the token with one whose expiry has just passed
        let stale = Uuid::new_v4().to_string();
        VerificationTokenStore::upsert_token(&user_id, &stale, Utc::now())
            .await
            .expect("upsert should succeed");

        assert!(matches!(
            verify_email(&stale, false).await,
            Err(AuthFlowError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_verification_token_rejected() {
        init_test_environment().await;
        assert!(matches!(
            verify_email("no-such-token", false).await,
            Err(AuthFlowError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_redirect_shape_differs_by_client() {
        init_test_environment().await;
        let mailer = RecordingMailer::default();

        let email = unique_test_email();
        initiate_registration(&email, false, &mailer)
            .await
            .expect("initiation should succeed");
        let token = {
            let sent = mailer.sent.lock().expect("mailer mutex poisoned");
            token_from_link(&sent[0].1)
        };
        let web = verify_email(&token, false)
            .await
            .expect("verification should succeed");
        assert!(web.contains("?token="));

        let email = unique_test_email();
        initiate_registration(&email, true, &mailer)
            .await
            .expect("initiation should succeed");
        let token = {
            let sent = mailer.sent.lock().expect("mailer mutex poisoned");
            token_from_link(&sent.last().expect("email should be recorded").1)
        };
        let mobile = verify_email(&token, true)
            .await
            .expect("verification should succeed");
        // Mobile deep links carry the completion token as a path segment
        assert!(!mobile.contains("?token="));
        assert!(mobile.rsplit('/').next().expect("path segment").starts_with("ey"));
    }

    #[tokio::test]
    #[serial]
    async fn test_completion_sets_password_profile_and_verified() {
        init_test_environment().await;
        let email = unique_test_email();
        let user_id = register_verified_user(&email, "hunter2hunter2").await;

        let user = UserStore::get_user(&user_id)
            .await
            .expect("lookup should succeed")
            .expect("user should exist");
        assert!(user.verified);
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.phone_number.as_deref(), Some("+254700000000"));

        let credential = UserStore::get_credential_by_email(&email)
            .await
            .expect("lookup should succeed")
            .expect("credential should exist");
        assert!(
            credential
                .password_hash
                .as_deref()
                .expect("password hash should be set")
                .starts_with("$argon2id$")
        );

        let profile = UserStore::get_student_profile(&user_id)
            .await
            .expect("lookup should succeed")
            .expect("profile should exist");
        assert_eq!(profile.dormitory.as_deref(), Some("Qejani"));
        assert_eq!(profile.room.as_deref(), Some("A12"));
    }

    #[tokio::test]
    #[serial]
    async fn test_completion_rejects_garbage_token() {
        init_test_environment().await;
        let result = complete_registration(sample_request("not-a-jwt")).await;
        assert!(matches!(result, Err(AuthFlowError::Unauthorized)));
    }

    #[tokio::test]
    #[serial]
    async fn test_completion_rejects_unknown_user() {
        init_test_environment().await;
        let claims = CompletionClaims::new("ghost-user".to_string(), 3600);
        let token = sign_completion_token(&claims).expect("signing should succeed");

        let result = complete_registration(sample_request(&token)).await;
        assert!(matches!(result, Err(AuthFlowError::InvalidState(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_completion_rejects_already_verified_user() {
        init_test_environment().await;
        let email = unique_test_email();
        let user_id = register_verified_user(&email, "hunter2hunter2").await;

        // A still-valid completion token does not allow overwriting the account
        let claims = CompletionClaims::new(user_id, 3600);
        let token = sign_completion_token(&claims).expect("signing should succeed");

        let result = complete_registration(sample_request(&token)).await;
        assert!(matches!(result, Err(AuthFlowError::InvalidState(_))));
    }

    fn sample_request(token: &str) -> CompleteRegistrationRequest {
        CompleteRegistrationRequest {
            token: token.to_string(),
            password: "hunter2hunter2".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone_number: "+254711111111".to_string(),
            dormitory: "Qwetu".to_string(),
            building: "Block B".to_string(),
            room: "B07".to_string(),
        }
    }
}
