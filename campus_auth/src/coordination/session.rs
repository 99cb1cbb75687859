//! Session flows: password and federated sign-in, token issuance, refresh
//! and revocation.
//!
//! Access tokens are validated purely by signature and TTL. Refresh tokens
//! additionally need a live store record, which is what makes sign-out an
//! effective revocation. Refresh never rotates: the presented refresh token
//! stays valid until sign-out or natural expiry.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::notify::{PushMessage, PushNotifier};
use crate::oauth2::verify_google_id_token;
use crate::password::verify_password;
use crate::session::RefreshTokenStore;
use crate::token::{
    ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL, SessionClaims, sign_session_token, verify_session_token,
};
use crate::userdb::{StudentProfile, User, UserRole, UserStore};

use super::errors::AuthFlowError;
use super::user::gen_new_user_id;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Role-specific slice of the user-info projection, serialized with the role
/// name as the tag so student fields merge flat into the projection.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "role")]
pub enum RoleProfile {
    #[serde(rename = "STUDENT")]
    Student {
        dormitory: Option<String>,
        building: Option<String>,
        room: Option<String>,
    },
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "STAFF")]
    Staff,
}

/// What sign-in reports about the account. Built from the user and profile
/// rows only; the password hash can never appear here.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl UserInfo {
    fn project(user: User, email: String, student: Option<StudentProfile>) -> Self {
        let profile = match user.role {
            UserRole::Student => RoleProfile::Student {
                dormitory: student.as_ref().and_then(|s| s.dormitory.clone()),
                building: student.as_ref().and_then(|s| s.building.clone()),
                room: student.as_ref().and_then(|s| s.room.clone()),
            },
            UserRole::Admin => RoleProfile::Admin,
            UserRole::Staff => RoleProfile::Staff,
        };

        Self {
            id: user.id,
            email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            photo_url: user.photo_url,
            verified: user.verified,
            created_at: user.created_at,
            profile,
        }
    }
}

/// Successful sign-in: the token pair plus the user-info projection.
#[derive(Debug, Clone, Serialize)]
pub struct SignInResult {
    pub access_token: String,
    pub refresh_token: String,
    pub user_info: UserInfo,
}

/// Issue an access/refresh token pair for the identity triple and persist
/// the refresh token record.
pub async fn generate_tokens(
    user_id: &str,
    email: &str,
    role: UserRole,
) -> Result<TokenPair, AuthFlowError> {
    let access_claims = SessionClaims::new(
        user_id.to_string(),
        email.to_string(),
        role,
        *ACCESS_TOKEN_TTL,
    );
    let refresh_claims = SessionClaims::new(
        user_id.to_string(),
        email.to_string(),
        role,
        *REFRESH_TOKEN_TTL,
    );

    let access_token = sign_session_token(&access_claims)?;
    let refresh_token = sign_session_token(&refresh_claims)?;

    let expires_at = Utc::now() + Duration::seconds(*REFRESH_TOKEN_TTL);
    RefreshTokenStore::create(&refresh_token, user_id, expires_at).await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Password sign-in.
///
/// Unknown email, missing hash (federated account) and wrong password all
/// fail identically; only the verification status is reported distinctly,
/// and before any password comparison.
pub async fn sign_in(
    email: &str,
    password: &str,
    notifier: &dyn PushNotifier,
) -> Result<SignInResult, AuthFlowError> {
    let credential = UserStore::get_credential_by_email(email)
        .await?
        .ok_or_else(|| AuthFlowError::InvalidCredentials.log())?;
    let user = UserStore::get_user(&credential.user_id).await?.ok_or_else(|| {
        AuthFlowError::Database(format!(
            "Credential without user row: {}",
            credential.user_id
        ))
    })?;

    let student = match user.role {
        UserRole::Student => UserStore::get_student_profile(&user.id).await?,
        _ => None,
    };

    if !user.verified {
        return Err(AuthFlowError::EmailNotVerified.log());
    }

    let password_hash = credential
        .password_hash
        .as_deref()
        .ok_or_else(|| AuthFlowError::InvalidCredentials.log())?;
    if !verify_password(password, password_hash)? {
        return Err(AuthFlowError::InvalidCredentials.log());
    }

    let tokens = generate_tokens(&user.id, &credential.email, user.role).await?;

    // Best-effort welcome push; delivery failure never fails the sign-in
    let welcome = PushMessage {
        user_id: user.id.clone(),
        title: "Welcome back!".to_string(),
        body: "You have signed in to Campus Delivery.".to_string(),
    };
    if let Err(e) = notifier.send_push_notification(&welcome).await {
        tracing::warn!("Failed to send welcome push to {}: {}", user.id, e);
    }

    Ok(SignInResult {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user_info: UserInfo::project(user, credential.email, student),
    })
}

/// Federated sign-in with a Google ID token. First sight of an email
/// provisions a pre-verified account; after that the flow matches password
/// sign-in, minus the password and the welcome push.
pub async fn sign_in_with_google(id_token: &str) -> Result<SignInResult, AuthFlowError> {
    let idinfo = verify_google_id_token(id_token).await?;

    let (user, email) = match UserStore::get_credential_by_email(&idinfo.email).await? {
        Some(credential) => {
            let user = UserStore::get_user(&credential.user_id).await?.ok_or_else(|| {
                AuthFlowError::Database(format!(
                    "Credential without user row: {}",
                    credential.user_id
                ))
            })?;
            (user, credential.email)
        }
        None => {
            let (first_name, last_name) = split_display_name(&idinfo.name);
            let user = User::new_federated(
                gen_new_user_id()?,
                first_name,
                last_name,
                idinfo.picture.clone(),
            );
            let user = UserStore::provision_federated_user(user, &idinfo.email, "GOOGLE").await?;
            (user, idinfo.email.clone())
        }
    };

    let student = match user.role {
        UserRole::Student => UserStore::get_student_profile(&user.id).await?,
        _ => None,
    };

    let tokens = generate_tokens(&user.id, &email, user.role).await?;

    let mut user_info = UserInfo::project(user, email, student);
    if user_info.photo_url.is_none() {
        user_info.photo_url = idinfo.picture;
    }

    Ok(SignInResult {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user_info,
    })
}

/// Exchange a refresh token for a new access token. The token must carry a
/// valid signature and still have its store record.
pub async fn refresh_tokens(refresh_token: &str) -> Result<TokenPair, AuthFlowError> {
    let claims = verify_session_token(refresh_token)
        .map_err(|_| AuthFlowError::InvalidRefreshToken.log())?;

    let record = RefreshTokenStore::get(refresh_token)
        .await?
        .ok_or_else(|| AuthFlowError::InvalidRefreshToken.log())?;
    if record.expires_at < Utc::now() {
        return Err(AuthFlowError::InvalidRefreshToken.log());
    }

    let access_token = sign_session_token(&claims.refreshed(*ACCESS_TOKEN_TTL))?;

    Ok(TokenPair {
        access_token,
        refresh_token: refresh_token.to_string(),
    })
}

/// Revoke a refresh token. Fails if the token is invalid or was already
/// revoked, so revocation is observable.
pub async fn sign_out(refresh_token: &str) -> Result<String, AuthFlowError> {
    verify_session_token(refresh_token)
        .map_err(|_| AuthFlowError::InvalidRefreshToken.log())?;

    if !RefreshTokenStore::delete(refresh_token).await? {
        return Err(AuthFlowError::InvalidRefreshToken.log());
    }
    Ok("Sign out successful".to_string())
}

fn split_display_name(name: &str) -> (Option<String>, Option<String>) {
    let mut parts = name.split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest: Vec<&str> = parts.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::test_support::RecordingNotifier;
    use crate::test_utils::{init_test_environment, register_verified_user, unique_test_email};
    use crate::token::CompletionClaims;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_sign_in_returns_tokens_and_projection() {
        init_test_environment().await;
        let email = unique_test_email();
        let user_id = register_verified_user(&email, "hunter2hunter2").await;

        let notifier = RecordingNotifier::default();
        let result = sign_in(&email, "hunter2hunter2", &notifier)
            .await
            .expect("sign-in should succeed");

        assert_ne!(result.access_token, result.refresh_token);
        assert_eq!(result.user_info.id, user_id);
        assert_eq!(result.user_info.email, email);
        assert!(result.user_info.verified);
        assert!(matches!(
            result.user_info.profile,
            RoleProfile::Student { ref dormitory, .. } if dormitory.as_deref() == Some("Qejani")
        ));

        // Access token carries the identity triple
        let claims =
            verify_session_token(&result.access_token).expect("access token should verify");
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.role, UserRole::Student);

        // Welcome push was dispatched to the signed-in user
        let pushes = notifier.sent.lock().expect("notifier mutex poisoned");
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].user_id, user_id);
    }

    #[tokio::test]
    #[serial]
    async fn test_sign_in_survives_push_delivery_failure() {
        init_test_environment().await;
        let email = unique_test_email();
        register_verified_user(&email, "hunter2hunter2").await;

        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        sign_in(&email, "hunter2hunter2", &notifier)
            .await
            .expect("sign-in should succeed despite push failure");
    }

    #[tokio::test]
    #[serial]
    async fn test_sign_in_unknown_email() {
        init_test_environment().await;
        let notifier = RecordingNotifier::default();
        assert!(matches!(
            sign_in(&unique_test_email(), "whatever", &notifier).await,
            Err(AuthFlowError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_sign_in_wrong_password() {
        init_test_environment().await;
        let email = unique_test_email();
        register_verified_user(&email, "hunter2hunter2").await;

        let notifier = RecordingNotifier::default();
        assert!(matches!(
            sign_in(&email, "wrong-password", &notifier).await,
            Err(AuthFlowError::InvalidCredentials)
        ));
        assert!(notifier.sent.lock().expect("notifier mutex poisoned").is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_unverified_account_reported_before_password_check() {
        init_test_environment().await;
        let email = unique_test_email();

        let mailer = crate::notify::test_support::RecordingMailer::default();
        crate::coordination::initiate_registration(&email, false, &mailer)
            .await
            .expect("initiation should succeed");

        // The account has no password yet; verification status must win over
        // any credential outcome.
        let notifier = RecordingNotifier::default();
        assert!(matches!(
            sign_in(&email, "anything", &notifier).await,
            Err(AuthFlowError::EmailNotVerified)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_password_sign_in_on_federated_account_fails_gracefully() {
        init_test_environment().await;
        let email = unique_test_email();

        let user = User::new_federated(
            "federated-user-1".to_string(),
            Some("Ada".to_string()),
            Some("Lovelace".to_string()),
            None,
        );
        UserStore::provision_federated_user(user, &email, "GOOGLE")
            .await
            .expect("provisioning should succeed");

        let notifier = RecordingNotifier::default();
        assert!(matches!(
            sign_in(&email, "any-password", &notifier).await,
            Err(AuthFlowError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_garbage_google_token_rejected() {
        init_test_environment().await;
        assert!(matches!(
            sign_in_with_google("not-a-jwt").await,
            Err(AuthFlowError::InvalidFederatedToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_preserves_identity_and_token() {
        init_test_environment().await;
        let email = unique_test_email();
        let user_id = register_verified_user(&email, "hunter2hunter2").await;

        let notifier = RecordingNotifier::default();
        let signed_in = sign_in(&email, "hunter2hunter2", &notifier)
            .await
            .expect("sign-in should succeed");

        let refreshed = refresh_tokens(&signed_in.refresh_token)
            .await
            .expect("refresh should succeed");

        // Same refresh token, fresh access token with the same triple
        assert_eq!(refreshed.refresh_token, signed_in.refresh_token);
        let claims =
            verify_session_token(&refreshed.access_token).expect("access token should verify");
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.role, UserRole::Student);
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_rejects_garbage_token() {
        init_test_environment().await;
        assert!(matches!(
            refresh_tokens("not-a-jwt").await,
            Err(AuthFlowError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_rejects_well_signed_but_unknown_token() {
        init_test_environment().await;

        // Valid signature, no store record: must be rejected
        let claims = SessionClaims::new(
            "phantom-user".to_string(),
            "phantom@test.example".to_string(),
            UserRole::Student,
            *REFRESH_TOKEN_TTL,
        );
        let token = sign_session_token(&claims).expect("signing should succeed");

        assert!(matches!(
            refresh_tokens(&token).await,
            Err(AuthFlowError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_rejects_non_session_token() {
        init_test_environment().await;

        let claims = CompletionClaims::new("someone".to_string(), 3600);
        let token =
            crate::token::sign_completion_token(&claims).expect("signing should succeed");

        assert!(matches!(
            refresh_tokens(&token).await,
            Err(AuthFlowError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_sign_out_revokes_refresh_token() {
        init_test_environment().await;
        let email = unique_test_email();
        register_verified_user(&email, "hunter2hunter2").await;

        let notifier = RecordingNotifier::default();
        let signed_in = sign_in(&email, "hunter2hunter2", &notifier)
            .await
            .expect("sign-in should succeed");

        let message = sign_out(&signed_in.refresh_token)
            .await
            .expect("sign-out should succeed");
        assert_eq!(message, "Sign out successful");

        // The token no longer refreshes, and a second sign-out is rejected
        assert!(matches!(
            refresh_tokens(&signed_in.refresh_token).await,
            Err(AuthFlowError::InvalidRefreshToken)
        ));
        assert!(matches!(
            sign_out(&signed_in.refresh_token).await,
            Err(AuthFlowError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_tokens_persists_refresh_record() {
        init_test_environment().await;

        let pair = generate_tokens("direct-user", "direct@test.example", UserRole::Staff)
            .await
            .expect("issuance should succeed");

        let record = RefreshTokenStore::get(&pair.refresh_token)
            .await
            .expect("lookup should succeed")
            .expect("record should exist");
        assert_eq!(record.user_id, "direct-user");
        assert!(record.expires_at > Utc::now() + Duration::days(6));
    }

    #[test]
    fn test_split_display_name() {
        assert_eq!(
            split_display_name("Ada Lovelace"),
            (Some("Ada".to_string()), Some("Lovelace".to_string()))
        );
        assert_eq!(
            split_display_name("Ada King Lovelace"),
            (Some("Ada".to_string()), Some("King Lovelace".to_string()))
        );
        assert_eq!(split_display_name("Ada"), (Some("Ada".to_string()), None));
        assert_eq!(split_display_name(""), (None, None));
    }

    #[test]
    fn test_user_info_serialization_merges_role_fields() {
        let user = User::new_federated(
            "u1".to_string(),
            Some("Ada".to_string()),
            None,
            None,
        );
        let student = StudentProfile {
            user_id: "u1".to_string(),
            dormitory: Some("Qejani".to_string()),
            building: Some("Block A".to_string()),
            room: None,
            status: "AVAILABLE".to_string(),
        };
        let info = UserInfo::project(user, "ada@test.example".to_string(), Some(student));

        let json = serde_json::to_value(&info).expect("projection should serialize");
        assert_eq!(json["role"], "STUDENT");
        assert_eq!(json["dormitory"], "Qejani");
        assert_eq!(json["email"], "ada@test.example");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("status").is_none());
    }
}
