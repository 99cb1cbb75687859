//! Outbound notification seams.
//!
//! Email and push delivery are external collaborators; the flows only need a
//! best-effort dispatch call. The embedding application supplies real
//! implementations; the logging defaults keep the crate usable in tests and
//! local development.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NotifyError {
    #[error("Delivery error: {0}")]
    Delivery(String),
}

/// A push notification addressed to one user.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub user_id: String,
    pub title: String,
    pub body: String,
}

/// Sends the signup verification email.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    async fn send_verification_email(&self, email: &str, link: &str) -> Result<(), NotifyError>;
}

/// Sends push notifications.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send_push_notification(&self, message: &PushMessage) -> Result<(), NotifyError>;
}

/// Default mailer: logs the link instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

#[async_trait]
impl VerificationMailer for LoggingMailer {
    async fn send_verification_email(&self, email: &str, link: &str) -> Result<(), NotifyError> {
        tracing::info!("Verification email for {}: {}", email, link);
        Ok(())
    }
}

/// Default notifier: logs the message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl PushNotifier for LoggingNotifier {
    async fn send_push_notification(&self, message: &PushMessage) -> Result<(), NotifyError> {
        tracing::info!(
            "Push notification for {}: {} - {}",
            message.user_id,
            message.title,
            message.body
        );
        Ok(())
    }
}
