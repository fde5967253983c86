//! Login gate.
//!
//! The dashboard only renders listings once the operator has entered the
//! configured password. The authenticated flag lives in memory only.

use skinwatch_sdk::Notification;
use tracing::{info, warn};

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Password did not match.
    #[error("invalid password")]
    InvalidPassword,

    /// Action requires a login first.
    #[error("not logged in")]
    NotAuthenticated,
}

impl AuthError {
    /// Returns the notification shown for this error.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::InvalidPassword => Notification::error("Authentication failed", "Invalid password"),
            Self::NotAuthenticated => {
                Notification::error("Authentication required", "Log in with `login <password>`")
            }
        }
    }
}

/// Whether the operator is logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthSession {
    authenticated: bool,
}

impl AuthSession {
    /// Creates a logged-out session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authenticated: false,
        }
    }

    /// Returns true once a login has succeeded.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fails with `AuthError::NotAuthenticated` unless logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not authenticated.
    pub const fn require(&self) -> Result<(), AuthError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }

    /// Clears the authenticated flag.
    pub fn logout(&mut self) {
        if self.authenticated {
            info!("operator logged out");
        }
        self.authenticated = false;
    }
}

/// Checks passwords against the configured secret.
#[derive(Debug, Clone)]
pub struct LoginGate {
    secret: String,
}

impl LoginGate {
    /// Creates a gate for `secret`.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Tries to log `session` in with `password`.
    ///
    /// A failed attempt leaves the session as it was.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPassword` if the password does not match.
    pub fn attempt(&self, session: &mut AuthSession, password: &str) -> Result<(), AuthError> {
        if password == self.secret {
            info!("login successful");
            session.authenticated = true;
            Ok(())
        } else {
            warn!("login failed");
            Err(AuthError::InvalidPassword)
        }
    }
}

/// Notification shown after a successful login.
#[must_use]
pub fn login_success() -> Notification {
    Notification::info("Login successful", "Redirecting to dashboard")
}

#[cfg(test)]
mod tests {
    use skinwatch_sdk::NotificationLevel;

    use super::*;

    #[test]
    fn test_login_with_correct_password() {
        let gate = LoginGate::new("admin123");
        let mut session = AuthSession::new();

        assert!(gate.attempt(&mut session, "admin123").is_ok());
        assert!(session.is_authenticated());
        assert!(session.require().is_ok());
    }

    #[test]
    fn test_login_with_wrong_password() {
        let gate = LoginGate::new("admin123");
        let mut session = AuthSession::new();

        let err = gate.attempt(&mut session, "admin").expect_err("should fail");

        assert_eq!(err, AuthError::InvalidPassword);
        assert!(!session.is_authenticated());
        let notification = err.notification();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.title, "Authentication failed");
        assert_eq!(notification.description, "Invalid password");
    }

    #[test]
    fn test_failed_attempt_keeps_existing_login() {
        let gate = LoginGate::new("admin123");
        let mut session = AuthSession::new();
        gate.attempt(&mut session, "admin123").expect("login");

        assert!(gate.attempt(&mut session, "nope").is_err());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_logout() {
        let gate = LoginGate::new("admin123");
        let mut session = AuthSession::new();
        gate.attempt(&mut session, "admin123").expect("login");

        session.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.require(), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn test_login_success_notification() {
        let notification = login_success();
        assert!(!notification.is_error());
        assert_eq!(notification.title, "Login successful");
    }
}
