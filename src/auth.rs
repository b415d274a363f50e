//! Session and identity management
//!
//! Sign-in accepts either a credential pair checked against a fixed demo
//! allow-list, or a profile delegated from a third-party identity provider.
//! Success issues a signed session token (HS256) embedding the user id and
//! role; every privileged navigation re-validates the token. A token past
//! its expiry is treated identically to no session.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Maximum session age (30 days)
pub const SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

// =============================================================================
// Roles and Users
// =============================================================================

/// Access role carried in the session token. Immutable for the token's
/// lifetime; privileged checks consult this claim and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Demo account in the fixed allow-list
struct UserRecord {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

/// Fixed in-memory allow-list (demo deployment has no user database)
const DEMO_USERS: &[UserRecord] = &[
    UserRecord {
        id: "1",
        name: "Demo User",
        email: "user@example.com",
        password: "password123",
        role: Role::User,
    },
    UserRecord {
        id: "2",
        name: "Admin User",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
    UserRecord {
        id: "3",
        name: "StreamVibe Admin",
        email: "streamvibe@gmail.com",
        password: "streamvibe",
        role: Role::Admin,
    },
];

// =============================================================================
// Providers and Errors
// =============================================================================

/// Third-party identity provider for delegated sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Github,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Google => write!(f, "Google"),
            Provider::Github => write!(f, "GitHub"),
        }
    }
}

/// Profile returned by a provider's callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider: Provider,
    pub subject: String,
    pub name: String,
    pub email: String,
}

/// Authentication failure taxonomy. Each variant maps to a stable error
/// code (for the auth-error route) and a user-facing message (`Display`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password. Please check your credentials and try again.")]
    InvalidCredentials,

    #[error("Error occurred while signing in with a social provider.")]
    ProviderError(Provider),

    #[error("Email already in use with another sign-in method.")]
    AccountNotLinked,

    #[error("Access denied. You do not have permission to access this resource.")]
    AccessDenied,

    #[error("The verification link may have expired or was already used.")]
    VerificationExpired,

    #[error("Authentication system error. Please try again later.")]
    System,
}

impl AuthError {
    /// Stable error code carried on the auth-error route
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "CredentialsSignin",
            AuthError::ProviderError(_) => "OAuthSignin",
            AuthError::AccountNotLinked => "OAuthAccountNotLinked",
            AuthError::AccessDenied => "AccessDenied",
            AuthError::VerificationExpired => "Verification",
            AuthError::System => "AuthError",
        }
    }

    /// User-facing message for an error code, including codes minted by
    /// other deployments of the identity layer
    pub fn message_for_code(code: &str) -> &'static str {
        match code {
            "CredentialsSignin" => {
                "Invalid email or password. Please check your credentials and try again."
            }
            "OAuthSignin" => "Error occurred while signing in with a social provider.",
            "OAuthCallback" => "Error occurred during the social sign-in callback.",
            "OAuthCreateAccount" => "Error creating a new account with social sign-in.",
            "OAuthAccountNotLinked" => "Email already in use with another sign-in method.",
            "AccessDenied" => "Access denied. You do not have permission to access this resource.",
            "Verification" => "The verification link may have expired or was already used.",
            "AuthError" => "Authentication system error. Please try again later.",
            _ => "An unexpected authentication error occurred. Please try again later.",
        }
    }
}

// =============================================================================
// Sessions and Tokens
// =============================================================================

/// Signed token payload
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    role: Role,
    jti: Uuid,
    iat: i64,
    exp: i64,
}

/// Validated identity for the current user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Freshly issued session plus its signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Issues and validates signed session tokens against the demo allow-list.
pub struct Authenticator {
    secret: String,
}

impl Authenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Credentials sign-in against the fixed allow-list
    pub fn sign_in(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AuthError> {
        let user = DEMO_USERS
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        if !constant_time_eq(user.password.as_bytes(), password.as_bytes()) {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(user.id, user.name, user.email, user.role, now)
    }

    /// Delegated sign-in with a profile handed back by a provider callback
    pub fn sign_in_oauth(
        &self,
        profile: &OAuthProfile,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AuthError> {
        if profile.email.is_empty() || profile.subject.is_empty() {
            return Err(AuthError::ProviderError(profile.provider));
        }

        // An email owned by a credentials account cannot be re-linked
        if DEMO_USERS.iter().any(|u| u.email == profile.email) {
            return Err(AuthError::AccountNotLinked);
        }

        let user_id = format!("{}:{}", provider_id(profile.provider), profile.subject);
        self.issue(&user_id, &profile.name, &profile.email, Role::User, now)
    }

    fn issue(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AuthError> {
        let exp = now.timestamp() + SESSION_MAX_AGE_SECS;
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AuthError::System)?;

        Ok(IssuedSession {
            token,
            session: Session {
                user_id: claims.sub,
                name: claims.name,
                email: claims.email,
                role,
                expires_at: expiry_time(exp),
            },
        })
    }

    /// Decode a token and check signature and expiry against the given
    /// clock. Expired tokens fail exactly like missing ones at the guard.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
        // Expiry is checked against the injected clock below, not the
        // library's wall clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::System)?;

        let claims = data.claims;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::VerificationExpired);
        }

        Ok(Session {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            expires_at: expiry_time(claims.exp),
        })
    }
}

fn provider_id(provider: Provider) -> &'static str {
    match provider {
        Provider::Google => "google",
        Provider::Github => "github",
    }
}

fn expiry_time(exp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(exp, 0).single().unwrap_or_else(Utc::now)
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new("test-secret")
    }

    #[test]
    fn test_sign_in_valid_credentials() {
        let issued = authenticator()
            .sign_in("user@example.com", "password123", Utc::now())
            .unwrap();

        assert_eq!(issued.session.user_id, "1");
        assert_eq!(issued.session.role, Role::User);
        assert!(!issued.session.is_admin());
        assert!(!issued.token.is_empty());
    }

    #[test]
    fn test_sign_in_admin_role() {
        let issued = authenticator()
            .sign_in("admin@example.com", "admin123", Utc::now())
            .unwrap();

        assert_eq!(issued.session.role, Role::Admin);
        assert!(issued.session.is_admin());
    }

    #[test]
    fn test_sign_in_wrong_password() {
        let result = authenticator().sign_in("user@example.com", "nope", Utc::now());
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_sign_in_unknown_email() {
        let result = authenticator().sign_in("ghost@example.com", "password123", Utc::now());
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = authenticator();
        let now = Utc::now();
        let issued = auth.sign_in("admin@example.com", "admin123", now).unwrap();

        let session = auth.validate(&issued.token, now).unwrap();
        assert_eq!(session, issued.session);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = authenticator();
        let now = Utc::now();
        let issued = auth.sign_in("user@example.com", "password123", now).unwrap();

        let later = now + chrono::Duration::seconds(SESSION_MAX_AGE_SECS + 1);
        let result = auth.validate(&issued.token, later);
        assert_eq!(result, Err(AuthError::VerificationExpired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now();
        let issued = authenticator()
            .sign_in("user@example.com", "password123", now)
            .unwrap();

        let other = Authenticator::new("different-secret");
        assert_eq!(other.validate(&issued.token, now), Err(AuthError::System));
    }

    #[test]
    fn test_oauth_sign_in() {
        let profile = OAuthProfile {
            provider: Provider::Google,
            subject: "g-12345".into(),
            name: "OAuth User".into(),
            email: "oauth@example.com".into(),
        };

        let issued = authenticator()
            .sign_in_oauth(&profile, Utc::now())
            .unwrap();
        assert_eq!(issued.session.user_id, "google:g-12345");
        assert_eq!(issued.session.role, Role::User);
    }

    #[test]
    fn test_oauth_account_link_conflict() {
        let profile = OAuthProfile {
            provider: Provider::Github,
            subject: "gh-1".into(),
            name: "Someone".into(),
            email: "user@example.com".into(),
        };

        let result = authenticator().sign_in_oauth(&profile, Utc::now());
        assert_eq!(result, Err(AuthError::AccountNotLinked));
    }

    #[test]
    fn test_oauth_missing_profile_fields() {
        let profile = OAuthProfile {
            provider: Provider::Google,
            subject: "".into(),
            name: "".into(),
            email: "".into(),
        };

        let result = authenticator().sign_in_oauth(&profile, Utc::now());
        assert_eq!(result, Err(AuthError::ProviderError(Provider::Google)));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::InvalidCredentials.code(), "CredentialsSignin");
        assert_eq!(
            AuthError::ProviderError(Provider::Google).code(),
            "OAuthSignin"
        );
        assert_eq!(AuthError::AccountNotLinked.code(), "OAuthAccountNotLinked");
        assert_eq!(AuthError::AccessDenied.code(), "AccessDenied");
        assert_eq!(AuthError::VerificationExpired.code(), "Verification");
        assert_eq!(AuthError::System.code(), "AuthError");
    }

    #[test]
    fn test_message_for_unknown_code() {
        assert_eq!(
            AuthError::message_for_code("SomethingNew"),
            "An unexpected authentication error occurred. Please try again later."
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(constant_time_eq(b"", b""));
    }
}
