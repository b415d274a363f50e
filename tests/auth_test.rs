//! Session and guard tests
//!
//! Covers the token lifecycle end to end: sign-in, persistence,
//! validation, expiry, and how the route guard treats each outcome.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use streamvibe::auth::{AuthError, Authenticator, OAuthProfile, Provider, Role, SESSION_MAX_AGE_SECS};
use streamvibe::routes::{guard, Route, RouteDecision};
use streamvibe::store::LocalStore;

// =============================================================================
// Token Lifecycle
// =============================================================================

#[test]
fn test_token_survives_restart_via_store() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::with_root(dir.path());
    let auth = Authenticator::new("shared-secret");
    let now = Utc::now();

    let issued = auth.sign_in("user@example.com", "password123", now).unwrap();
    store.save_session_token(&issued.token).unwrap();

    // A fresh process: new store handle, new authenticator, same secret
    let store = LocalStore::with_root(dir.path());
    let auth = Authenticator::new("shared-secret");
    let token = store.load_session_token().unwrap();
    let session = auth.validate(&token, now).unwrap();

    assert_eq!(session.user_id, "1");
    assert_eq!(session.role, Role::User);
}

#[test]
fn test_role_claim_is_immutable_for_token_lifetime() {
    let auth = Authenticator::new("secret");
    let now = Utc::now();

    let issued = auth.sign_in("admin@example.com", "admin123", now).unwrap();

    // Re-validating at different instants never changes the role
    for hours in [1, 24, 24 * 29] {
        let later = now + Duration::hours(hours);
        let session = auth.validate(&issued.token, later).unwrap();
        assert_eq!(session.role, Role::Admin);
    }
}

#[test]
fn test_expiry_is_thirty_days() {
    let auth = Authenticator::new("secret");
    let now = Utc::now();

    let issued = auth.sign_in("user@example.com", "password123", now).unwrap();

    let just_before = now + Duration::seconds(SESSION_MAX_AGE_SECS - 1);
    assert!(auth.validate(&issued.token, just_before).is_ok());

    let at_expiry = now + Duration::seconds(SESSION_MAX_AGE_SECS);
    assert_eq!(
        auth.validate(&issued.token, at_expiry),
        Err(AuthError::VerificationExpired)
    );
}

// =============================================================================
// Guard Semantics
// =============================================================================

#[test]
fn test_expired_token_authorizes_like_no_session() {
    let auth = Authenticator::new("secret");
    let now = Utc::now();

    let issued = auth.sign_in("admin@example.com", "admin123", now).unwrap();
    let expired_at = now + Duration::seconds(SESSION_MAX_AGE_SECS + 1);

    // Validation fails, so the caller holds no session
    let session = auth.validate(&issued.token, expired_at).ok();
    assert!(session.is_none());

    let with_expired = guard(&Route::Admin, session.as_ref());
    let with_nothing = guard(&Route::Admin, None);
    assert_eq!(with_expired, with_nothing);
}

#[test]
fn test_admin_redirect_preserves_original_path() {
    let decision = guard(&Route::Admin, None);

    let RouteDecision::Redirect(redirect) = decision else {
        panic!("expected a redirect");
    };

    // The sign-in route must carry /admin as the callback, and the whole
    // thing must survive a path round-trip
    assert_eq!(
        redirect,
        Route::SignIn {
            callback: Some("/admin".to_string())
        }
    );
    assert_eq!(redirect.path(), "/auth/signin?callbackUrl=%2Fadmin");
    assert_eq!(Route::parse(&redirect.path()), Some(redirect));
}

#[test]
fn test_tampered_token_rejected() {
    let auth = Authenticator::new("secret");
    let now = Utc::now();

    let issued = auth.sign_in("user@example.com", "password123", now).unwrap();

    // Flip a character in the payload segment
    let mut tampered = issued.token.clone();
    let mid = tampered.len() / 2;
    let replacement = if tampered.as_bytes()[mid] == b'a' { 'b' } else { 'a' };
    tampered.replace_range(mid..mid + 1, &replacement.to_string());

    assert!(auth.validate(&tampered, now).is_err());
}

// =============================================================================
// Error Taxonomy
// =============================================================================

#[test]
fn test_error_codes_round_trip_through_messages() {
    let errors = [
        AuthError::InvalidCredentials,
        AuthError::ProviderError(Provider::Google),
        AuthError::AccountNotLinked,
        AuthError::AccessDenied,
        AuthError::VerificationExpired,
        AuthError::System,
    ];

    for error in errors {
        // The code's message matches the error's own display text
        assert_eq!(AuthError::message_for_code(error.code()), error.to_string());
    }
}

#[test]
fn test_oauth_profile_cannot_shadow_credentials_account() {
    let auth = Authenticator::new("secret");

    for provider in [Provider::Google, Provider::Github] {
        let profile = OAuthProfile {
            provider,
            subject: "ext-1".into(),
            name: "Impostor".into(),
            email: "admin@example.com".into(),
        };
        assert_eq!(
            auth.sign_in_oauth(&profile, Utc::now()),
            Err(AuthError::AccountNotLinked)
        );
    }
}
