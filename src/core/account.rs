//! Account business logic - registration, login, sessions, and profile updates.
//!
//! Sessions are opaque bearer tokens with a fixed lifetime, stored in their
//! own table. Passwords are stored as salted SHA-256 digests in
//! `salt$digest` form.

use crate::{
    entities::{Session, User, session, user},
    errors::{Error, Result},
};
use chrono::Duration;
use sea_orm::{Set, prelude::*};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// How long a session token stays valid.
const SESSION_LIFETIME_DAYS: i64 = 7;

/// Fields a user may change on their own profile.
///
/// Unknown fields in the payload are rejected outright rather than
/// silently filtered.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    /// New display name
    pub full_name: Option<String>,
    /// New home location
    pub location: Option<String>,
}

/// Registers a new account and opens a session for it.
///
/// # Errors
/// Returns [`Error::EmailTaken`] if the email already has an account and
/// [`Error::Config`] for an empty email or password.
pub async fn register(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    full_name: &str,
    location: Option<String>,
) -> Result<(user::Model, session::Model)> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(Error::Config {
            message: "Email and password cannot be empty".to_string(),
        });
    }

    if find_by_email(db, &email).await?.is_some() {
        return Err(Error::EmailTaken { email });
    }

    let now = chrono::Utc::now().naive_utc();
    let account = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(email),
        full_name: Set(full_name.trim().to_string()),
        location: Set(location),
        hashed_password: Set(hash_password(password)),
        is_active: Set(true),
        created_at: Set(now),
    };
    let account = account.insert(db).await?;
    let opened = open_session(db, &account.id).await?;
    Ok((account, opened))
}

/// Verifies credentials and opens a fresh session.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown email, a wrong
/// password, or a deactivated account - deliberately the same error for
/// all three.
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<(user::Model, session::Model)> {
    let account = find_by_email(db, &email.trim().to_lowercase())
        .await?
        .ok_or(Error::InvalidCredentials)?;

    if !account.is_active || !verify_password(password, &account.hashed_password) {
        return Err(Error::InvalidCredentials);
    }

    let opened = open_session(db, &account.id).await?;
    Ok((account, opened))
}

/// Resolves a bearer token to its user.
///
/// # Errors
/// Returns [`Error::Unauthorized`] for an unknown or expired token or a
/// deactivated account.
pub async fn authenticate(db: &DatabaseConnection, token: &str) -> Result<user::Model> {
    let found = Session::find_by_id(token)
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)?;

    if found.expires_at < chrono::Utc::now().naive_utc() {
        return Err(Error::Unauthorized);
    }

    let account = User::find_by_id(&found.user_id)
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)?;
    if !account.is_active {
        return Err(Error::Unauthorized);
    }
    Ok(account)
}

/// Applies a profile update, touching only the named fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: &str,
    update: ProfileUpdate,
) -> Result<user::Model> {
    let mut account: user::ActiveModel = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)?
        .into();

    if let Some(full_name) = update.full_name {
        account.full_name = Set(full_name.trim().to_string());
    }
    if let Some(location) = update.location {
        account.location = Set(Some(location));
    }

    account.update(db).await.map_err(Into::into)
}

async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn open_session(db: &DatabaseConnection, user_id: &str) -> Result<session::Model> {
    let now = chrono::Utc::now().naive_utc();
    let opened = session::ActiveModel {
        token: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_string()),
        created_at: Set(now),
        expires_at: Set(now + Duration::days(SESSION_LIFETIME_DAYS)),
    };
    opened.insert(db).await.map_err(Into::into)
}

fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_password_hash_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
        assert!(!verify_password("hunter2", "garbage-without-salt"));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[tokio::test]
    async fn test_register_login_authenticate() -> Result<()> {
        let db = setup_test_db().await?;

        let (account, opened) =
            register(&db, "Jo@Example.com", "pw", "Jo Bloggs", None).await?;
        assert_eq!(account.email, "jo@example.com");

        let via_token = authenticate(&db, &opened.token).await?;
        assert_eq!(via_token.id, account.id);

        let (again, _) = login(&db, "jo@example.com", "pw").await?;
        assert_eq!(again.id, account.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "jo@example.com", "pw", "Jo", None).await?;

        let result = register(&db, "JO@example.com", "other", "Jo 2", None).await;
        assert!(matches!(result.unwrap_err(), Error::EmailTaken { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "jo@example.com", "pw", "Jo", None).await?;

        assert!(matches!(
            login(&db, "jo@example.com", "nope").await.unwrap_err(),
            Error::InvalidCredentials
        ));
        assert!(matches!(
            login(&db, "ghost@example.com", "pw").await.unwrap_err(),
            Error::InvalidCredentials
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_session_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, opened) = register(&db, "jo@example.com", "pw", "Jo", None).await?;

        let mut stale: session::ActiveModel = opened.clone().into();
        stale.expires_at = Set(chrono::Utc::now().naive_utc() - Duration::hours(1));
        stale.update(&db).await?;

        assert!(matches!(
            authenticate(&db, &opened.token).await.unwrap_err(),
            Error::Unauthorized
        ));
        assert!(matches!(
            authenticate(&db, "no-such-token").await.unwrap_err(),
            Error::Unauthorized
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_update_touches_named_fields_only() -> Result<()> {
        let db = setup_test_db().await?;
        let (account, _) =
            register(&db, "jo@example.com", "pw", "Jo", Some("London".to_string())).await?;

        let updated = update_profile(
            &db,
            &account.id,
            ProfileUpdate {
                full_name: Some("Jo B".to_string()),
                location: None,
            },
        )
        .await?;
        assert_eq!(updated.full_name, "Jo B");
        assert_eq!(updated.location, Some("London".to_string()));

        Ok(())
    }

    #[test]
    fn test_profile_update_rejects_unknown_fields() {
        let err = serde_json::from_str::<ProfileUpdate>(r#"{"full_name":"Jo","role":"admin"}"#);
        assert!(err.is_err());
    }
}
