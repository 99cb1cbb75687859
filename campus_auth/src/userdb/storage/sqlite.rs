use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::storage::{DB_TABLE_CREDENTIALS, DB_TABLE_STUDENT_PROFILES, DB_TABLE_USERS,
    DB_TABLE_VERIFICATION_TOKENS};
use crate::userdb::{
    errors::UserError,
    types::{Credential, ProfileUpdate, StudentProfile, User},
};

use super::UserRow;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT,
            last_name TEXT,
            phone_number TEXT,
            photo_url TEXT,
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            role TEXT NOT NULL DEFAULT 'STUDENT',
            created_at TIMESTAMP NOT NULL
        )
        "#,
        DB_TABLE_USERS.as_str()
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            user_id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            provider TEXT
        )
        "#,
        DB_TABLE_CREDENTIALS.as_str()
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            user_id TEXT PRIMARY KEY NOT NULL,
            dormitory TEXT,
            building TEXT,
            room TEXT,
            status TEXT NOT NULL DEFAULT 'AVAILABLE'
        )
        "#,
        DB_TABLE_STUDENT_PROFILES.as_str()
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<User>, UserError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT * FROM {} WHERE id = ?
        "#,
        DB_TABLE_USERS.as_str()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    row.map(User::try_from).transpose()
}

pub(super) async fn get_credential_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<Credential>, UserError> {
    sqlx::query_as::<_, Credential>(&format!(
        r#"
        SELECT * FROM {} WHERE email = ?
        "#,
        DB_TABLE_CREDENTIALS.as_str()
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_student_profile_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
) -> Result<Option<StudentProfile>, UserError> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        r#"
        SELECT * FROM {} WHERE user_id = ?
        "#,
        DB_TABLE_STUDENT_PROFILES.as_str()
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn create_pending_user_sqlite(
    pool: &Pool<Sqlite>,
    user: User,
    email: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<User, UserError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, first_name, last_name, phone_number, photo_url, verified, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        DB_TABLE_USERS.as_str()
    ))
    .bind(&user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone_number)
    .bind(&user.photo_url)
    .bind(user.verified)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id) VALUES (?)
        "#,
        DB_TABLE_STUDENT_PROFILES.as_str()
    ))
    .bind(&user.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, email) VALUES (?, ?)
        "#,
        DB_TABLE_CREDENTIALS.as_str()
    ))
    .bind(&user.id)
    .bind(email)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, token, expires_at) VALUES (?, ?, ?)
        "#,
        DB_TABLE_VERIFICATION_TOKENS.as_str()
    ))
    .bind(&user.id)
    .bind(token)
    .bind(expires_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(user)
}

pub(super) async fn finalize_registration_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
    profile: &ProfileUpdate,
    password_hash: &str,
) -> Result<(), UserError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        UPDATE {} SET first_name = ?, last_name = ?, phone_number = ?, verified = TRUE
        WHERE id = ?
        "#,
        DB_TABLE_USERS.as_str()
    ))
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.phone_number)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        UPDATE {} SET dormitory = ?, building = ?, room = ? WHERE user_id = ?
        "#,
        DB_TABLE_STUDENT_PROFILES.as_str()
    ))
    .bind(&profile.dormitory)
    .bind(&profile.building)
    .bind(&profile.room)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        UPDATE {} SET password_hash = ? WHERE user_id = ?
        "#,
        DB_TABLE_CREDENTIALS.as_str()
    ))
    .bind(password_hash)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn provision_federated_user_sqlite(
    pool: &Pool<Sqlite>,
    user: User,
    email: &str,
    provider: &str,
) -> Result<User, UserError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, first_name, last_name, phone_number, photo_url, verified, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        DB_TABLE_USERS.as_str()
    ))
    .bind(&user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone_number)
    .bind(&user.photo_url)
    .bind(user.verified)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, status) VALUES (?, 'AVAILABLE')
        "#,
        DB_TABLE_STUDENT_PROFILES.as_str()
    ))
    .bind(&user.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, email, provider) VALUES (?, ?, ?)
        "#,
        DB_TABLE_CREDENTIALS.as_str()
    ))
    .bind(&user.id)
    .bind(email)
    .bind(provider)
    .execute(&mut *tx)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(user)
}
