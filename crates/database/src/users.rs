//! User queries.

use sqlx::PgPool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Get a user by id.
pub async fn get_user(pool: &PgPool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Find a user by phone number.
pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        FROM users
        WHERE phone = $1
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find a user by linked Yandex id.
pub async fn find_by_yandex_id(pool: &PgPool, yandex_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        FROM users
        WHERE yandex_id = $1
        "#,
    )
    .bind(yandex_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Create a new user registered by phone.
///
/// The `phone` column carries a UNIQUE constraint; a violation (a
/// concurrent registration won the race) is reported as `AlreadyExists`
/// so callers can fetch and return the existing row.
pub async fn create_user(
    pool: &PgPool,
    phone: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone, first_name, last_name)
        VALUES ($1, $2, $3)
        RETURNING id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        "#,
    )
    .bind(phone)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: phone.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Create a new user registered through Yandex, with a synthetic phone
/// placeholder derived from the Yandex id.
///
/// UNIQUE constraints on `phone` and `yandex_id` turn a concurrent
/// first-registration into `AlreadyExists`.
pub async fn create_yandex_user(
    pool: &PgPool,
    yandex_id: &str,
    yandex_email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<User> {
    let phone = format!("yandex_{yandex_id}");

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone, first_name, last_name, yandex_id, yandex_email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        "#,
    )
    .bind(&phone)
    .bind(first_name)
    .bind(last_name)
    .bind(yandex_id)
    .bind(yandex_email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: yandex_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Set the AI-responses flag and advance the mutation timestamp.
///
/// An unknown id is a no-op, not an error: the settings endpoint always
/// acknowledges success.
pub async fn update_ai_responses(pool: &PgPool, id: i64, enabled: bool) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET ai_responses_enabled = $1, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(enabled)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Attach Yandex identity fields to an existing user.
///
/// Never inserts; returns `NotFound` when the user does not exist.
pub async fn link_yandex(
    pool: &PgPool,
    id: i64,
    yandex_id: &str,
    yandex_email: Option<&str>,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET yandex_id = $1, yandex_email = $2, updated_at = now()
        WHERE id = $3
        RETURNING id, phone, first_name, last_name, yandex_id, yandex_email, ai_responses_enabled
        "#,
    )
    .bind(yandex_id)
    .bind(yandex_email)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}
