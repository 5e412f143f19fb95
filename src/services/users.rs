use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;

use crate::domain::{NewUser, UserChanges, UserEmail};
use crate::errors::ApiError;
use crate::models::{AddressSummary, AddressSummaryRow, User, UserWithAddresses};

const USER_COLUMNS: &str = "id, first_name, last_name, email, created_at, updated_at";

#[tracing::instrument(
    name = "Saving a new user in the database",
    skip(pool, new_user),
    fields(user_email = %new_user.email)
)]
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, ApiError> {
    // The email policy runs before any database interaction.
    let email = UserEmail::parse(new_user.email).map_err(ApiError::Validation)?;

    if email_exists(pool, email.as_ref(), None)
        .await
        .context("Failed to check email uniqueness.")?
    {
        return Err(ApiError::Validation("Email already exists".into()));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (first_name, last_name, email) VALUES ($1, $2, $3) \
         RETURNING id, first_name, last_name, email, created_at, updated_at",
    )
    .bind(new_user.first_name.as_ref())
    .bind(new_user.last_name.as_ref())
    .bind(email.as_ref())
    .fetch_one(pool)
    .await
    .context("Failed to insert new user in the database.")?;

    Ok(user)
}

#[tracing::instrument(name = "Fetching a page of users", skip(pool))]
pub async fn list_users(pool: &PgPool, page: i64, limit: i64) -> Result<(Vec<User>, i64), ApiError> {
    let offset = (page - 1) * limit;

    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        USER_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to fetch a page of users.")?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("Failed to count users.")?;

    Ok((users, total))
}

#[tracing::instrument(name = "Fetching a user by id", skip(pool))]
pub async fn find_user(pool: &PgPool, id: i32) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch user by id.")?;

    Ok(user)
}

/// Serves both full and partial updates: absent fields keep their stored
/// value through `COALESCE`. When an email is provided, the policy and the
/// uniqueness check (excluding the row's own id) run again.
#[tracing::instrument(name = "Updating a user in the database", skip(pool, changes))]
pub async fn update_user(
    pool: &PgPool,
    id: i32,
    changes: UserChanges,
) -> Result<Option<User>, ApiError> {
    if find_user(pool, id).await?.is_none() {
        return Ok(None);
    }

    let email = match changes.email {
        Some(email) => {
            let email = UserEmail::parse(email).map_err(ApiError::Validation)?;

            if email_exists(pool, email.as_ref(), Some(id))
                .await
                .context("Failed to check email uniqueness.")?
            {
                return Err(ApiError::Validation("Email already exists".into()));
            }

            Some(email)
        }
        None => None,
    };

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET \
            first_name = COALESCE($1, first_name), \
            last_name = COALESCE($2, last_name), \
            email = COALESCE($3, email), \
            updated_at = NOW() \
         WHERE id = $4 \
         RETURNING id, first_name, last_name, email, created_at, updated_at",
    )
    .bind(changes.first_name.as_ref().map(|n| n.as_ref()))
    .bind(changes.last_name.as_ref().map(|n| n.as_ref()))
    .bind(email.as_ref().map(|e| e.as_ref()))
    .bind(id)
    // A row deleted between the existence check and the update degrades to
    // not-found rather than surfacing as an internal error.
    .fetch_optional(pool)
    .await
    .context("Failed to update user in the database.")?;

    Ok(user)
}

#[tracing::instrument(name = "Deleting a user", skip(pool))]
pub async fn delete_user(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
    // Dependent addresses go with the row through the FK cascade.
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete user from the database.")?;

    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(name = "Fetching all users with their addresses", skip(pool))]
pub async fn list_users_with_addresses(pool: &PgPool) -> Result<Vec<UserWithAddresses>, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to fetch users.")?;

    let ids: Vec<i32> = users.iter().map(|user| user.id).collect();

    let rows = sqlx::query_as::<_, AddressSummaryRow>(
        "SELECT id, user_id, street, city, state, pincode FROM addresses WHERE user_id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .context("Failed to fetch addresses for users.")?;

    let mut by_user: HashMap<i32, Vec<AddressSummary>> = HashMap::new();
    for row in rows {
        by_user.entry(row.user_id).or_default().push(row.into());
    }

    Ok(users
        .into_iter()
        .map(|user| {
            let addresses = by_user.remove(&user.id).unwrap_or_default();
            UserWithAddresses { user, addresses }
        })
        .collect())
}

async fn email_exists(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    // Case-sensitive exact match against the email column.
    let existing: Option<(i32,)> = match exclude_id {
        Some(id) => {
            sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?
        }
    };

    Ok(existing.is_some())
}
