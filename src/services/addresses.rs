use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;

use crate::domain::{AddressChanges, NewAddress};
use crate::errors::ApiError;
use crate::models::{Address, AddressWithUser, UserSummary};

const ADDRESS_COLUMNS: &str = "id, user_id, street, city, state, pincode, created_at, updated_at";

#[tracing::instrument(
    name = "Saving a new address in the database",
    skip(pool, new_address),
    fields(user_id = %new_address.user_id)
)]
pub async fn create_address(pool: &PgPool, new_address: NewAddress) -> Result<Address, ApiError> {
    // The row is only written once the referenced user is known to exist.
    let owner: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(new_address.user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to look up the referenced user.")?;

    if owner.is_none() {
        return Err(ApiError::Validation("User not found".into()));
    }

    let address = sqlx::query_as::<_, Address>(
        "INSERT INTO addresses (user_id, street, city, state, pincode) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, user_id, street, city, state, pincode, created_at, updated_at",
    )
    .bind(new_address.user_id)
    .bind(new_address.street.as_ref())
    .bind(new_address.city.as_ref())
    .bind(new_address.state.as_ref())
    .bind(new_address.pincode.as_ref())
    .fetch_one(pool)
    .await
    .context("Failed to insert new address in the database.")?;

    Ok(address)
}

#[tracing::instrument(name = "Fetching a page of addresses", skip(pool))]
pub async fn list_addresses(
    pool: &PgPool,
    pincode: Option<&str>,
    page: i64,
    limit: i64,
) -> Result<(Vec<AddressWithUser>, i64), ApiError> {
    let offset = (page - 1) * limit;

    let addresses = match pincode {
        Some(pincode) => {
            sqlx::query_as::<_, Address>(&format!(
                "SELECT {} FROM addresses WHERE pincode = $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                ADDRESS_COLUMNS
            ))
            .bind(pincode)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Address>(&format!(
                "SELECT {} FROM addresses ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                ADDRESS_COLUMNS
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to fetch a page of addresses.")?;

    let (total,): (i64,) = match pincode {
        Some(pincode) => {
            sqlx::query_as("SELECT COUNT(*) FROM addresses WHERE pincode = $1")
                .bind(pincode)
                .fetch_one(pool)
                .await
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM addresses")
                .fetch_one(pool)
                .await
        }
    }
    .context("Failed to count addresses.")?;

    let with_users = attach_owners(pool, addresses).await?;

    Ok((with_users, total))
}

#[tracing::instrument(name = "Fetching an address by id", skip(pool))]
pub async fn find_address(pool: &PgPool, id: i32) -> Result<Option<AddressWithUser>, ApiError> {
    let address = sqlx::query_as::<_, Address>(&format!(
        "SELECT {} FROM addresses WHERE id = $1",
        ADDRESS_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch address by id.")?;

    let Some(address) = address else {
        return Ok(None);
    };

    let user = sqlx::query_as::<_, UserSummary>(
        "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
    )
    .bind(address.user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch the owning user.")?;

    Ok(Some(AddressWithUser { address, user }))
}

/// Serves both full and partial updates; absent fields keep their stored
/// value.
#[tracing::instrument(name = "Updating an address in the database", skip(pool, changes))]
pub async fn update_address(
    pool: &PgPool,
    id: i32,
    changes: AddressChanges,
) -> Result<Option<Address>, ApiError> {
    let address = sqlx::query_as::<_, Address>(
        "UPDATE addresses SET \
            street = COALESCE($1, street), \
            city = COALESCE($2, city), \
            state = COALESCE($3, state), \
            pincode = COALESCE($4, pincode), \
            updated_at = NOW() \
         WHERE id = $5 \
         RETURNING id, user_id, street, city, state, pincode, created_at, updated_at",
    )
    .bind(changes.street.as_ref().map(|f| f.as_ref()))
    .bind(changes.city.as_ref().map(|f| f.as_ref()))
    .bind(changes.state.as_ref().map(|f| f.as_ref()))
    .bind(changes.pincode.as_ref().map(|f| f.as_ref()))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to update address in the database.")?;

    Ok(address)
}

#[tracing::instrument(name = "Deleting an address", skip(pool))]
pub async fn delete_address(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete address from the database.")?;

    Ok(result.rows_affected() > 0)
}

/// Two-step fetch-then-attach in place of an eager join: one query for the
/// page of addresses, one for the distinct owning users.
async fn attach_owners(
    pool: &PgPool,
    addresses: Vec<Address>,
) -> Result<Vec<AddressWithUser>, ApiError> {
    let mut user_ids: Vec<i32> = addresses.iter().map(|address| address.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, first_name, last_name, email FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await
    .context("Failed to fetch the owning users.")?;

    let by_id: HashMap<i32, UserSummary> = users.into_iter().map(|user| (user.id, user)).collect();

    Ok(addresses
        .into_iter()
        .map(|address| {
            let user = by_id.get(&address.user_id).cloned();
            AddressWithUser { address, user }
        })
        .collect())
}
