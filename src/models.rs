use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A persisted row of the `users` table.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted row of the `addresses` table.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal owner projection nested in address payloads.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// An address together with its owning user.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressWithUser {
    #[serde(flatten)]
    pub address: Address,
    pub user: Option<UserSummary>,
}

/// Address projection nested in the users-with-addresses aggregate.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressSummary {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Row shape backing [`AddressSummary`]; carries the owning user id so the
/// service can group rows by user before serializing.
#[derive(sqlx::FromRow)]
pub struct AddressSummaryRow {
    pub id: i32,
    pub user_id: i32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<AddressSummaryRow> for AddressSummary {
    fn from(row: AddressSummaryRow) -> Self {
        Self {
            id: row.id,
            street: row.street,
            city: row.city,
            state: row.state,
            pincode: row.pincode,
        }
    }
}

/// A user together with all of its addresses.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithAddresses {
    #[serde(flatten)]
    pub user: User,
    pub addresses: Vec<AddressSummary>,
}
