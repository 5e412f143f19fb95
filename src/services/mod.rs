pub mod addresses;
pub mod users;
