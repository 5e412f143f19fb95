mod address_field;
mod new_address;
mod new_user;
mod user_email;
mod user_name;

pub use address_field::AddressField;
pub use new_address::{AddressChanges, NewAddress};
pub use new_user::{NewUser, UserChanges};
pub use user_email::UserEmail;
pub use user_name::UserName;
