use crate::domain::UserName;

/// A create-user request that passed request-shape validation. The email is
/// still a raw string at this point: the email policy belongs to the service
/// layer, which applies it before touching the database.
pub struct NewUser {
    pub first_name: UserName,
    pub last_name: UserName,
    pub email: String,
}

/// Field subset for full and partial user updates. PUT accepts any subset;
/// PATCH additionally requires at least one field, enforced at the route
/// layer via [`UserChanges::is_empty`].
pub struct UserChanges {
    pub first_name: Option<UserName>,
    pub last_name: Option<UserName>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}
