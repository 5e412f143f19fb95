use crate::domain::AddressField;

/// A create-address request that passed request-shape validation. Whether
/// `user_id` references an existing user is checked by the service.
pub struct NewAddress {
    pub user_id: i32,
    pub street: AddressField,
    pub city: AddressField,
    pub state: AddressField,
    pub pincode: AddressField,
}

/// Field subset for full and partial address updates.
pub struct AddressChanges {
    pub street: Option<AddressField>,
    pub city: Option<AddressField>,
    pub state: Option<AddressField>,
    pub pincode: Option<AddressField>,
}

impl AddressChanges {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.pincode.is_none()
    }
}
