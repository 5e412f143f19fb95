#[derive(Debug)]
pub struct AddressField(String);

impl AddressField {
    /// Address fields only need to be non-empty.
    pub fn parse(value: String, field: &str) -> Result<AddressField, String> {
        if value.trim().is_empty() {
            return Err(format!("{} must not be empty", field));
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for AddressField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
