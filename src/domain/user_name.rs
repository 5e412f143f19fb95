use unicode_segmentation::UnicodeSegmentation;

const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug)]
pub struct UserName(String);

impl UserName {
    /// Accepts between 1 and 100 graphemes. `field` names the offending
    /// request field in the error message.
    pub fn parse(value: String, field: &str) -> Result<UserName, String> {
        if value.trim().is_empty() {
            return Err(format!("{} must not be empty", field));
        }

        if value.graphemes(true).count() > MAX_NAME_LENGTH {
            return Err(format!(
                "{} must be at most {} characters long",
                field, MAX_NAME_LENGTH
            ));
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
