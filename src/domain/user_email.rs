use validator::validate_email;

const ALLOWED_DOMAIN: &str = "@gmail.com";

#[derive(Debug)]
pub struct UserEmail(String);

impl UserEmail {
    /// Applies the email policy. A syntactically invalid address and a
    /// disallowed domain are two distinct failures with distinct messages.
    pub fn parse(email: String) -> Result<UserEmail, String> {
        if !validate_email(&email) {
            return Err("Invalid email format".to_string());
        }

        if !email.ends_with(ALLOWED_DOMAIN) {
            return Err(format!("Only {} emails are allowed", ALLOWED_DOMAIN));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
