use validator::validate_email;

/// A validated, normalized email address. Input is trimmed and lowercased
/// before validation so that `A@Example.com` and `a@example.com` always map
/// to the same stored value.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let normalized = email.trim().to_lowercase();

        if !validate_email(&normalized) {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(normalized))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
