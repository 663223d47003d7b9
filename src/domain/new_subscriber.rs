use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

const DEFAULT_SOURCE: &str = "website";

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<SubscriberName>,
    pub source: String,
}

/// Raw `POST /api/subscribe` payload. `email` is optional here so that a
/// missing field reaches the handler as a validation error instead of a
/// deserialization failure.
#[derive(Deserialize)]
pub struct SubscribeBody {
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email.unwrap_or_default())?;
        // A blank name is treated as "not provided", not as invalid input
        let name = match body.name.filter(|name| !name.trim().is_empty()) {
            Some(name) => Some(SubscriberName::parse(name)?),
            None => None,
        };
        let source = body
            .source
            .map(|source| source.trim().to_owned())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_owned());

        Ok(NewSubscriber {
            email,
            name,
            source,
        })
    }
}
