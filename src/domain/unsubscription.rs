use serde::Deserialize;

use crate::domain::required_field;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub struct Unsubscription {
    pub email: SubscriberEmail,
}

#[derive(Deserialize, Debug)]
pub struct UnsubscribeBody {
    pub email: Option<String>,
}

impl TryFrom<UnsubscribeBody> for Unsubscription {
    type Error = String;

    fn try_from(body: UnsubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(required_field(body.email, "email")?)?;

        Ok(Unsubscription { email })
    }
}
