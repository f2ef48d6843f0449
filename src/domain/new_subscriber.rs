use serde::Deserialize;

use crate::domain::required_field;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

/// Someone asking to receive the welcome email and join the mailing list.
#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<SubscriberName>,
}

#[derive(Deserialize, Debug)]
pub struct WelcomeEmailBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl TryFrom<WelcomeEmailBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: WelcomeEmailBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(required_field(body.email, "email")?)?;
        let name = SubscriberName::parse(body.name);

        Ok(NewSubscriber { email, name })
    }
}
