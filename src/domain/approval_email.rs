use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

/// A free-form email whose HTML is produced by the caller.
#[derive(Debug)]
pub struct ApprovalEmail {
    pub to: SubscriberEmail,
    pub subject: String,
    pub html: String,
}

#[derive(Deserialize, Debug)]
pub struct ApprovalEmailBody {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html: Option<String>,
}

impl TryFrom<ApprovalEmailBody> for ApprovalEmail {
    type Error = String;

    fn try_from(body: ApprovalEmailBody) -> Result<Self, Self::Error> {
        let (to, subject, html) = match (body.to, body.subject, body.html) {
            (Some(to), Some(subject), Some(html))
                if !to.trim().is_empty() && !subject.trim().is_empty() && !html.trim().is_empty() =>
            {
                (to, subject, html)
            }
            _ => return Err(String::from("Missing to, subject, or html")),
        };

        Ok(ApprovalEmail {
            to: SubscriberEmail::parse(to)?,
            subject,
            html,
        })
    }
}
