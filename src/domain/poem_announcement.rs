use serde::Deserialize;

use crate::domain::required_field;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug, Clone)]
pub struct Poem {
    pub title: String,
    pub author: String,
    pub content: String,
    pub slug: String,
}

/// A freshly published poem and the people who should hear about it.
#[derive(Debug)]
pub struct PoemAnnouncement {
    pub recipients: Vec<SubscriberEmail>,
    pub poem: Poem,
}

#[derive(Deserialize, Debug)]
pub struct PoemBody {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PoemAnnouncementBody {
    pub emails: Option<Vec<String>>,
    pub poem: Option<PoemBody>,
}

impl TryFrom<PoemBody> for Poem {
    type Error = String;

    fn try_from(body: PoemBody) -> Result<Self, Self::Error> {
        Ok(Poem {
            title: required_field(body.title, "poem title")?,
            slug: required_field(body.slug, "poem slug")?,
            author: body.author.unwrap_or_default(),
            content: body.content.unwrap_or_default(),
        })
    }
}

impl TryFrom<PoemAnnouncementBody> for PoemAnnouncement {
    type Error = String;

    fn try_from(body: PoemAnnouncementBody) -> Result<Self, Self::Error> {
        let (emails, poem) = match (body.emails, body.poem) {
            (Some(emails), Some(poem)) if !emails.is_empty() => (emails, poem),
            _ => return Err(String::from("Missing data")),
        };

        let recipients = emails
            .into_iter()
            .map(SubscriberEmail::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PoemAnnouncement {
            recipients,
            poem: poem.try_into()?,
        })
    }
}
