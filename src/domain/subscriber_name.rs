use askama_escape::{escape, Html};

/// Free-text display name. Stored as given (trimmed), escaped only when it
/// is written into markup.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    /// Blank or missing names count as no name at all.
    pub fn parse(name: Option<String>) -> Option<SubscriberName> {
        match name {
            Some(name) if !name.trim().is_empty() => Some(Self(name.trim().to_string())),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        escape(&self.0, Html).to_string()
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
