pub mod approval_email;
pub mod mailing_list_entry;
pub mod new_subscriber;
pub mod poem_announcement;
pub mod subscriber_email;
pub mod subscriber_name;
pub mod unsubscription;

/// Reads a required text field, treating blank strings as missing.
pub(crate) fn required_field(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("Missing {}", field)),
    }
}
