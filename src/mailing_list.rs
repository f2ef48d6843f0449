use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::mailing_list_entry::MailingListEntry;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(thiserror::Error, Debug)]
#[error("Mailing list query failed: {0}")]
pub struct MailingListError(#[from] pub sqlx::Error);

/// Storage for the poem announcement mailing list, keyed by email.
#[async_trait]
pub trait MailingListStore: Send + Sync {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<MailingListEntry>, MailingListError>;

    /// Adds a subscribed entry. An existing entry for the same email is
    /// re-subscribed instead of duplicated.
    async fn insert(
        &self,
        email: &SubscriberEmail,
        name: &str,
    ) -> Result<MailingListEntry, MailingListError>;

    /// Updates every entry for `email` and returns how many were touched.
    async fn set_subscribed(
        &self,
        email: &SubscriberEmail,
        subscribed: bool,
    ) -> Result<u64, MailingListError>;
}

pub struct PgMailingList {
    db_pool: PgPool,
}

impl PgMailingList {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

fn entry_from_row(row: PgRow) -> MailingListEntry {
    MailingListEntry {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        subscribed: row.get("subscribed"),
        created: row.get("created"),
        unsubscribed_at: row.get("unsubscribed_at"),
    }
}

#[async_trait]
impl MailingListStore for PgMailingList {
    #[tracing::instrument(name = "Find a mailing list entry by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<MailingListEntry>, MailingListError> {
        let entry = sqlx::query(
            r#"
            SELECT id, email, name, subscribed, created, unsubscribed_at
            FROM mailing_list
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email.as_ref())
        .map(entry_from_row)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(entry)
    }

    #[tracing::instrument(name = "Insert a mailing list entry", skip(self))]
    async fn insert(
        &self,
        email: &SubscriberEmail,
        name: &str,
    ) -> Result<MailingListEntry, MailingListError> {
        let entry = sqlx::query(
            r#"
            INSERT INTO mailing_list (id, email, name, subscribed, created)
            VALUES ($1, $2, $3, TRUE, $4)
            ON CONFLICT (email) DO UPDATE SET subscribed = TRUE
            RETURNING id, email, name, subscribed, created, unsubscribed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(name)
        .bind(Utc::now())
        .map(entry_from_row)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(entry)
    }

    #[tracing::instrument(name = "Update mailing list subscription flag", skip(self))]
    async fn set_subscribed(
        &self,
        email: &SubscriberEmail,
        subscribed: bool,
    ) -> Result<u64, MailingListError> {
        let query = if subscribed {
            sqlx::query("UPDATE mailing_list SET subscribed = TRUE WHERE email = $1")
                .bind(email.as_ref())
        } else {
            sqlx::query(
                "UPDATE mailing_list SET subscribed = FALSE, unsubscribed_at = $2 WHERE email = $1",
            )
            .bind(email.as_ref())
            .bind(Utc::now())
        };

        let result = query.execute(&self.db_pool).await.map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(result.rows_affected())
    }
}
