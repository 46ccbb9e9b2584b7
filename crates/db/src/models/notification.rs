//! Notification model.

use hotelops_core::notification::{NotificationType, RecipientRole};
use hotelops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `notifications` table.
///
/// `recipient_role` is `None` only on legacy rows written before the column
/// was populated.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub notification_type: NotificationType,
    pub recipient_role: Option<RecipientRole>,
    pub user_id: Option<DbId>,
    pub message: String,
    pub reference_id: Option<DbId>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

fn decode_column<T>(column: &str, raw: String) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = hotelops_core::error::CoreError>,
{
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let notification_type: String = row.try_get("notification_type")?;
        let recipient_role: Option<String> = row.try_get("recipient_role")?;

        Ok(Self {
            id: row.try_get("id")?,
            notification_type: decode_column("notification_type", notification_type)?,
            recipient_role: recipient_role
                .map(|r| decode_column("recipient_role", r))
                .transpose()?,
            user_id: row.try_get("user_id")?,
            message: row.try_get("message")?,
            reference_id: row.try_get("reference_id")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
