//! Repository for the `notifications` table.

use hotelops_core::notification::{NewNotification, NotificationScope};
use hotelops_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, notification_type, recipient_role, user_id, message, reference_id, is_read, created_at";

/// Append the `WHERE` clause for a role scope.
///
/// Must stay equivalent to [`NotificationScope::matches`].
fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: &NotificationScope) {
    match scope {
        NotificationScope::Admin => {
            builder.push(" WHERE (recipient_role IS NULL OR recipient_role IN ('admin', 'all'))");
        }
        NotificationScope::Guest { user_id } => {
            builder
                .push(" WHERE recipient_role = 'guest' AND user_id = ")
                .push_bind(*user_id);
        }
        NotificationScope::Staff { user_id, roles } => {
            let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
            builder
                .push(" WHERE recipient_role = ANY(")
                .push_bind(roles)
                .push(") AND (user_id IS NULL OR user_id = ")
                .push_bind(*user_id)
                .push(")");
        }
    }
}

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification record.
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications
                 (notification_type, recipient_role, user_id, message, reference_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.notification_type.as_str())
            .bind(input.recipient_role.as_str())
            .bind(input.user_id)
            .bind(&input.message)
            .bind(input.reference_id)
            .fetch_one(pool)
            .await
    }

    /// List the notifications visible to `scope`: unread first, then newest first.
    pub async fn list_for_scope(
        pool: &PgPool,
        scope: &NotificationScope,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM notifications"));
        push_scope(&mut builder, scope);
        builder
            .push(" ORDER BY is_read ASC, created_at DESC, id DESC LIMIT ")
            .push_bind(limit);

        builder
            .build_query_as::<Notification>()
            .fetch_all(pool)
            .await
    }

    /// Count unread notifications visible to `scope`.
    pub async fn unread_count(pool: &PgPool, scope: &NotificationScope) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM notifications");
        push_scope(&mut builder, scope);
        builder.push(" AND is_read = false");

        builder.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Mark a single notification as read, returning the updated row.
    ///
    /// Returns `None` if no notification with that id exists.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark every unread notification as read, regardless of audience.
    ///
    /// Returns the number of rows changed.
    pub async fn mark_all_read(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET is_read = true WHERE is_read = false")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, notification_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
