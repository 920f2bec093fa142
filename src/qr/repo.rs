use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored QR code, exclusively owned by one account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QrCodeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub qr_text: String,
    pub qr_image: String,
    pub created_at: OffsetDateTime,
}

impl QrCodeRecord {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        qr_text: &str,
        qr_image: &str,
    ) -> sqlx::Result<QrCodeRecord> {
        sqlx::query_as::<_, QrCodeRecord>(
            r#"
            INSERT INTO qr_codes (user_id, qr_text, qr_image)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, qr_text, qr_image, created_at
            "#,
        )
        .bind(user_id)
        .bind(qr_text)
        .bind(qr_image)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<QrCodeRecord>> {
        sqlx::query_as::<_, QrCodeRecord>(
            r#"
            SELECT id, user_id, qr_text, qr_image, created_at
            FROM qr_codes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Owner-scoped delete; `false` when the record is absent or owned by
    /// another account. Callers cannot tell the two apart.
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM qr_codes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
