use common::signature::Signature;

use super::models::SignatureRow;
use super::Database;

impl Database {
    pub async fn signature_row(&self, id: &str) -> Result<Option<SignatureRow>, sqlx::Error> {
        sqlx::query_as::<_, SignatureRow>(
            r#"
            SELECT id, key_hash, value, description, created_at
            FROM signatures
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&**self)
        .await
    }

    pub async fn count_signature_rows(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM signatures")
            .fetch_one(&**self)
            .await
    }

    /// Insert unless the id is taken. Returns whether a row was written.
    pub async fn insert_signature(&self, signature: &Signature) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO signatures (id, key_hash, value, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&signature.id)
        .bind(signature.key_hash.as_str())
        .bind(&signature.value)
        .bind(signature.description.as_deref())
        .bind(signature.created_at)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_signature_row(&self, signature: &Signature) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE signatures
            SET key_hash = ?2,
                value = ?3,
                description = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&signature.id)
        .bind(signature.key_hash.as_str())
        .bind(&signature.value)
        .bind(signature.description.as_deref())
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
