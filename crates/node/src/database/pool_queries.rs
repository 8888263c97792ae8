use uuid::Uuid;

use common::pool::{format_pool_id, NewMessage, Payload, Pool};

use super::models::{MessageRow, PoolRow};
use super::Database;

/// Outcome of inserting a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolInsert {
    Inserted,
    /// The new pool's tag or id already names another pool
    IdentifierTaken(String),
}

impl Database {
    /// Look up a pool row by id or tag
    pub async fn pool_row(&self, identifier: &str) -> Result<Option<PoolRow>, sqlx::Error> {
        sqlx::query_as::<_, PoolRow>(
            r#"
            SELECT
                id, tag, pool_type, description, public, encrypted,
                master_key_hash, writer_key_hash, reader_key_hash,
                creator_signature_id, created_at
            FROM pools
            WHERE id = ?1 OR tag = ?1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&**self)
        .await
    }

    /// Every pool row, oldest first
    pub async fn pool_rows(&self) -> Result<Vec<PoolRow>, sqlx::Error> {
        sqlx::query_as::<_, PoolRow>(
            r#"
            SELECT
                id, tag, pool_type, description, public, encrypted,
                master_key_hash, writer_key_hash, reader_key_hash,
                creator_signature_id, created_at
            FROM pools
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&**self)
        .await
    }

    pub async fn count_pool_rows(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pools")
            .fetch_one(&**self)
            .await
    }

    /// Messages of a pool in index order
    pub async fn message_rows(&self, pool_id: &Uuid) -> Result<Vec<MessageRow>, sqlx::Error> {
        sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT idx, kind, text, ciphertext, nonce, tag, signature_id, created_at
            FROM messages
            WHERE pool_id = ?1
            ORDER BY idx ASC
            "#,
        )
        .bind(format_pool_id(pool_id))
        .fetch_all(&**self)
        .await
    }

    pub async fn insert_pool(&self, pool: &Pool) -> Result<PoolInsert, sqlx::Error> {
        let id = format_pool_id(&pool.id);
        let mut tx = self.begin().await?;

        let taken: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM pools
            WHERE id = ?1 OR tag = ?1 OR id = ?2 OR tag = ?2
            "#,
        )
        .bind(pool.tag.as_deref())
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;
        if taken > 0 {
            return Ok(PoolInsert::IdentifierTaken(pool.tag.clone().unwrap_or(id)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO pools (
                id, tag, pool_type, description, public, encrypted,
                master_key_hash, writer_key_hash, reader_key_hash,
                creator_signature_id, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&id)
        .bind(pool.tag.as_deref())
        .bind(pool.pool_type.as_str())
        .bind(pool.description.as_deref())
        .bind(pool.public)
        .bind(pool.encrypted)
        .bind(pool.master_key_hash.as_str())
        .bind(pool.writer_key_hash.as_ref().map(|h| h.as_str()))
        .bind(pool.reader_key_hash.as_ref().map(|h| h.as_str()))
        .bind(pool.creator_signature.as_ref().map(|s| s.id.as_str()))
        .bind(pool.created_at)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Ok(PoolInsert::IdentifierTaken(pool.tag.clone().unwrap_or(id)));
            }
            Err(e) => return Err(e),
        }

        tx.commit().await?;
        Ok(PoolInsert::Inserted)
    }

    /// Write a pool's own fields. Returns whether the pool exists.
    pub async fn update_pool_row(&self, pool: &Pool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE pools
            SET description = ?2,
                master_key_hash = ?3,
                writer_key_hash = ?4,
                reader_key_hash = ?5
            WHERE id = ?1
            "#,
        )
        .bind(format_pool_id(&pool.id))
        .bind(pool.description.as_deref())
        .bind(pool.master_key_hash.as_str())
        .bind(pool.writer_key_hash.as_ref().map(|h| h.as_str()))
        .bind(pool.reader_key_hash.as_ref().map(|h| h.as_str()))
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Messages go with it through `ON DELETE CASCADE`
    pub async fn delete_pool_row(&self, pool_id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pools WHERE id = ?1")
            .bind(format_pool_id(pool_id))
            .execute(&**self)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert a message at `COUNT(*) + 1` in a single statement.
    ///
    /// Returns the assigned index, or `None` if the pool does not exist.
    pub async fn insert_message(
        &self,
        pool_id: &Uuid,
        message: &NewMessage,
    ) -> Result<Option<i64>, sqlx::Error> {
        let (kind, text, ciphertext, nonce, tag) = match &message.payload {
            Payload::Plaintext { text } => (message.payload.kind(), Some(text), None, None, None),
            Payload::Encrypted {
                ciphertext,
                nonce,
                tag,
            } => (
                message.payload.kind(),
                None,
                Some(ciphertext),
                Some(nonce),
                Some(tag),
            ),
        };

        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO messages (
                pool_id, idx, kind, text, ciphertext, nonce, tag, signature_id, created_at
            )
            SELECT
                ?1,
                (SELECT COUNT(*) FROM messages WHERE pool_id = ?1) + 1,
                ?2, ?3, ?4, ?5, ?6, ?7, ?8
            FROM pools
            WHERE id = ?1
            RETURNING idx
            "#,
        )
        .bind(format_pool_id(pool_id))
        .bind(kind.as_str())
        .bind(text)
        .bind(ciphertext)
        .bind(nonce)
        .bind(tag)
        .bind(message.signature.as_ref().map(|s| s.id.as_str()))
        .bind(message.created_at)
        .fetch_optional(&**self)
        .await
    }
}
