use super::{map_write_err, parse_col, PgStore};
use crate::domain::model::{Payment, PaymentStatus};
use crate::storage::{PaymentRepository, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

const COLUMNS: &str = "id, meme_coin_id, amount, currency, payment_method, transaction_hash, \
    status, paid_at, user_id, created_at, updated_at";

fn payment_from_row(row: &PgRow) -> StoreResult<Payment> {
    Ok(Payment {
        id: row.try_get("id")?,
        meme_coin_id: row.try_get("meme_coin_id")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        payment_method: row.try_get("payment_method")?,
        transaction_hash: row.try_get("transaction_hash")?,
        status: parse_col(row, "status")?,
        paid_at: row.try_get("paid_at")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PaymentRepository for PgStore {
    async fn insert_payment(&self, payment: &Payment) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO payments ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(payment.id)
        .bind(payment.meme_coin_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.payment_method)
        .bind(&payment.transaction_hash)
        .bind(payment.status.as_str())
        .bind(payment.paid_at)
        .bind(payment.user_id)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(payment_from_row).transpose()
    }

    async fn payments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(payment_from_row).collect()
    }

    async fn payments_for_meme_coin(&self, meme_coin_id: Uuid) -> StoreResult<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments WHERE meme_coin_id = $1 ORDER BY created_at DESC"
        ))
        .bind(meme_coin_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(payment_from_row).collect()
    }

    async fn transition_payment(&self, payment: &Payment, from: PaymentStatus) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE payments SET transaction_hash = $2, status = $3, paid_at = $4, updated_at = $5
             WHERE id = $1 AND status = $6",
        )
        .bind(payment.id)
        .bind(&payment.transaction_hash)
        .bind(payment.status.as_str())
        .bind(payment.paid_at)
        .bind(payment.updated_at)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
