use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::checkout_session::{CheckoutSessionRepo, CreateCheckoutSessionInput},
    domain::entities::{
        checkout_session::{CheckoutSession, CheckoutSessionStatus},
        plan::Plan,
    },
};

fn row_to_session(row: &sqlx::postgres::PgRow) -> CheckoutSession {
    CheckoutSession {
        id: row.get("id"),
        user_id: row.get("user_id"),
        plan: row.get("plan"),
        session_id: row.get("session_id"),
        checkout_url: row.get("checkout_url"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, plan, session_id, checkout_url, status, created_at, expires_at
"#;

#[async_trait]
impl CheckoutSessionRepo for PostgresPersistence {
    async fn get_latest_active(
        &self,
        user_id: Uuid,
        plan: Plan,
    ) -> AppResult<Option<CheckoutSession>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM checkout_sessions WHERE user_id = $1 AND plan = $2 AND status = $3 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLS
        ))
        .bind(user_id)
        .bind(plan)
        .bind(CheckoutSessionStatus::Active)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_session))
    }

    async fn create(&self, input: &CreateCheckoutSessionInput) -> AppResult<CheckoutSession> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        // An expired row still marked ACTIVE would otherwise hold the unique
        // index until the next reconciliation pass.
        sqlx::query(
            r#"
            UPDATE checkout_sessions SET status = $1
            WHERE user_id = $2 AND plan = $3 AND status = $4 AND expires_at <= $5
            "#,
        )
        .bind(CheckoutSessionStatus::Expired)
        .bind(input.user_id)
        .bind(input.plan)
        .bind(CheckoutSessionStatus::Active)
        .bind(input.created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO checkout_sessions (id, user_id, plan, session_id, checkout_url, status, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.plan)
        .bind(&input.session_id)
        .bind(&input.checkout_url)
        .bind(CheckoutSessionStatus::Active)
        .bind(input.created_at)
        .bind(input.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(row_to_session(&row))
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE checkout_sessions SET status = $1 WHERE status = $2 AND expires_at <= $3",
        )
        .bind(CheckoutSessionStatus::Expired)
        .bind(CheckoutSessionStatus::Active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }
}
