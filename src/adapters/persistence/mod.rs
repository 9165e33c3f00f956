use sqlx::PgPool;

use crate::app_error::AppError;

pub mod checkout_session;
pub mod subscription;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "Unique constraint violated"
                );
                AppError::Database("Duplicate record".into())
            }
            _ => {
                // Log the actual error, never expose it
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
