mod index;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{config::AppConfig, error::AppError};

const DROP_ALL: &str = "DROP TABLE IF EXISTS word_title;
DROP TABLE IF EXISTS words;
DROP TABLE IF EXISTS titles;
DROP TABLE IF EXISTS _sqlx_migrations;";

#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .connect_with(config.connect_options())
            .await?;
        tracing::debug!(
            host = %config.db_hostname,
            database = %config.db_name,
            "Connected to database"
        );
        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), AppError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub async fn drop_all(&self) -> Result<(), AppError> {
        let mut transaction = self.pool.begin().await?;
        sqlx::raw_sql(DROP_ALL).execute(&mut *transaction).await?;
        transaction.commit().await?;
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub fn lazy(options: sqlx::postgres::PgConnectOptions) -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(500))
            .connect_lazy_with(options);
        Self { pool }
    }
}
