//! PostgreSQL implementation of the storage layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::LedgerStore;
use super::models::{PoolRow, TransactionRow, to_db_amount};
use crate::config::LedgerConfig;
use crate::domain::pool::check_amount;
use crate::domain::{Address, MigrationPlan, NewPool, NewTransaction, Pool, Transaction};
use crate::error::LedgerError;

const POOL_COLUMNS: &str = "address, owner, total_liquidity, created_at";
const TRANSACTION_COLUMNS: &str =
    "id, type, from_address, to_address, amount, status, created_at";

/// PostgreSQL-backed [`LedgerStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`, checks the connection, and runs the
    /// embedded migrations when enabled in `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::Storage`] if the database cannot be reached
    /// within the configured timeout or a migration fails.
    pub async fn connect(database_url: &str, config: &LedgerConfig) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        tracing::info!("PostgreSQL database connected");

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| LedgerError::Storage(format!("migration failed: {e}")))?;
        }

        Ok(Self::new(pool))
    }

    async fn fetch_pools(&self, sql: &str, bind: Option<&str>) -> Result<Vec<Pool>, LedgerError> {
        let query = sqlx::query_as::<_, PoolRow>(sql);
        let query = match bind {
            Some(value) => query.bind(value.to_owned()),
            None => query,
        };
        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Pool::try_from)
            .collect()
    }
}

#[async_trait]
impl LedgerStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create_pool(&self, pool: NewPool) -> Result<Pool, LedgerError> {
        let row = sqlx::query_as::<_, PoolRow>(&format!(
            "INSERT INTO liquidity_pools (address, owner, total_liquidity) \
             VALUES ($1, $2, $3) RETURNING {POOL_COLUMNS}"
        ))
        .bind(pool.address.as_str())
        .bind(pool.owner.as_str())
        .bind(to_db_amount(pool.total_liquidity)?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                LedgerError::PoolAlreadyExists(pool.address.clone())
            }
            other => LedgerError::from(other),
        })?;

        Pool::try_from(row)
    }

    async fn get_all_pools(&self) -> Result<Vec<Pool>, LedgerError> {
        self.fetch_pools(
            &format!("SELECT {POOL_COLUMNS} FROM liquidity_pools ORDER BY id ASC"),
            None,
        )
        .await
    }

    async fn get_pools_by_owner(&self, owner: &Address) -> Result<Vec<Pool>, LedgerError> {
        self.fetch_pools(
            &format!("SELECT {POOL_COLUMNS} FROM liquidity_pools WHERE owner = $1 ORDER BY id ASC"),
            Some(owner.as_str()),
        )
        .await
    }

    async fn get_pool_by_address(&self, address: &Address) -> Result<Option<Pool>, LedgerError> {
        sqlx::query_as::<_, PoolRow>(&format!(
            "SELECT {POOL_COLUMNS} FROM liquidity_pools WHERE address = $1"
        ))
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Pool::try_from)
        .transpose()
    }

    async fn update_pool_liquidity(
        &self,
        address: &Address,
        new_liquidity: u64,
    ) -> Result<Option<Pool>, LedgerError> {
        check_amount("newLiquidity", new_liquidity)?;
        sqlx::query_as::<_, PoolRow>(&format!(
            "UPDATE liquidity_pools SET total_liquidity = $1 WHERE address = $2 \
             RETURNING {POOL_COLUMNS}"
        ))
        .bind(to_db_amount(new_liquidity)?)
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Pool::try_from)
        .transpose()
    }

    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
    }

    async fn get_transactions_by_address(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, LedgerError> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE from_address = $1 OR to_address = $1 ORDER BY id ASC"
        ))
        .bind(address.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
    }

    async fn create_transaction(&self, record: NewTransaction) -> Result<Transaction, LedgerError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "INSERT INTO transactions (type, from_address, to_address, amount, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(record.kind.as_str())
        .bind(record.from_address.as_str())
        .bind(record.to_address.as_str())
        .bind(to_db_amount(record.amount)?)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Transaction::try_from(row)
    }

    async fn apply_migration(
        &self,
        record: NewTransaction,
        plan: &MigrationPlan,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.pool.begin().await?;

        // Lock rows in address order so opposing migrations cannot deadlock.
        let mut sides = [&plan.source, &plan.destination];
        sides.sort_by(|a, b| a.address.cmp(&b.address));

        for side in sides {
            let updated = sqlx::query(
                "UPDATE liquidity_pools SET total_liquidity = $1 \
                 WHERE address = $2 AND total_liquidity = $3",
            )
            .bind(to_db_amount(side.new)?)
            .bind(side.address.as_str())
            .bind(to_db_amount(side.expected)?)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated != 1 {
                tx.rollback().await?;
                return Err(LedgerError::StaleBalance(side.address.clone()));
            }
        }

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "INSERT INTO transactions (type, from_address, to_address, amount, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(record.kind.as_str())
        .bind(record.from_address.as_str())
        .bind(record.to_address.as_str())
        .bind(to_db_amount(record.amount)?)
        .bind(record.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Transaction::try_from(row)
    }
}
