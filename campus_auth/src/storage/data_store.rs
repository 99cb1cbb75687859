//! Backend selection for the shared connection pool.
//!
//! One process talks to exactly one database, chosen by
//! `GENERIC_DATA_STORE_TYPE` / `GENERIC_DATA_STORE_URL` and connected lazily
//! on first use. The per-domain stores (users, verification tokens, refresh
//! tokens) borrow the pool through [`GENERIC_DATA_STORE`] and dispatch on
//! which accessor returns a pool.

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set")
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set")
});

/// A pool for one of the two supported backends. Exactly one accessor
/// returns `Some`, so store code can branch without knowing which backend
/// was configured.
pub(crate) trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&sqlx::SqlitePool>;
    fn as_postgres(&self) -> Option<&sqlx::PgPool>;
}

struct SqliteDataStore {
    pool: sqlx::SqlitePool,
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&sqlx::SqlitePool> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&sqlx::PgPool> {
        None
    }
}

struct PostgresDataStore {
    pool: sqlx::PgPool,
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&sqlx::SqlitePool> {
        None
    }

    fn as_postgres(&self) -> Option<&sqlx::PgPool> {
        Some(&self.pool)
    }
}

/// The process-wide store handle. SQLite databases are created on demand so
/// a fresh deployment (or test run) needs no setup step beyond `init()`.
pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!("Using {} data store at {}", store_type, store_url);

    let store: Box<dyn DataStore> = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            })
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }),
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});
