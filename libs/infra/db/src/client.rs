// [libs/infra/db/src/client.rs]
use crate::errors::DbError;
use crate::schema::apply_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{info, instrument};

/// A handle to the libSQL/Turso database, shared across repositories. Holds
/// the underlying [`Database`] so every repository call can open its own
/// short-lived [`Connection`] (libsql connections are cheap and not
/// `Send`-shared across awaits).
#[derive(Clone)]
pub struct DbClient {
    database: Arc<Database>,
    /// Kept alive for `:memory:` databases -- libsql drops in-memory schema
    /// once the last connection to it closes, so tests and any in-process
    /// deployment need one anchor connection held for the client's lifetime.
    _memory_anchor: Option<Arc<Connection>>,
}

impl DbClient {
    /// Connects to `database_url` (a `libsql://...`/`https://...` remote, a
    /// local file path, or `:memory:`), applying the schema migrations
    /// idempotently before returning.
    #[instrument(skip(auth_token))]
    pub async fn connect(database_url: &str, auth_token: Option<String>) -> Result<Self, DbError> {
        if database_url.is_empty() {
            return Err(DbError::Connection("DATABASE_URL is empty".to_string()));
        }

        let is_remote = database_url.starts_with("libsql://") || database_url.starts_with("https://");
        let is_memory = database_url.contains(":memory:");

        let database = if is_remote {
            let token = auth_token
                .ok_or_else(|| DbError::Connection("remote database requires TURSO_AUTH_TOKEN".to_string()))?;
            Builder::new_remote(database_url.to_string(), token).build().await
        } else {
            Builder::new_local(database_url).build().await
        }
        .map_err(|err| DbError::Connection(err.to_string()))?;

        let database = Arc::new(database);

        let anchor = if is_memory {
            let conn = database.connect().map_err(|err| DbError::Connection(err.to_string()))?;
            apply_schema(&conn).await?;
            Some(Arc::new(conn))
        } else {
            let conn = database.connect().map_err(|err| DbError::Connection(err.to_string()))?;
            apply_schema(&conn).await?;
            None
        };

        info!(url = %database_url, "database connected and schema applied");

        Ok(Self { database, _memory_anchor: anchor })
    }

    /// Opens a fresh connection to issue queries on.
    pub fn connection(&self) -> Result<Connection, DbError> {
        self.database.connect().map_err(|err| DbError::Connection(err.to_string()))
    }
}
