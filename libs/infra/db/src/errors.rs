// [libs/infra/db/src/errors.rs]
use thiserror::Error;

/// Failures surfaced by the persistence layer (: `DbError`, scoped to
/// the failures this boundary can actually produce).
#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection failure: {0}")]
    Connection(String),

    #[error("database query failed: {0}")]
    Query(#[from] libsql::Error),

    #[error("row mapping failure: {0}")]
    Mapping(String),

    #[error("not found")]
    NotFound,

    #[error("transaction failed: {0}")]
    Transaction(String),
}
