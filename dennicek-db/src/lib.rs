pub mod client;
pub mod memory;
pub mod store;

mod id;
mod record;

use dennicek_common::{model::ModelValidationError, snowflake::SnowflakeTimestampError};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Could not generate an id: {0}")]
    IdGeneration(#[from] SnowflakeTimestampError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("Running migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
