use dennicek_common::snowflake::{ProcessId, WorkerId};
use dennicek_db::{DbError, client::DbClient, memory::MemoryStore, store::Store};
use serde::{Deserialize, de::DeserializeOwned};
use std::{net::IpAddr, path::PathBuf, sync::Arc};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error opening the store: {0}")]
    Store(#[from] DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct ServerEnv {
    pub server_address: IpAddr,
    pub server_port: u16,
    /// Directory of the built client. Without it only the api is served.
    pub client_dist: Option<PathBuf>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct StoreEnv {
    /// Without a database everything is kept in memory.
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default)]
    pub worker_id: WorkerId,
    #[serde(default)]
    pub process_id: ProcessId,
}

fn default_max_connections() -> u32 {
    5
}

pub fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dennicek_api=debug,\
                dennicek_db=debug,\
                dennicek_common=debug,\
                dennicek_seeder=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Adds the variables from `.env` to the environment, if there is such a file.
pub fn load_dotenv() -> Result<(), InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .env file found");
        } else {
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn get_env<T: DeserializeOwned>() -> Result<T, InitError> {
    envy::from_env().map_err(InitError::from)
}

pub async fn open_store(env: &StoreEnv) -> Result<Arc<dyn Store>, InitError> {
    let store: Arc<dyn Store> = match &env.database_url {
        Some(database_url) => {
            let client = DbClient::connect(
                database_url,
                env.database_max_connections,
                env.worker_id,
                env.process_id,
            )
            .await?;
            info!("Connected to database");
            Arc::new(client)
        }
        None => {
            warn!("DATABASE_URL is not set, keeping everything in memory");
            Arc::new(MemoryStore::new(env.worker_id, env.process_id))
        }
    };

    Ok(store)
}
