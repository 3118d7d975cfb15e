use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Args;
use taskshot_db::DbConfig;
use taskshot_store::StoreConfig;

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "TASKSHOT_BIND", default_value = "0.0.0.0", global = true)]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "TASKSHOT_PORT", default_value = "8000", global = true)]
    pub port: u16,

    /// Base directory holding one screenshot directory per task id
    #[arg(long, env = "TASKSHOT_SCREENSHOT_DIR", global = true)]
    pub screenshot_dir: Option<PathBuf>,

    /// Path of the SQLite task registry
    #[arg(long, env = "TASKSHOT_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            screenshot_dir: self.screenshot_dir.clone(),
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            sqlite_path: self.db_path.clone(),
        }
    }
}
