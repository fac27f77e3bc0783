//! Command-line and environment configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use habitcommit_server::ServerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "habitcommit",
    version,
    about = "Habit tracking API backed by SQLite"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// `serve` options on their own, resolved from env and defaults only
#[derive(Parser, Debug)]
struct DefaultServe {
    #[command(flatten)]
    args: ServeArgs,
}

impl Cli {
    /// The subcommand to run; bare `habitcommit` means `serve`.
    ///
    /// Server flags are only accepted after `serve`, so there is a single
    /// place they can come from.
    pub fn into_command(self) -> Result<Commands, clap::Error> {
        match self.command {
            Some(command) => Ok(command),
            None => {
                let DefaultServe { args } = DefaultServe::try_parse_from(["habitcommit"])?;
                Ok(Commands::Serve(args))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API (default)
    Serve(ServeArgs),
    /// Create the database and its tables, then exit
    InitDb(DatabaseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "habits.db")]
    pub database_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "BIND_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Prefix to mount the API under (e.g. /api)
    #[arg(long, env = "API_BASE_PATH")]
    pub base_path: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            base_path: self.base_path.clone(),
        }
    }
}
