// crates/server/src/config.rs
//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use dmphq_core::{CatalogError, ModuleCatalog};

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 47900;

#[derive(Debug, Clone, Parser)]
#[command(name = "dmphq")]
#[command(version, about = "Automation score and recommendation service", long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "DMPHQ_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "DMPHQ_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Module catalog TOML file (defaults to <config dir>/dmphq/modules.toml)
    #[arg(long, env = "DMPHQ_CATALOG")]
    pub catalog: Option<PathBuf>,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Explicit catalog path, or the per-user default location.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("dmphq").join("modules.toml")))
    }

    /// Load the module catalog.
    ///
    /// An explicitly configured file must exist; the default location may
    /// be absent, in which case the built-in catalog is used.
    pub fn load_catalog(&self) -> Result<ModuleCatalog, CatalogError> {
        match &self.catalog {
            Some(path) => ModuleCatalog::load(path),
            None => ModuleCatalog::load_or_default(self.catalog_path().as_deref()),
        }
    }
}
