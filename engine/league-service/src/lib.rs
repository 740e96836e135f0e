//! League service - the facade the web/API and feed collaborators use.
//!
//! Wires the ledger, the transfer market, squad management, scoring and
//! the matchday lifecycle behind one validated, lock-aware surface.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use config::{load_config, LockConfig, LoggingConfig, ServiceConfig};
pub use error::ServiceError;
pub use logging::{initialize_logging, initialize_logging_with_config};
pub use service::LeagueService;
