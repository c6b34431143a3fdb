//! MongoDB client construction, health probes and filter values

mod codec;
mod config;
mod connector;
mod health;

pub use codec::{to_stored_bson, uuid_bson};
pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry, ping};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
