pub mod config;
pub mod digest;
pub mod engine;
pub mod error;

pub use config::StatsConfig;
pub use digest::StatsDigest;
pub use engine::compute;
pub use error::StatsError;
