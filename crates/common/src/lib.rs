//! Ambient helpers shared by every crate in the workspace: logging setup,
//! filesystem checks, Prometheus metrics and small wire types.

pub mod types;
pub mod utils;
pub mod env;
pub mod metrics;
