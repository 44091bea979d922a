//! Plain simulation data: particle records, the domain, configuration.

pub mod bounds;
pub mod config;
pub mod particle;
