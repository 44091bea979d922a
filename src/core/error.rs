//! Error taxonomy for (re)configuration
//!
//! Only configuration and buffer allocation can fail. `tick`,
//! `sample_velocity` and snapshots are total over valid state.

use std::fmt;

/// Rejected input. Nothing was mutated; retry with valid parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ParticleCount { requested: u32, min: u32, max: u32 },
    GridResolution { requested: u32, min: u32, max: u32 },
    DomainBounds { min: [f32; 2], max: [f32; 2] },
    Parameter { name: &'static str, reason: String },
    InvalidParticle { index: usize, reason: String },
    Json(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    Configuration(ConfigError),
    /// A particle or grid buffer could not be allocated. Fatal to the
    /// requested configuration; fall back to a smaller particle count.
    ResourceExhaustion { buffer: &'static str, requested: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParticleCount { requested, min, max } => {
                write!(f, "particle count {} outside [{}, {}]", requested, min, max)
            }
            ConfigError::GridResolution { requested, min, max } => {
                write!(f, "grid resolution {} outside [{}, {}]", requested, min, max)
            }
            ConfigError::DomainBounds { min, max } => write!(
                f,
                "domain bounds ({}, {})..({}, {}) must be finite with positive extent",
                min[0], min[1], max[0], max[1]
            ),
            ConfigError::Parameter { name, reason } => write!(f, "{}: {}", name, reason),
            ConfigError::InvalidParticle { index, reason } => {
                write!(f, "particle {}: {}", index, reason)
            }
            ConfigError::Json(msg) => write!(f, "config json: {}", msg),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Configuration(e) => write!(f, "configuration error: {}", e),
            SimError::ResourceExhaustion { buffer, requested } => write!(
                f,
                "resource exhaustion: could not allocate {} ({} elements)",
                buffer, requested
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Configuration(e) => Some(e),
            SimError::ResourceExhaustion { .. } => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Configuration(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

/// Allocate `len` clones of `value`, reporting failure instead of aborting
pub fn try_filled<T: Clone>(buffer: &'static str, len: usize, value: T) -> SimResult<Vec<T>> {
    try_with(buffer, len, |_| value.clone())
}

/// Allocate `len` elements built by `make(i)`
pub fn try_with<T, F: FnMut(usize) -> T>(
    buffer: &'static str,
    len: usize,
    make: F,
) -> SimResult<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| SimError::ResourceExhaustion { buffer, requested: len })?;
    out.extend((0..len).map(make));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bad_value() {
        let e: SimError =
            ConfigError::ParticleCount { requested: 5, min: 100, max: 100_000 }.into();
        assert_eq!(
            e.to_string(),
            "configuration error: particle count 5 outside [100, 100000]"
        );
    }

    #[test]
    fn huge_allocation_reports_exhaustion() {
        let r = try_filled("probe", usize::MAX / 2, 0u64);
        assert!(matches!(
            r,
            Err(SimError::ResourceExhaustion { buffer: "probe", .. })
        ));
    }

    #[test]
    fn try_with_builds_by_index() {
        let v = try_with("idx", 4, |i| i * 10).unwrap();
        assert_eq!(v, vec![0, 10, 20, 30]);
    }
}
