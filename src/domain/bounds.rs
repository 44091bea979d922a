use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Axis-aligned simulation domain
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl DomainBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The normalized [-1, 1]² domain
    pub fn unit() -> Self {
        Self {
            min: Vec2::splat(-1.0),
            max: Vec2::splat(1.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if !finite || self.max.x <= self.min.x || self.max.y <= self.min.y {
            return Err(ConfigError::DomainBounds {
                min: self.min.to_array(),
                max: self.max.to_array(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Map a domain position to [0, 1]² (unclamped)
    #[inline]
    pub fn to_unit(&self, p: Vec2) -> Vec2 {
        (p - self.min) / self.extent()
    }

    /// Map [0, 1]² back into the domain
    #[inline]
    pub fn from_unit(&self, uv: Vec2) -> Vec2 {
        self.min + uv * self.extent()
    }
}

/// What happens when a particle leaves the domain
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Mirror the position back inside and flip the normal velocity,
    /// damped by restitution
    #[default]
    Reflect,
    /// Re-enter from the opposite edge with velocity unchanged
    Wrap,
}
