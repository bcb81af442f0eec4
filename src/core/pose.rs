//! 2D pose type for the agent position reported by localization.

use serde::{Deserialize, Deserializer, Serialize};
use std::f32::consts::PI;

use super::point::WorldPoint;

/// A 2D pose: position in meters plus heading.
///
/// The planner only consumes the position; heading is carried so that a
/// localization message can be stored without loss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading angle in radians [-π, π), CCW positive from X-axis.
    #[serde(default, deserialize_with = "deserialize_angle")]
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose (theta is normalized to [-π, π]).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Get the position as a WorldPoint.
    #[inline]
    pub fn position(self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

impl From<WorldPoint> for Pose2D {
    fn from(point: WorldPoint) -> Self {
        Self::new(point.x, point.y, 0.0)
    }
}

/// Normalize angle to [-π, π). Non-finite angles map to 0.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = (angle + PI).rem_euclid(2.0 * PI) - PI;
    // rem_euclid may round up to exactly 2π
    if a >= PI { a - 2.0 * PI } else { a }
}

fn deserialize_angle<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(normalize_angle)
}
