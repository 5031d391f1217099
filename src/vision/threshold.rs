use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CaptureRegion, SignalMethod};

/// С какой стороны порога сигнал означает препятствие
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub value: u64,
    pub direction: Direction,
}

impl Threshold {
    pub fn new(value: u64, direction: Direction) -> Self {
        Self { value, direction }
    }

    /// Порог по настройкам; недостающее берётся из базовой линии метода
    pub fn resolve(
        method: SignalMethod,
        region: &CaptureRegion,
        value: Option<u64>,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            value: value.unwrap_or_else(|| method.baseline(region)),
            direction: direction.unwrap_or_else(|| method.natural_direction()),
        }
    }

    pub fn crossed(&self, signal: u64) -> bool {
        match self.direction {
            Direction::Below => signal < self.value,
            Direction::Above => signal > self.value,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Below => write!(f, "< {}", self.value),
            Direction::Above => write!(f, "> {}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_direction() {
        let threshold = Threshold::new(100, Direction::Below);
        assert!(threshold.crossed(99));
        assert!(!threshold.crossed(100));
        assert!(!threshold.crossed(101));
    }

    #[test]
    fn test_above_direction() {
        let threshold = Threshold::new(100, Direction::Above);
        assert!(threshold.crossed(101));
        assert!(!threshold.crossed(100));
        assert!(!threshold.crossed(0));
    }

    #[test]
    fn test_resolve_defaults_from_baseline() {
        let region = CaptureRegion::new(0, 0, 10, 2);

        let sum = Threshold::resolve(SignalMethod::PixelSum, &region, None, None);
        assert_eq!(sum, Threshold::new(10 * 2 * 255, Direction::Below));
        assert!(!sum.crossed(10 * 2 * 255));
        assert!(sum.crossed(10 * 2 * 255 - 1));

        let edges = Threshold::resolve(SignalMethod::Laplacian, &region, None, None);
        assert_eq!(edges, Threshold::new(0, Direction::Above));
        assert!(!edges.crossed(0));
        assert!(edges.crossed(1));
    }

    #[test]
    fn test_resolve_prefers_configured_values() {
        let region = CaptureRegion::new(0, 0, 10, 2);
        let threshold =
            Threshold::resolve(SignalMethod::Laplacian, &region, Some(8), Some(Direction::Below));
        assert_eq!(threshold, Threshold::new(8, Direction::Below));
    }
}
