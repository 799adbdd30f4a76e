//! Game configuration: board size, gravity curve and input debounce intervals.

use std::time::Duration;
use thiserror::Error;

/// Smallest side that still fits an I piece in either orientation.
pub const MIN_BOARD_SIDE: usize = 4;
pub const MAX_BOARD_SIDE: usize = 64;

/// Gravity interval curve: starts at `initial`, shrinks by `step` per level, never below `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCurve {
    pub initial: Duration,
    pub step: Duration,
    pub floor: Duration,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(600),
            step: Duration::from_millis(50),
            floor: Duration::from_millis(200),
        }
    }
}

impl SpeedCurve {
    /// Interval after one more level-up from `current`.
    pub fn next(&self, current: Duration) -> Duration {
        current.saturating_sub(self.step).max(self.floor)
    }
}

/// Minimum time between two accepted commands of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDelays {
    /// Shared by left and right.
    pub shift: Duration,
    pub rotate: Duration,
    pub soft_drop: Duration,
    pub hard_drop: Duration,
    /// Used for both hold and swap-hold.
    pub hold: Duration,
}

impl Default for InputDelays {
    fn default() -> Self {
        Self {
            shift: Duration::from_millis(100),
            rotate: Duration::from_millis(500),
            soft_drop: Duration::from_millis(300),
            hard_drop: Duration::from_millis(500),
            hold: Duration::from_millis(300),
        }
    }
}

/// Everything the engine needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub speed: SpeedCurve,
    pub delays: InputDelays,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 17,
            speed: SpeedCurve::default(),
            delays: InputDelays::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "board {axis} {value} out of range ({min}..={max})",
        min = MIN_BOARD_SIDE,
        max = MAX_BOARD_SIDE
    )]
    BoardSize { axis: &'static str, value: usize },
    #[error("minimum drop interval must be greater than zero")]
    ZeroFloor,
    #[error("minimum drop interval {floor:?} exceeds initial interval {initial:?}")]
    FloorAboveInitial { floor: Duration, initial: Duration },
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_BOARD_SIDE..=MAX_BOARD_SIDE).contains(&value) {
                return Err(ConfigError::BoardSize { axis, value });
            }
        }
        if self.speed.floor.is_zero() {
            return Err(ConfigError::ZeroFloor);
        }
        if self.speed.floor > self.speed.initial {
            return Err(ConfigError::FloorAboveInitial {
                floor: self.speed.floor,
                initial: self.speed.initial,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_narrow_board() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardSize {
                axis: "width",
                value: 3
            })
        );
    }

    #[test]
    fn test_rejects_huge_board() {
        let config = GameConfig {
            height: 65,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardSize { axis: "height", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_floor() {
        let mut config = GameConfig::default();
        config.speed.floor = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFloor));
        config.speed.floor = Duration::from_millis(700);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FloorAboveInitial { .. })
        ));
    }

    #[test]
    fn test_speed_curve_floors() {
        let curve = SpeedCurve::default();
        assert_eq!(curve.next(Duration::from_millis(600)), Duration::from_millis(550));
        assert_eq!(curve.next(Duration::from_millis(220)), Duration::from_millis(200));
        assert_eq!(curve.next(Duration::from_millis(200)), Duration::from_millis(200));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::BoardSize {
            axis: "width",
            value: 2,
        };
        assert_eq!(err.to_string(), "board width 2 out of range (4..=64)");
    }
}
