use std::fmt;
use std::time::Duration;

/// Точка в координатах всего рабочего стола.
/// На многомониторных конфигурациях координаты могут быть отрицательными.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Смещение колеса мыши. Значим только знак `dy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollDelta {
    pub dx: i64,
    pub dy: i64,
}

impl ScrollDelta {
    #[cfg(test)]
    pub const fn vertical(dy: i64) -> Self {
        Self { dx: 0, dy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move { position: Point },
    Scroll { position: Point, delta: ScrollDelta },
}

/// Событие указателя с меткой времени от начала потока событий
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn moved(position: Point, timestamp: Duration) -> Self {
        Self {
            action: PointerAction::Move { position },
            timestamp,
        }
    }

    pub fn scrolled(position: Point, delta: ScrollDelta, timestamp: Duration) -> Self {
        Self {
            action: PointerAction::Scroll { position, delta },
            timestamp,
        }
    }
}

impl fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            PointerAction::Move { position } => {
                write!(f, "move {} @{}мс", position, self.timestamp.as_millis())
            }
            PointerAction::Scroll { position, delta } => write!(
                f,
                "scroll {} dx={} dy={} @{}мс",
                position,
                delta.dx,
                delta.dy,
                self.timestamp.as_millis()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_action() {
        let at = Duration::from_millis(5);
        assert_eq!(
            PointerEvent::moved(Point::new(-3, 7), at).action,
            PointerAction::Move { position: Point::new(-3, 7) }
        );
        assert_eq!(
            PointerEvent::scrolled(Point::new(960, 10), ScrollDelta::vertical(-1), at).action,
            PointerAction::Scroll {
                position: Point::new(960, 10),
                delta: ScrollDelta { dx: 0, dy: -1 },
            }
        );
    }

    #[test]
    fn test_display() {
        let event = PointerEvent::scrolled(
            Point::new(960, 10),
            ScrollDelta::vertical(-1),
            Duration::from_millis(150),
        );
        assert_eq!(event.to_string(), "scroll (960, 10) dx=0 dy=-1 @150мс");
    }
}
