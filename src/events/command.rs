use std::fmt;

/// Направление переключения рабочего стола
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Прокрутка вниз (`dy < 0`) - вправо, всё остальное - влево
    pub fn from_scroll(dy: i64) -> Self {
        if dy < 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Абстрактная команда детектора жестов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    SwitchDesktop(Direction),
    ShowOverview,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SwitchDesktop(direction) => write!(f, "SwitchDesktop({})", direction),
            Command::ShowOverview => write!(f, "ShowOverview"),
        }
    }
}
