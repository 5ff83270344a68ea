use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Клавиши, из которых собираются аккорды переключения рабочих столов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Win на Windows, Cmd на macOS
    Meta,
    Control,
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::Meta => "super",
            Key::Control => "ctrl",
            Key::Tab => "tab",
            Key::LeftArrow => "left",
            Key::RightArrow => "right",
            Key::UpArrow => "up",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Одно синтетическое нажатие или отпускание
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub key: Key,
    pub state: KeyState,
}

impl KeyStroke {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            KeyState::Pressed => write!(f, "+{}", self.key),
            KeyState::Released => write!(f, "-{}", self.key),
        }
    }
}
