use crate::error::{DesktopError, Result};
use crate::events::{Command, Direction, Key};
use std::fmt;

/// Набор системных сочетаний клавиш для переключения рабочих столов.
/// Выбирается один раз при запуске и передаётся диспетчеру.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutScheme {
    /// Win+Ctrl+←/→, обзор - Win+Tab
    Windows,
    /// Ctrl+←/→, обзор (Mission Control) - Ctrl+↑
    MacOs,
}

impl ShortcutScheme {
    /// Схема для имени ОС в формате `std::env::consts::OS`
    pub fn for_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(ShortcutScheme::Windows),
            "macos" => Ok(ShortcutScheme::MacOs),
            other => DesktopError::unsupported_platform(format!(
                "{} (поддерживаются windows и macos, схему можно задать через --platform)",
                other
            )),
        }
    }

    pub fn detect() -> Result<Self> {
        Self::for_os(std::env::consts::OS)
    }

    /// "auto" определяет схему по текущей ОС
    pub fn resolve(setting: &str) -> Result<Self> {
        match setting {
            "auto" => Self::detect(),
            other => Self::for_os(other),
        }
    }

    /// Аккорд для команды. Клавиши нажимаются в указанном порядке.
    pub fn chord(&self, command: Command) -> &'static [Key] {
        match (self, command) {
            (ShortcutScheme::Windows, Command::SwitchDesktop(Direction::Left)) => {
                &[Key::Meta, Key::Control, Key::LeftArrow]
            }
            (ShortcutScheme::Windows, Command::SwitchDesktop(Direction::Right)) => {
                &[Key::Meta, Key::Control, Key::RightArrow]
            }
            (ShortcutScheme::Windows, Command::ShowOverview) => &[Key::Meta, Key::Tab],
            (ShortcutScheme::MacOs, Command::SwitchDesktop(Direction::Left)) => {
                &[Key::Control, Key::LeftArrow]
            }
            (ShortcutScheme::MacOs, Command::SwitchDesktop(Direction::Right)) => {
                &[Key::Control, Key::RightArrow]
            }
            (ShortcutScheme::MacOs, Command::ShowOverview) => &[Key::Control, Key::UpArrow],
        }
    }
}

impl fmt::Display for ShortcutScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutScheme::Windows => write!(f, "windows"),
            ShortcutScheme::MacOs => write!(f, "macos"),
        }
    }
}
