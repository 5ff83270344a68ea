use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesktopError {
    #[error("Неподдерживаемая платформа: {0}")]
    UnsupportedPlatform(String),

    #[error("Файл конфигурации не найден: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не найдено ни одного монитора")]
    NoMonitors,

    #[error("Ошибка бэкенда ввода: {0}")]
    Backend(String),

    #[error("Ошибка в трассе событий, строка {line}: {message}")]
    Trace { line: usize, message: String },
}

impl DesktopError {
    pub fn unsupported_platform<T>(msg: impl Into<String>) -> Result<T> {
        Err(DesktopError::UnsupportedPlatform(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, DesktopError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! desktop_error {
    (backend, $($arg:tt)*) => {
        $crate::error::DesktopError::Backend(format!($($arg)*))
    };
}
