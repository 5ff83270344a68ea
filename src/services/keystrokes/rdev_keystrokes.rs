use crate::desktop_error;
use crate::error::Result;
use crate::events::Key;
use crate::mappings::key_to_rdev;
use std::time::Duration;
use tracing::{debug, info};

use super::KeystrokeBackend;

/// Пауза между синтетическими событиями: без неё macOS теряет часть нажатий
const SIMULATE_PAUSE: Duration = Duration::from_millis(20);

/// Инъекция клавиш через `rdev::simulate`
pub struct RdevKeystrokes;

impl RdevKeystrokes {
    pub fn new() -> Self {
        info!("Инициализация RdevKeystrokes");
        Self
    }

    fn send(&self, event_type: rdev::EventType) -> Result<()> {
        rdev::simulate(&event_type)
            .map_err(|e| desktop_error!(backend, "Не удалось отправить {:?}: {:?}", event_type, e))?;
        debug!("Синтетическое событие {:?} отправлено", event_type);
        std::thread::sleep(SIMULATE_PAUSE);
        Ok(())
    }
}

impl KeystrokeBackend for RdevKeystrokes {
    fn press(&self, key: Key) -> Result<()> {
        self.send(rdev::EventType::KeyPress(key_to_rdev::translate(key)))
    }

    fn release(&self, key: Key) -> Result<()> {
        self.send(rdev::EventType::KeyRelease(key_to_rdev::translate(key)))
    }

    fn name(&self) -> &'static str {
        "rdev"
    }
}
