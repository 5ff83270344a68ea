use crate::error::Result;
use crate::events::{Key, KeyStroke};
use parking_lot::Mutex;
use tracing::info;

use super::KeystrokeBackend;

/// Бэкенд без реальных действий: логирует и запоминает нажатия
#[derive(Debug, Default)]
pub struct DryRunKeystrokes {
    history: Mutex<Vec<KeyStroke>>,
}

impl DryRunKeystrokes {
    pub fn new() -> Self {
        info!("Инициализация DryRunKeystrokes");
        Self::default()
    }

    /// Все нажатия и отпускания в порядке отправки
    #[cfg(test)]
    pub fn history(&self) -> Vec<KeyStroke> {
        self.history.lock().clone()
    }

    fn record(&self, stroke: KeyStroke) {
        info!("[DRY RUN] Клавиша: {}", stroke);
        self.history.lock().push(stroke);
    }
}

impl KeystrokeBackend for DryRunKeystrokes {
    fn press(&self, key: Key) -> Result<()> {
        self.record(KeyStroke::press(key));
        Ok(())
    }

    fn release(&self, key: Key) -> Result<()> {
        self.record(KeyStroke::release(key));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_order() {
        let backend = DryRunKeystrokes::new();
        backend.press(Key::Control).unwrap();
        backend.press(Key::UpArrow).unwrap();
        backend.release(Key::UpArrow).unwrap();
        backend.release(Key::Control).unwrap();

        assert_eq!(
            backend.history(),
            vec![
                KeyStroke::press(Key::Control),
                KeyStroke::press(Key::UpArrow),
                KeyStroke::release(Key::UpArrow),
                KeyStroke::release(Key::Control),
            ]
        );
    }
}
