use crate::error::Result;
use crate::events::Command;
use crate::services::keystrokes::KeystrokeBackend;
use crate::services::ShortcutScheme;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Превращает абстрактные команды в аккорды выбранной схемы
pub struct ShortcutDispatcher {
    scheme: ShortcutScheme,
    backend: Arc<dyn KeystrokeBackend>,
}

impl ShortcutDispatcher {
    pub fn new(scheme: ShortcutScheme, backend: Arc<dyn KeystrokeBackend>) -> Self {
        info!(
            "Инициализация ShortcutDispatcher (схема: {}, бэкенд: {})",
            scheme,
            backend.name()
        );
        Self { scheme, backend }
    }

    /// Нажать клавиши аккорда по порядку и отпустить в обратном.
    /// Если нажатие не удалось, уже нажатые клавиши отпускаются.
    pub fn dispatch(&self, command: Command) -> Result<()> {
        let chord = self.scheme.chord(command);
        info!("Команда {} → {}", command, format_chord(chord));

        for (pressed, key) in chord.iter().enumerate() {
            if let Err(e) = self.backend.press(*key) {
                for held in chord[..pressed].iter().rev() {
                    if let Err(release_err) = self.backend.release(*held) {
                        warn!("Не удалось отпустить {}: {}", held, release_err);
                    }
                }
                return Err(e);
            }
        }

        // Отпускаем все клавиши, даже если одна из них не отпустилась
        let mut first_error = None;
        for key in chord.iter().rev() {
            if let Err(e) = self.backend.release(*key) {
                warn!("Не удалось отпустить {}: {}", key, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Исполняет команды по одной в порядке поступления. Инъекция клавиш
    /// блокирующая, поэтому каждая команда уходит в `spawn_blocking`.
    /// Ошибка одной команды логируется и не останавливает цикл.
    pub async fn run(self: Arc<Self>, mut commands: mpsc::Receiver<Command>) -> u64 {
        info!("ShortcutDispatcher запущен");

        let mut dispatched = 0u64;
        while let Some(command) = commands.recv().await {
            let dispatcher = Arc::clone(&self);
            match tokio::task::spawn_blocking(move || dispatcher.dispatch(command)).await {
                Ok(Ok(())) => dispatched += 1,
                Ok(Err(e)) => error!("Не удалось выполнить {}: {}", command, e),
                Err(e) => error!("Задача отправки {} завершилась аварийно: {}", command, e),
            }
        }

        info!("ShortcutDispatcher остановлен, выполнено команд: {}", dispatched);
        dispatched
    }
}

fn format_chord(chord: &[crate::events::Key]) -> String {
    chord
        .iter()
        .map(|key| key.name())
        .collect::<Vec<_>>()
        .join("+")
}
