use crate::debug_if_enabled;
use crate::desktop_error;
use crate::error::Result;
use crate::events::{Point, PointerEvent, ScrollDelta};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tracing::{error, info};

use super::PointerSource;

/// Глобальный хук мыши через `rdev::listen`.
///
/// `rdev::listen` блокирует поток навсегда, поэтому он живёт в отдельном
/// потоке ОС и отдаёт события в канал через `try_send`. Если детектор не
/// успевает, событие теряется: пропущенная прокрутка просто не даёт команды.
pub struct RdevPointerSource;

impl RdevPointerSource {
    pub fn new() -> Self {
        info!("Инициализация RdevPointerSource");
        Self
    }
}

/// Колесо в rdev не несёт координат, поэтому берём последнюю позицию курсора.
/// До первого движения прокрутки игнорируются.
fn translate(
    event_type: &rdev::EventType,
    last_position: &mut Option<Point>,
    at: Duration,
) -> Option<PointerEvent> {
    match event_type {
        rdev::EventType::MouseMove { x, y } => {
            let position = Point::new(x.round() as i32, y.round() as i32);
            *last_position = Some(position);
            Some(PointerEvent::moved(position, at))
        }
        rdev::EventType::Wheel { delta_x, delta_y } => last_position.map(|position| {
            PointerEvent::scrolled(
                position,
                ScrollDelta {
                    dx: *delta_x,
                    dy: *delta_y,
                },
                at,
            )
        }),
        _ => None,
    }
}

#[async_trait::async_trait]
impl PointerSource for RdevPointerSource {
    async fn run(self: Box<Self>, events: mpsc::Sender<PointerEvent>) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("rdev-listener".to_string())
            .spawn(move || {
                let origin = Instant::now();
                let mut last_position: Option<Point> = None;

                info!("rdev: глобальный хук мыши устанавливается");
                let result = rdev::listen(move |event| {
                    let Some(pointer_event) =
                        translate(&event.event_type, &mut last_position, origin.elapsed())
                    else {
                        return;
                    };

                    match events.try_send(pointer_event) {
                        Ok(()) => {}
                        Err(TrySendError::Full(dropped)) => {
                            debug_if_enabled!("Канал событий переполнен, пропущено: {}", dropped);
                        }
                        Err(TrySendError::Closed(_)) => {}
                    }
                });

                if let Err(e) = &result {
                    error!("rdev::listen завершился с ошибкой: {:?}", e);
                }
                let _ = done_tx.send(result.map_err(|e| format!("{:?}", e)));
            })?;

        match done_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(desktop_error!(backend, "rdev::listen: {}", e)),
            Err(_) => Err(desktop_error!(backend, "Поток rdev-listener завершился аварийно")),
        }
    }
}
