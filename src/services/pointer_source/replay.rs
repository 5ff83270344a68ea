use crate::error::{DesktopError, Result};
use crate::events::{Point, PointerEvent, ScrollDelta};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use super::PointerSource;

/// Строка трассы:
/// `{"at_ms": 150, "kind": "scroll", "x": 960, "y": 10, "dy": -1}`
#[derive(Debug, Deserialize)]
struct TraceRecord {
    at_ms: u64,
    kind: TraceKind,
    x: i32,
    y: i32,
    #[serde(default)]
    dx: i64,
    #[serde(default)]
    dy: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TraceKind {
    Move,
    Scroll,
}

impl TraceRecord {
    fn into_event(self) -> PointerEvent {
        let position = Point::new(self.x, self.y);
        let at = Duration::from_millis(self.at_ms);
        match self.kind {
            TraceKind::Move => PointerEvent::moved(position, at),
            TraceKind::Scroll => PointerEvent::scrolled(
                position,
                ScrollDelta {
                    dx: self.dx,
                    dy: self.dy,
                },
                at,
            ),
        }
    }
}

/// Разбор трассы в формате JSON lines. Пустые строки и строки с `#` пропускаются,
/// метки времени не должны убывать.
pub fn parse_trace(content: &str) -> Result<Vec<PointerEvent>> {
    let mut events: Vec<PointerEvent> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: TraceRecord = serde_json::from_str(line).map_err(|e| DesktopError::Trace {
            line: index + 1,
            message: e.to_string(),
        })?;
        let event = record.into_event();

        if let Some(previous) = events.last() {
            if event.timestamp < previous.timestamp {
                return Err(DesktopError::Trace {
                    line: index + 1,
                    message: format!(
                        "метка времени {}мс меньше предыдущей {}мс",
                        event.timestamp.as_millis(),
                        previous.timestamp.as_millis()
                    ),
                });
            }
        }

        events.push(event);
    }

    Ok(events)
}

/// Воспроизводит записанную трассу в реальном времени
pub struct ReplayPointerSource {
    path: PathBuf,
    events: Vec<PointerEvent>,
}

impl ReplayPointerSource {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let events = parse_trace(&content)?;
        info!("Трасса {} загружена: {} событий", path.display(), events.len());

        Ok(Self::new(path.to_path_buf(), events))
    }

    pub fn new(path: PathBuf, events: Vec<PointerEvent>) -> Self {
        Self { path, events }
    }
}

#[async_trait::async_trait]
impl PointerSource for ReplayPointerSource {
    async fn run(self: Box<Self>, events: mpsc::Sender<PointerEvent>) -> Result<()> {
        info!("Воспроизведение трассы {}", self.path.display());

        let origin = self.events.first().map(|e| e.timestamp).unwrap_or_default();
        let start = Instant::now();

        for event in self.events {
            sleep_until(start + event.timestamp.saturating_sub(origin)).await;
            if events.send(event).await.is_err() {
                warn!("Получатель событий закрыт, воспроизведение прервано");
                return Ok(());
            }
        }

        info!("Трасса {} воспроизведена полностью", self.path.display());
        Ok(())
    }
}
