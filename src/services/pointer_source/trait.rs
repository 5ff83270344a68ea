use crate::error::Result;
use crate::events::PointerEvent;
use std::path::Path;
use tokio::sync::mpsc;

/// Trait for pointer event sources that feed the gesture detector
#[async_trait::async_trait]
pub trait PointerSource {
    /// Push events into the channel until the source is exhausted or the receiver is gone
    async fn run(self: Box<Self>, events: mpsc::Sender<PointerEvent>) -> Result<()>;
}

/// Factory function: replay a recorded trace when given, otherwise hook the OS
pub fn create_pointer_source(replay: Option<&Path>) -> Result<Box<dyn PointerSource + Send>> {
    if let Some(path) = replay {
        return Ok(Box::new(super::ReplayPointerSource::from_file(path)?));
    }

    #[cfg(feature = "native")]
    {
        Ok(Box::new(super::rdev_source::RdevPointerSource::new()))
    }

    #[cfg(not(feature = "native"))]
    {
        Err(crate::desktop_error!(
            backend,
            "Сборка без feature \"native\": глобальный хук мыши недоступен. Соберите с --features native или запустите с --replay"
        ))
    }
}
