use crate::error::Result;
use crate::events::Key;
use std::sync::Arc;

/// Trait for backends that synthesize key presses and releases
pub trait KeystrokeBackend: Send + Sync {
    /// Press and hold the key
    fn press(&self, key: Key) -> Result<()>;

    /// Release a previously pressed key
    fn release(&self, key: Key) -> Result<()>;

    /// Human-readable backend name for logs
    fn name(&self) -> &'static str;
}

/// Factory function to create an appropriate keystroke backend based on the dry_run flag
pub fn create_keystroke_backend(dry_run: bool) -> Result<Arc<dyn KeystrokeBackend>> {
    if dry_run {
        return Ok(Arc::new(super::DryRunKeystrokes::new()));
    }

    #[cfg(feature = "native")]
    {
        Ok(Arc::new(super::rdev_keystrokes::RdevKeystrokes::new()))
    }

    #[cfg(not(feature = "native"))]
    {
        Err(crate::desktop_error!(
            backend,
            "Сборка без feature \"native\": инъекция клавиш недоступна. Соберите с --features native или запустите с --dry-run"
        ))
    }
}
