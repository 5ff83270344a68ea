mod dry_run;
#[cfg(feature = "native")]
mod rdev_keystrokes;
mod r#trait;

pub use self::dry_run::DryRunKeystrokes;
pub use self::r#trait::{create_keystroke_backend, KeystrokeBackend};
