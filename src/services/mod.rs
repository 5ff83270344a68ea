pub mod dispatcher;
pub mod gesture_detector;
pub mod keystrokes;
pub mod monitors;
pub mod pointer_source;
pub mod shortcut_scheme;

pub use dispatcher::ShortcutDispatcher;
pub use gesture_detector::{DetectorSettings, GestureDetector};
pub use keystrokes::create_keystroke_backend;
pub use monitors::resolve_monitors;
pub use pointer_source::create_pointer_source;
pub use shortcut_scheme::ShortcutScheme;
