//! Источники событий указателя: глобальный хук ОС или записанная трасса.
//! Источник только доставляет события в канал, решения принимает GestureDetector.

#[cfg(feature = "native")]
mod rdev_source;
mod replay;
mod r#trait;

pub use self::replay::ReplayPointerSource;
pub use self::r#trait::{create_pointer_source, PointerSource};
