pub mod command;
pub mod keyboard;
pub mod pointer;

pub use command::{Command, Direction};
pub use keyboard::{Key, KeyStroke};
pub use pointer::{Point, PointerAction, PointerEvent, ScrollDelta};
