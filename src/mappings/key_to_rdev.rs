//! Трансляция клавиш аккордов в коды `rdev`

use crate::events::Key;

pub fn translate(key: Key) -> rdev::Key {
    match key {
        Key::Meta => rdev::Key::MetaLeft,
        Key::Control => rdev::Key::ControlLeft,
        Key::Tab => rdev::Key::Tab,
        Key::LeftArrow => rdev::Key::LeftArrow,
        Key::RightArrow => rdev::Key::RightArrow,
        Key::UpArrow => rdev::Key::UpArrow,
    }
}
