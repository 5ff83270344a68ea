#[cfg(feature = "native")]
pub mod key_to_rdev;
