//! Small helpers shared across the crate.

mod panic;

pub use panic::catch_panic;
