pub mod projection;

pub use projection::{exclude, pick};
