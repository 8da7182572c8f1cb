pub mod logging;

pub use logging::{format_duration, tail_text};
