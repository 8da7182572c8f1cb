pub mod runner_invocation;

pub use runner_invocation::{ItemRunner, DEFAULT_DIAGNOSTIC_TAIL};
