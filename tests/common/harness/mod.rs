//! Test harness for CLI integration tests.
//!
//! Provides isolated test environments with a temporary database and
//! CLI assertion helpers using `assert_cmd`.

mod command;
mod env;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::QuillCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
