// External command execution
// Production executor spawns bash; the mock scripts outcomes for tests

pub mod command;
pub mod mock;

pub use command::{CommandExecutor, CommandOutput, ShellCommand, ShellExecutor};
pub use mock::{MockExecutor, MockResponse};
