//! Each subcommand lives in its own file, keeping the match in main thin.

mod check;
mod demo;
mod pipe;

pub use check::cmd_check;
pub use demo::cmd_demo;
pub use pipe::cmd_pipe;
