//! CLI module
//!
//! Command-line interface for scraping a WordPress site.
//!
//! # Commands
//!
//! - `info` - Show site name, description, timezone and namespaces
//! - `list` - List a window of a collection, optionally exporting it
//! - `namespace` - List an arbitrary route under the API root
//! - `get` - Get one item by id
//! - `search` - Search collections for keywords
//! - `shell` - Interactive mode keeping the cache between commands
//!
//! `list all` walks every built-in type. In the shell, `set` changes a
//! session setting and `show [what]` prints them.

mod commands;
pub mod console;
mod display;
mod progress;
mod runner;
mod shell;

pub use commands::{
    Action, Cli, Commands, ExportArgs, Setting, ShellCommand, ShellLine, ShowWhat, What,
    WindowArgs,
};
pub use progress::BarProgress;
pub use runner::{Runner, Session};
pub use shell::split_words;
