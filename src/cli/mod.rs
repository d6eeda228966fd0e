//! Terminal front end helpers for the `hospital-chat` binary.
//!
//! ```ignore
//! use hospital_chat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Version => println!("{}", version_line()),
//!     CliCommand::Usage(problem) => eprintln!("{}\n{}", problem, USAGE),
//!     CliCommand::Chat(options) => run(options.apply(ChatConfig::from_env())),
//! }
//! ```

pub mod args;
pub mod render;
pub mod version;

pub use args::{parse_args, ChatOptions, CliCommand, USAGE};
pub use render::{print_notice, print_welcome, TranscriptPrinter};
pub use version::{version_line, VERSION};
