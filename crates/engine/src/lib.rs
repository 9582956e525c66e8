//! # Cmdrest Engine
//!
//! The engine turns parameter tables into command lines and runs them.
//!
//! ## Usage
//!
//! ```rust
//! use cmdrest_engine::synthesize;
//! use cmdrest_registry::{Overrides, extract};
//! use cmdrest_types::CommandDescriptor;
//!
//! let descriptor = CommandDescriptor::new("ls").flag("Long", "l", true).positional("Path", 0, ".");
//! let table = extract(&descriptor).expect("extract");
//! let command_line = synthesize(&table, &Overrides::from_query("Long=false&Path=/tmp"));
//! assert_eq!(command_line, "ls /tmp");
//! ```
//!
//! The resulting line is handed to a [`ProcessInvoker`]; [`SystemInvoker`]
//! spawns it and collects stdout and stderr line by line.
//!
//! ## Architecture
//!
//! - **`synthesize`**: merges overrides into a working copy and composes the command line
//! - **`lexing`**: splits a command line into an argument vector
//! - **`invoker`**: the `ProcessInvoker` seam and its process-spawning implementation

pub mod invoker;
pub mod lexing;
pub mod synthesize;

pub use invoker::{InvocationError, NoopInvoker, ProcessInvoker, ProcessOutput, SystemInvoker};
pub use synthesize::{compose, synthesize};
