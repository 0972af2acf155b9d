//! Trion - rotating file logging and validated console input
//!
//! Two small facilities for applications that want plain-text logs and simple
//! interactive prompts without pulling in a full logging framework:
//!
//! - [`RotatingFileLogger`]: leveled entries appended to one active file, rotated
//!   into a bounded chain of numbered backups once the file grows too large.
//! - [`Console`]: prompted reads of primitive values that re-prompt until the
//!   input parses, plus unformatted writes.
//!
//! Failures inside the logger surface only on the diagnostic channel installed
//! by [`init_diagnostics`]; logging never returns an error to the caller.

pub mod config;
pub mod console;
pub mod diagnostics;
pub mod level;
pub mod rotating_file_logger;

// Re-export the main types for easy access
pub use config::{Config, ConsoleMessages, LoggerConfig};
pub use console::{Console, ConsoleError};
pub use diagnostics::init_diagnostics;
pub use level::Level;
pub use rotating_file_logger::{LogFileInfo, RotatingFileLogger, RotatingFileLoggerBuilder};
