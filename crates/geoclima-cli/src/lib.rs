//! Library side of the `geoclima-range` command: logging setup and the
//! command logic that does not touch the terminal.

pub mod logging;
pub mod session;
pub mod types;
