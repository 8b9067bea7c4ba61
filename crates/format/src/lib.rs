//! The diff-dd image wire format: the v2 codec this tool reads and writes,
//! plus a standalone v1 legacy reader kept for compatibility testing.

mod error;
pub mod v1;
mod v2;

pub use error::{FormatError, FormatResult};
pub use v2::{Reader, Writer};
