//! Common functionality shared by the Beacon crates.
#![warn(missing_docs)]

mod time;
mod utils;

pub use crate::time::*;
pub use crate::utils::*;
