//! The whole-file view of an APNG.

use core::time::Duration;

use alloc::vec::Vec;

use crate::error::{FormatError, MutationError};
use crate::png::*;

mod frame;
pub use frame::*;

mod container;
pub use container::*;
