//! Holds the chunk level tools for APNG data.
//!
//! The general format of a PNG is an 8 byte signature followed by a series of
//! "chunks". Every chunk is framed the same way:
//!
//! * 4 bytes: big-endian length of the payload.
//! * 4 bytes: the type tag, ascii.
//! * `length` bytes: the payload.
//! * 4 bytes: big-endian CRC-32 of the type tag and payload.
//!
//! The APNG extension adds three chunk types on top of plain PNG:
//! * **Animation Control** ([`acTL`]) - the number of frames and how many
//!   times to play them.
//! * **Frame Control** ([`fcTL`]) - the rectangle, delay, and dispose/blend
//!   operations of one frame.
//! * **Frame Data** ([`fdAT`]) - like `IDAT`, but with a sequence number in
//!   front of the image data.
//!
//! ## Reading Chunks
//!
//! [`RawChunkIter`] walks the chunks of a datastream without copying anything.
//! Each [`RawChunk`] can be turned into an owned [`Chunk`], and then sorted
//! into a typed [`ApngChunk`]:
//!
//! ```no_run
//! use apng_edit::png::*;
//! let png: &[u8] = unimplemented!("data from somewhere");
//! for raw in RawChunkIter::new(png) {
//!   let chunk = ApngChunk::try_from(Chunk::from(raw?))?;
//!   println!("{chunk:?}");
//! }
//! # Ok::<(), apng_edit::FormatError>(())
//! ```
//!
//! ## Editing Chunks
//!
//! Chunks are immutable values. To change a field you call `with_fields` with
//! a patch that names only the fields to change, and get back a whole new
//! chunk with a freshly computed CRC. The old chunk is left as it was.
//!
//! ## Parsing Errors
//!
//! Framing problems and fixed-layout chunks of the wrong size are errors. The
//! declared CRC of each chunk is kept, but by default it isn't checked, same as
//! most PNG decoders in the wild.

use core::fmt::{Debug, Write};

use alloc::vec::Vec;

use crate::error::FormatError;
use crate::try_split_off_byte_array;

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod actl;
pub use actl::*;

mod fctl;
pub use fctl::*;

mod fdat;
pub use fdat::*;

mod idat;
pub use idat::*;


/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub fn is_png_signature_correct(bytes: &[u8]) -> bool {
  bytes.get(..PNG_SIGNATURE.len()) == Some(PNG_SIGNATURE.as_slice())
}
