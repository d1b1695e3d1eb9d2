#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for editing Animated PNG (APNG) files.
//!
//! * [`png`] reads and writes the individual chunks of a PNG datastream, and
//!   gives typed, copy-on-write views of the chunks APNG cares about.
//! * [`Apng`] holds a whole file: the header, the animation control, the
//!   frames, and every other chunk, which is carried along byte for byte.
//!   Edits go through [`Apng::set_play_count`] and [`Apng::set_frame_fields`],
//!   and [`Apng::to_bytes`] writes the file back out.
//! * [`composite_step`] draws one frame onto a canvas following the APNG
//!   dispose and blend rules, and [`Player`] schedules those steps in time.
//!
//! Turning a frame's compressed image data into pixels is left to a
//! [`FrameDecoder`] that you provide. Each frame is given to the decoder as a
//! complete single image PNG, built by [`Apng::frame_png`].

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod parser_helpers;
pub(crate) use parser_helpers::*;

mod error;
pub use error::*;

pub mod png;

mod bitmap;
pub use bitmap::*;

mod apng;
pub use apng::*;

mod decode;
pub use decode::*;

mod compose;
pub use compose::*;

mod player;
pub use player::*;
