use alloc::string::String;
use thiserror::Error;

use crate::png::ChunkType;

/// The bytes given aren't a usable APNG datastream.
///
/// Parsing stops at the first of these, and no partial container is ever
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FormatError {
  /// The first 8 bytes aren't the PNG signature.
  #[error("missing PNG signature")]
  BadSignature,

  /// A chunk's framing (length, type, declared payload, or CRC) runs past the
  /// end of the buffer.
  #[error("chunk at offset {offset} needs {needed} bytes but only {available} remain")]
  Truncated {
    /// Offset of the chunk's length field.
    offset: usize,
    /// Bytes the chunk claims to need.
    needed: usize,
    /// Bytes left in the buffer from `offset`.
    available: usize,
  },

  /// There were no chunks after the signature.
  #[error("no chunks present")]
  NoChunksPresent,

  /// The first chunk wasn't `IHDR`.
  #[error("first chunk is {0:?}, not IHDR")]
  FirstChunkNotIHDR(ChunkType),

  /// A second `IHDR` was found.
  #[error("duplicate IHDR chunk")]
  DuplicateHeader,

  /// A second `acTL` was found.
  #[error("duplicate acTL chunk")]
  DuplicateAnimationControl,

  /// Frames were present but no `acTL` declared the animation.
  #[error("fcTL present without acTL")]
  MissingAnimationControl,

  /// `acTL` was present but no frame followed.
  #[error("acTL present without any fcTL")]
  AnimationControlWithoutFrames,

  /// An `fdAT` came before any `fcTL`.
  #[error("fdAT chunk before any fcTL")]
  FrameDataWithoutControl,

  /// A fixed-layout chunk had the wrong payload length.
  #[error("{ty:?} payload is {actual} bytes, expected {expected}")]
  BadPayloadLength {
    /// The chunk type.
    ty: ChunkType,
    /// Required length (minimum length for `fdAT`).
    expected: usize,
    /// Actual length.
    actual: usize,
  },

  /// `dispose_op` outside `0..=2`.
  #[error("invalid dispose op {0}")]
  InvalidDisposeOp(u8),

  /// `blend_op` outside `0..=1`.
  #[error("invalid blend op {0}")]
  InvalidBlendOp(u8),

  /// Only reported when [`ParseOptions::verify_crc`](crate::ParseOptions) is
  /// enabled.
  #[error("{ty:?} CRC mismatch: declared {declared:#010x}, actual {actual:#010x}")]
  CrcMismatch {
    /// The chunk type.
    ty: ChunkType,
    /// CRC stored in the file.
    declared: u32,
    /// CRC computed over type and payload.
    actual: u32,
  },

  /// The `IHDR` canvas has more pixels than
  /// [`ParseOptions::max_canvas_pixels`](crate::ParseOptions) allows.
  #[error("canvas {width}x{height} exceeds the limit of {limit} pixels")]
  CanvasTooLarge {
    /// Canvas width.
    width: u32,
    /// Canvas height.
    height: u32,
    /// The limit in force.
    limit: u64,
  },
}

/// The frame decode collaborator couldn't produce a raster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
  /// The decoder rejected the image.
  #[error("frame image decode failed: {0}")]
  Failed(String),

  /// The decoder produced a raster that doesn't match the frame's size.
  #[error("decoded raster is {actual_width}x{actual_height}, expected {width}x{height}")]
  DimensionMismatch {
    /// Frame width from `fcTL`.
    width: u32,
    /// Frame height from `fcTL`.
    height: u32,
    /// Width of the raster the decoder produced.
    actual_width: u32,
    /// Height of the raster the decoder produced.
    actual_height: u32,
  },

  /// The raster's pixel buffer doesn't hold `width * height` pixels.
  #[error("decoded raster has {actual} pixels, expected {expected}")]
  BufferSizeMismatch {
    /// `width * height` of the raster.
    expected: usize,
    /// Length of its pixel buffer.
    actual: usize,
  },
}

/// An edit couldn't be applied. The container is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MutationError {
  /// A frame index is out of bounds.
  #[error("frame {index} out of bounds (total: {total})")]
  FrameOutOfBounds {
    /// The requested frame index.
    index: usize,
    /// The number of frames.
    total: usize,
  },

  /// The container has no `acTL` to update.
  #[error("the image is not animated")]
  NotAnimated,

  /// The frame rectangle would be empty or leave the canvas.
  #[error(
    "frame at ({x}, {y}) size {width}x{height} exceeds canvas {canvas_width}x{canvas_height}"
  )]
  FrameOutsideCanvas {
    /// Frame x offset.
    x: u32,
    /// Frame y offset.
    y: u32,
    /// Frame width.
    width: u32,
    /// Frame height.
    height: u32,
    /// Canvas width.
    canvas_width: u32,
    /// Canvas height.
    canvas_height: u32,
  },
}

/// An error from the `apng-edit` crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApngError {
  /// Parsing failed.
  #[error(transparent)]
  Format(#[from] FormatError),

  /// A frame's raster couldn't be decoded.
  #[error("frame {index}: {source}")]
  Decode {
    /// Index of the frame that failed.
    index: usize,
    /// What the decoder reported.
    source: DecodeError,
  },

  /// An edit was rejected.
  #[error(transparent)]
  Mutation(#[from] MutationError),
}
