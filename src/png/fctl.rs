use core::time::Duration;

use super::*;

/// Frame Control
///
/// Spec: [fcTL](https://www.w3.org/TR/png/#fcTL-chunk)
#[allow(nonstandard_style)]
pub type fcTL = TypedChunk<FrameControlFields>;

/// What happens to a frame's rectangle once the frame's delay is over, before
/// the next frame is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DisposeOp {
  /// Leave the canvas as it is.
  #[default]
  None = 0,
  /// Clear the rectangle to fully transparent black.
  Background = 1,
  /// Put the rectangle back the way it was before this frame was drawn.
  Previous = 2,
}
impl TryFrom<u8> for DisposeOp {
  type Error = FormatError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Background,
      2 => Self::Previous,
      _ => return Err(FormatError::InvalidDisposeOp(value)),
    })
  }
}

/// How a frame's pixels combine with what's already on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BlendOp {
  /// Replace the rectangle, alpha included.
  #[default]
  Source = 0,
  /// Alpha blend over the existing pixels.
  Over = 1,
}
impl TryFrom<u8> for BlendOp {
  type Error = FormatError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::Source,
      1 => Self::Over,
      _ => return Err(FormatError::InvalidBlendOp(value)),
    })
  }
}

/// A rectangle of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct Region {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}
impl Region {
  /// If the region fits entirely within a canvas of the given size.
  #[inline]
  #[must_use]
  pub fn fits_within(&self, canvas_width: u32, canvas_height: u32) -> bool {
    let right = u64::from(self.x) + u64::from(self.width);
    let bottom = u64::from(self.y) + u64::from(self.height);
    right <= u64::from(canvas_width) && bottom <= u64::from(canvas_height)
  }
}

/// Any delay shorter than this is treated as [`DEFAULT_FRAME_DELAY`].
pub const MIN_FRAME_DELAY: Duration = Duration::from_millis(11);

/// The delay used for frames whose declared delay is too short to be
/// intentional.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// The fields of an [`fcTL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameControlFields {
  /// Position of this chunk among all `fcTL` and `fdAT` chunks.
  pub sequence_number: u32,
  /// Width of the frame rectangle.
  pub width: u32,
  /// Height of the frame rectangle.
  pub height: u32,
  /// Left edge of the frame rectangle.
  pub x_offset: u32,
  /// Top edge of the frame rectangle.
  pub y_offset: u32,
  /// Delay numerator, in seconds.
  pub delay_num: u16,
  /// Delay denominator, 0 is read as 100.
  pub delay_den: u16,
  /// Cleanup after this frame.
  pub dispose_op: DisposeOp,
  /// How this frame is drawn.
  pub blend_op: BlendOp,
}
impl FrameControlFields {
  /// The frame rectangle.
  #[inline]
  #[must_use]
  pub const fn region(&self) -> Region {
    Region { x: self.x_offset, y: self.y_offset, width: self.width, height: self.height }
  }

  /// How long the frame stays on screen.
  ///
  /// Delays under 11ms come out as 100ms, as browsers do.
  #[inline]
  #[must_use]
  pub fn delay(&self) -> Duration {
    let den = if self.delay_den == 0 { 100 } else { u64::from(self.delay_den) };
    let delay = Duration::from_nanos(u64::from(self.delay_num) * 1_000_000_000 / den);
    if delay < MIN_FRAME_DELAY {
      DEFAULT_FRAME_DELAY
    } else {
      delay
    }
  }
}
impl ChunkFields for FrameControlFields {
  const TY: ChunkType = ChunkType::fcTL;
  type Patch = FrameControlPatch;

  #[inline]
  fn from_payload(payload: &[u8]) -> Result<Self, FormatError> {
    let data = fixed_payload::<26>(Self::TY, payload)?;
    let u32_at = |i: usize| u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let u16_at = |i: usize| u16::from_be_bytes([data[i], data[i + 1]]);
    Ok(Self {
      sequence_number: u32_at(0),
      width: u32_at(4),
      height: u32_at(8),
      x_offset: u32_at(12),
      y_offset: u32_at(16),
      delay_num: u16_at(20),
      delay_den: u16_at(22),
      dispose_op: DisposeOp::try_from(data[24])?,
      blend_op: BlendOp::try_from(data[25])?,
    })
  }

  #[inline]
  fn to_payload(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(26);
    out.extend_from_slice(&self.sequence_number.to_be_bytes());
    out.extend_from_slice(&self.width.to_be_bytes());
    out.extend_from_slice(&self.height.to_be_bytes());
    out.extend_from_slice(&self.x_offset.to_be_bytes());
    out.extend_from_slice(&self.y_offset.to_be_bytes());
    out.extend_from_slice(&self.delay_num.to_be_bytes());
    out.extend_from_slice(&self.delay_den.to_be_bytes());
    out.push(self.dispose_op as u8);
    out.push(self.blend_op as u8);
    out
  }

  #[inline]
  fn patched(&self, patch: &FrameControlPatch) -> Self {
    Self {
      sequence_number: patch.sequence_number.unwrap_or(self.sequence_number),
      width: patch.width.unwrap_or(self.width),
      height: patch.height.unwrap_or(self.height),
      x_offset: patch.x_offset.unwrap_or(self.x_offset),
      y_offset: patch.y_offset.unwrap_or(self.y_offset),
      delay_num: patch.delay_num.unwrap_or(self.delay_num),
      delay_den: patch.delay_den.unwrap_or(self.delay_den),
      dispose_op: patch.dispose_op.unwrap_or(self.dispose_op),
      blend_op: patch.blend_op.unwrap_or(self.blend_op),
    }
  }
}

/// Changes to apply to an [`fcTL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct FrameControlPatch {
  pub sequence_number: Option<u32>,
  pub width: Option<u32>,
  pub height: Option<u32>,
  pub x_offset: Option<u32>,
  pub y_offset: Option<u32>,
  pub delay_num: Option<u16>,
  pub delay_den: Option<u16>,
  pub dispose_op: Option<DisposeOp>,
  pub blend_op: Option<BlendOp>,
}

#[test]
fn test_delay_clamp() {
  let f = |delay_num, delay_den| FrameControlFields { delay_num, delay_den, ..Default::default() };
  assert_eq!(f(1, 100).delay(), Duration::from_millis(100));
  assert_eq!(f(50, 1000).delay(), Duration::from_millis(50));
  assert_eq!(f(0, 0).delay(), Duration::from_millis(100));
  assert_eq!(f(11, 1000).delay(), Duration::from_millis(11));
  assert_eq!(f(3, 0).delay(), Duration::from_millis(30));
  assert_eq!(f(1, 30).delay(), Duration::from_nanos(33_333_333));
}
