use super::*;

/// Animation Control
///
/// Spec: [acTL](https://www.w3.org/TR/png/#acTL-chunk)
#[allow(nonstandard_style)]
pub type acTL = TypedChunk<AnimationControlFields>;

/// The fields of an [`acTL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationControlFields {
  /// Number of frames in the animation.
  pub num_frames: u32,
  /// Number of times to play the animation, 0 means forever.
  pub num_plays: u32,
}
impl ChunkFields for AnimationControlFields {
  const TY: ChunkType = ChunkType::acTL;
  type Patch = AnimationControlPatch;

  #[inline]
  fn from_payload(payload: &[u8]) -> Result<Self, FormatError> {
    let [f0, f1, f2, f3, p0, p1, p2, p3] = fixed_payload::<8>(Self::TY, payload)?;
    Ok(Self {
      num_frames: u32::from_be_bytes([f0, f1, f2, f3]),
      num_plays: u32::from_be_bytes([p0, p1, p2, p3]),
    })
  }

  #[inline]
  fn to_payload(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(&self.num_frames.to_be_bytes());
    out.extend_from_slice(&self.num_plays.to_be_bytes());
    out
  }

  #[inline]
  fn patched(&self, patch: &AnimationControlPatch) -> Self {
    Self {
      num_frames: patch.num_frames.unwrap_or(self.num_frames),
      num_plays: patch.num_plays.unwrap_or(self.num_plays),
    }
  }
}

/// Changes to apply to an [`acTL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct AnimationControlPatch {
  pub num_frames: Option<u32>,
  pub num_plays: Option<u32>,
}
