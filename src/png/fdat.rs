use super::*;

/// Frame Data
///
/// Spec: [fdAT](https://www.w3.org/TR/png/#fdAT-chunk)
#[allow(nonstandard_style)]
pub type fdAT = TypedChunk<FrameDataFields>;

/// The fields of an [`fdAT`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameDataFields {
  /// Position of this chunk among all `fcTL` and `fdAT` chunks.
  pub sequence_number: u32,
  /// Compressed image data, the same as what an `IDAT` would hold.
  pub frame_data: Vec<u8>,
}
impl ChunkFields for FrameDataFields {
  const TY: ChunkType = ChunkType::fdAT;
  type Patch = FrameDataPatch;

  #[inline]
  fn from_payload(payload: &[u8]) -> Result<Self, FormatError> {
    match try_split_off_byte_array::<4>(payload) {
      Some((seq, frame_data)) => {
        Ok(Self { sequence_number: u32::from_be_bytes(seq), frame_data: frame_data.to_vec() })
      }
      None => {
        Err(FormatError::BadPayloadLength { ty: Self::TY, expected: 4, actual: payload.len() })
      }
    }
  }

  #[inline]
  fn to_payload(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + self.frame_data.len());
    out.extend_from_slice(&self.sequence_number.to_be_bytes());
    out.extend_from_slice(&self.frame_data);
    out
  }

  #[inline]
  fn patched(&self, patch: &FrameDataPatch) -> Self {
    Self {
      sequence_number: patch.sequence_number.unwrap_or(self.sequence_number),
      frame_data: patch.frame_data.clone().unwrap_or_else(|| self.frame_data.clone()),
    }
  }
}
impl Debug for FrameDataFields {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let len = self.frame_data.len();
    f.debug_struct("FrameDataFields")
      .field("sequence_number", &self.sequence_number)
      .field("frame_data", &(&self.frame_data[..len.min(12)], len))
      .finish()
  }
}

/// Changes to apply to an [`fdAT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct FrameDataPatch {
  pub sequence_number: Option<u32>,
  pub frame_data: Option<Vec<u8>>,
}

/// One chunk of a frame's image data.
///
/// The first frame of an animation may use the `IDAT` chunks of the still
/// image as its data, every other frame uses `fdAT` chunks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub enum FrameData {
  /// Image data with no sequence number.
  IDAT(IDAT),
  /// Image data with a sequence number in front.
  fdAT(fdAT),
}
impl FrameData {
  /// The underlying chunk.
  #[inline]
  #[must_use]
  pub fn chunk(&self) -> &Chunk {
    match self {
      Self::IDAT(idat) => idat.chunk(),
      Self::fdAT(fdat) => fdat.chunk(),
    }
  }

  /// The sequence number, if this is an `fdAT`.
  #[inline]
  #[must_use]
  pub fn sequence_number(&self) -> Option<u32> {
    match self {
      Self::IDAT(_) => None,
      Self::fdAT(fdat) => Some(fdat.sequence_number),
    }
  }

  /// The image data, without any sequence number.
  #[inline]
  #[must_use]
  pub fn frame_data(&self) -> &[u8] {
    match self {
      Self::IDAT(idat) => idat.as_bytes(),
      Self::fdAT(fdat) => &fdat.frame_data,
    }
  }
}
