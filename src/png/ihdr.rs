use super::*;

/// Image Header
///
/// Spec: [IHDR](https://www.w3.org/TR/png/#11IHDR)
#[allow(nonstandard_style)]
pub type IHDR = TypedChunk<HeaderFields>;

/// The fields of an [`IHDR`].
///
/// None of the pixel format values are checked against each other, they're
/// kept exactly as written so the image decoder can judge them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderFields {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: u8,
  /// always 0 in valid files
  pub compression_method: u8,
  /// always 0 in valid files
  pub filter_method: u8,
  /// 0 (none) or 1 (Adam7)
  pub interlace_method: u8,
}
impl ChunkFields for HeaderFields {
  const TY: ChunkType = ChunkType::IHDR;
  type Patch = HeaderPatch;

  #[inline]
  fn from_payload(payload: &[u8]) -> Result<Self, FormatError> {
    let [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =
      fixed_payload::<13>(Self::TY, payload)?;
    Ok(Self {
      width: u32::from_be_bytes([w0, w1, w2, w3]),
      height: u32::from_be_bytes([h0, h1, h2, h3]),
      bit_depth,
      color_type,
      compression_method,
      filter_method,
      interlace_method,
    })
  }

  #[inline]
  fn to_payload(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(13);
    out.extend_from_slice(&self.width.to_be_bytes());
    out.extend_from_slice(&self.height.to_be_bytes());
    out.extend_from_slice(&[
      self.bit_depth,
      self.color_type,
      self.compression_method,
      self.filter_method,
      self.interlace_method,
    ]);
    out
  }

  #[inline]
  fn patched(&self, patch: &HeaderPatch) -> Self {
    Self {
      width: patch.width.unwrap_or(self.width),
      height: patch.height.unwrap_or(self.height),
      bit_depth: patch.bit_depth.unwrap_or(self.bit_depth),
      color_type: patch.color_type.unwrap_or(self.color_type),
      compression_method: patch.compression_method.unwrap_or(self.compression_method),
      filter_method: patch.filter_method.unwrap_or(self.filter_method),
      interlace_method: patch.interlace_method.unwrap_or(self.interlace_method),
    }
  }
}

/// Changes to apply to an [`IHDR`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct HeaderPatch {
  pub width: Option<u32>,
  pub height: Option<u32>,
  pub bit_depth: Option<u8>,
  pub color_type: Option<u8>,
  pub compression_method: Option<u8>,
  pub filter_method: Option<u8>,
  pub interlace_method: Option<u8>,
}
