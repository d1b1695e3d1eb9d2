use super::*;

/// Image Data.
///
/// * Image data is stored with Zlib compression applied.
/// * Images can have more than one IDAT chunk. They should all be stored in a
///   row. Multiple chunks are treated as a single Zlib datastream.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IDAT(Chunk);
impl From<Chunk> for IDAT {
  #[inline]
  #[must_use]
  fn from(chunk: Chunk) -> Self {
    debug_assert_eq!(chunk.ty(), ChunkType::IDAT);
    Self(chunk)
  }
}
impl IDAT {
  /// Encodes a new `IDAT` holding the data given.
  #[inline]
  #[must_use]
  pub fn new(data: Vec<u8>) -> Self {
    Self(Chunk::new(ChunkType::IDAT, data))
  }
  /// The image data.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    self.0.payload()
  }
  /// The underlying chunk.
  #[inline]
  #[must_use]
  pub const fn chunk(&self) -> &Chunk {
    &self.0
  }
}
impl Debug for IDAT {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let data = self.as_bytes();
    f.debug_tuple("IDAT").field(&&data[..data.len().min(12)]).field(&data.len()).finish()
  }
}
