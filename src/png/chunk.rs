use super::*;

/// The decoded fields of a chunk type with a known payload layout.
pub trait ChunkFields: Sized + Clone + PartialEq {
  /// The tag of chunks holding these fields.
  const TY: ChunkType;

  /// A partial set of fields, each `None` field keeps its current value.
  type Patch;

  /// Parses the payload.
  fn from_payload(payload: &[u8]) -> Result<Self, FormatError>;

  /// Writes the fields back out in the payload layout.
  fn to_payload(&self) -> Vec<u8>;

  /// Merges the patch over these fields.
  #[must_use]
  fn patched(&self, patch: &Self::Patch) -> Self;
}

/// A chunk along with its decoded fields.
///
/// The fields and the chunk bytes always agree: the only ways to make one of
/// these are parsing a chunk or encoding a set of fields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypedChunk<F> {
  chunk: Chunk,
  fields: F,
}
impl<F: ChunkFields> TypedChunk<F> {
  /// Encodes a new chunk holding these fields.
  #[inline]
  #[must_use]
  pub fn new(fields: F) -> Self {
    let chunk = Chunk::new(F::TY, fields.to_payload());
    Self { chunk, fields }
  }

  /// Parses the fields of a chunk, which must have the right type.
  pub(crate) fn decode(chunk: Chunk) -> Result<Self, FormatError> {
    debug_assert_eq!(chunk.ty(), F::TY);
    let fields = F::from_payload(chunk.payload())?;
    Ok(Self { chunk, fields })
  }

  /// The decoded fields.
  #[inline]
  #[must_use]
  pub const fn fields(&self) -> &F {
    &self.fields
  }

  /// The underlying chunk.
  #[inline]
  #[must_use]
  pub const fn chunk(&self) -> &Chunk {
    &self.chunk
  }

  /// Builds a new chunk with the patch merged over the current fields.
  ///
  /// The payload is fully re-encoded and the CRC recomputed. `self` isn't
  /// changed.
  #[inline]
  #[must_use]
  pub fn with_fields(&self, patch: &F::Patch) -> Self {
    Self::new(self.fields.patched(patch))
  }
}
impl<F> core::ops::Deref for TypedChunk<F> {
  type Target = F;
  #[inline]
  fn deref(&self) -> &F {
    &self.fields
  }
}
impl<F: Debug> Debug for TypedChunk<F> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(&self.fields, f)
  }
}

/// A chunk sorted by what it means to an APNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApngChunk {
  /// Image Header
  Header(IHDR),
  /// Animation Control
  AnimationControl(acTL),
  /// Frame Control
  FrameControl(fcTL),
  /// Image data (`IDAT` or `fdAT`)
  FrameData(FrameData),
  /// Any other chunk, carried along without looking inside.
  Opaque(Chunk),
}
impl ApngChunk {
  /// The underlying chunk.
  #[inline]
  #[must_use]
  pub fn chunk(&self) -> &Chunk {
    match self {
      Self::Header(c) => c.chunk(),
      Self::AnimationControl(c) => c.chunk(),
      Self::FrameControl(c) => c.chunk(),
      Self::FrameData(c) => c.chunk(),
      Self::Opaque(c) => c,
    }
  }
}
impl TryFrom<Chunk> for ApngChunk {
  type Error = FormatError;
  #[inline]
  fn try_from(chunk: Chunk) -> Result<Self, Self::Error> {
    Ok(match chunk.ty() {
      ChunkType::IHDR => Self::Header(IHDR::decode(chunk)?),
      ChunkType::acTL => Self::AnimationControl(acTL::decode(chunk)?),
      ChunkType::fcTL => Self::FrameControl(fcTL::decode(chunk)?),
      ChunkType::fdAT => Self::FrameData(FrameData::fdAT(fdAT::decode(chunk)?)),
      ChunkType::IDAT => Self::FrameData(FrameData::IDAT(IDAT::from(chunk))),
      _ => Self::Opaque(chunk),
    })
  }
}

/// Checks a fixed-layout payload's length, giving back the payload as an array.
pub(crate) fn fixed_payload<const N: usize>(
  ty: ChunkType, payload: &[u8],
) -> Result<[u8; N], FormatError> {
  payload.try_into().map_err(|_| FormatError::BadPayloadLength {
    ty,
    expected: N,
    actual: payload.len(),
  })
}
