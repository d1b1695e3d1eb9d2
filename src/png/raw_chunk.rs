use super::*;

/// The four byte tag that names a chunk.
///
/// Bit 5 of each byte (lowercase vs uppercase ascii) carries a property of the
/// chunk, see the `is_` methods.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style, missing_docs)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const acTL: Self = Self(*b"acTL");
  pub const fcTL: Self = Self(*b"fcTL");
  pub const fdAT: Self = Self(*b"fdAT");
  pub const tEXt: Self = Self(*b"tEXt");

  /// The tag bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; 4] {
    &self.0
  }

  /// Critical chunks must be understood by a decoder to show the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & 0x20) == 0
  }

  /// Public chunks are registered with the PNG spec.
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    (self.0[1] & 0x20) == 0
  }

  /// Editors that don't understand a chunk may copy it only if this is set.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 0x20) != 0
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}
impl core::fmt::Display for ChunkType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

/// An unparsed chunk borrowed out of a PNG datastream.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunk<'b> {
  pub(crate) ty: ChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl<'b> RawChunk<'b> {
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn ty(&self) -> ChunkType {
    self.ty
  }
  /// The payload bytes.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  /// The CRC stored in the datastream.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// The CRC the type and payload actually hash to.
  #[inline]
  #[must_use]
  pub fn compute_actual_crc(&self) -> u32 {
    chunk_crc(self.ty.0, self.data)
  }
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// Decodes the chunk that starts at `offset` within `buffer`.
///
/// On success also gives the number of bytes the chunk occupies (payload
/// length plus 12 bytes of framing).
///
/// ## Failure
/// * If any part of the chunk (length, type, payload, or CRC) would run past
///   the end of the buffer you get [`FormatError::Truncated`].
#[inline]
pub fn decode_chunk(buffer: &[u8], offset: usize) -> Result<(RawChunk<'_>, usize), FormatError> {
  let rest = buffer.get(offset..).unwrap_or(&[]);
  let truncated = |needed: usize| FormatError::Truncated { offset, needed, available: rest.len() };
  let (len_bytes, rest_after_len) = try_split_off_byte_array::<4>(rest).ok_or(truncated(12))?;
  let chunk_len = u32::from_be_bytes(len_bytes) as usize;
  let total = chunk_len.checked_add(12).ok_or(truncated(usize::MAX))?;
  let (ty_bytes, rest_after_ty) =
    try_split_off_byte_array::<4>(rest_after_len).ok_or(truncated(total))?;
  if rest_after_ty.len() < chunk_len {
    return Err(truncated(total));
  }
  let (data, rest_after_data) = rest_after_ty.split_at(chunk_len);
  let (crc_bytes, _) = try_split_off_byte_array::<4>(rest_after_data).ok_or(truncated(total))?;
  let raw = RawChunk { ty: ChunkType(ty_bytes), data, declared_crc: u32::from_be_bytes(crc_bytes) };
  Ok((raw, total))
}

/// Encodes one complete chunk: length, type, payload, and a fresh CRC.
///
/// ## Panics
/// * If the payload is longer than `u32::MAX` bytes.
#[must_use]
pub fn encode_chunk(ty: ChunkType, payload: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(payload.len() + 12);
  write_chunk_into(&mut out, ty, payload, chunk_crc(ty.0, payload));
  out
}

pub(crate) fn write_chunk_into(out: &mut Vec<u8>, ty: ChunkType, payload: &[u8], crc: u32) {
  let len = u32::try_from(payload.len()).expect("chunk payload exceeds u32::MAX bytes");
  out.extend_from_slice(&len.to_be_bytes());
  out.extend_from_slice(&ty.0);
  out.extend_from_slice(payload);
  out.extend_from_slice(&crc.to_be_bytes());
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Each item is a `Result`. After the first error the iterator is fused and
/// gives only `None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunkIter<'b> {
  bytes: &'b [u8],
  offset: usize,
}
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, it will skip the PNG signature automatically.
  ///
  /// The signature isn't checked, call [`is_png_signature_correct`] for that.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, offset: PNG_SIGNATURE.len() }
  }

  /// The offset the next chunk will be read from.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = Result<RawChunk<'b>, FormatError>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.offset >= self.bytes.len() {
      return None;
    }
    match decode_chunk(self.bytes, self.offset) {
      Ok((raw, consumed)) => {
        self.offset += consumed;
        Some(Ok(raw))
      }
      Err(e) => {
        self.offset = self.bytes.len();
        Some(Err(e))
      }
    }
  }
}
impl core::iter::FusedIterator for RawChunkIter<'_> {}

/// An owned chunk.
///
/// This is an immutable value: there's no way to change the payload of an
/// existing `Chunk`, only to build a new one. Chunks built with [`Chunk::new`]
/// always carry the correct CRC. Chunks read out of a datastream keep the CRC
/// the datastream declared so that writing them back out is byte-exact.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chunk {
  ty: ChunkType,
  payload: Vec<u8>,
  crc: u32,
}
impl Chunk {
  /// Makes a new chunk, computing its CRC.
  #[inline]
  #[must_use]
  pub fn new(ty: ChunkType, payload: Vec<u8>) -> Self {
    let crc = chunk_crc(ty.0, &payload);
    Self { ty, payload, crc }
  }
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn ty(&self) -> ChunkType {
    self.ty
  }
  /// The payload bytes.
  #[inline]
  #[must_use]
  pub fn payload(&self) -> &[u8] {
    &self.payload
  }
  /// The payload length, as written in the length field.
  #[inline]
  #[must_use]
  pub fn length(&self) -> u32 {
    self.payload.len() as u32
  }
  /// The CRC that will be written for this chunk.
  #[inline]
  #[must_use]
  pub const fn crc(&self) -> u32 {
    self.crc
  }
  /// The CRC the type and payload actually hash to.
  #[inline]
  #[must_use]
  pub fn compute_actual_crc(&self) -> u32 {
    chunk_crc(self.ty.0, &self.payload)
  }
  /// If the stored CRC matches the actual CRC.
  #[inline]
  #[must_use]
  pub fn crc_is_valid(&self) -> bool {
    self.crc == self.compute_actual_crc()
  }
  /// Size of the chunk once encoded.
  #[inline]
  #[must_use]
  pub fn encoded_len(&self) -> usize {
    self.payload.len() + 12
  }
  /// Appends the encoded chunk to a buffer.
  #[inline]
  pub fn write_to(&self, out: &mut Vec<u8>) {
    write_chunk_into(out, self.ty, &self.payload, self.crc);
  }
  /// The encoded chunk.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(self.encoded_len());
    self.write_to(&mut out);
    out
  }
}
impl From<RawChunk<'_>> for Chunk {
  #[inline]
  #[must_use]
  fn from(raw: RawChunk<'_>) -> Self {
    Self { ty: raw.ty, payload: raw.data.to_vec(), crc: raw.declared_crc }
  }
}
impl Debug for Chunk {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Chunk")
      .field("ty", &self.ty)
      .field("payload", &(&self.payload[..self.payload.len().min(12)], self.payload.len()))
      .field("crc", &self.crc)
      .finish()
  }
}
