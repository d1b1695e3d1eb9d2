//! The CRC-32 used by PNG chunks (ISO 3309, reflected `0xEDB8_8320`).

const CRC_TABLE: [u32; 256] = {
  let mut table = [0_u32; 256];
  let mut i = 0;
  while i < table.len() {
    let mut c = i as u32;
    let mut bit = 0;
    while bit < 8 {
      c = if c & 1 == 1 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
      bit += 1;
    }
    table[i] = c;
    i += 1;
  }
  table
};

/// A CRC-32 in progress.
///
/// Feed it bytes in as many pieces as you like, then call
/// [`finish`](Self::finish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32(u32);
impl Crc32 {
  /// A CRC that hasn't seen any bytes yet.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self(u32::MAX)
  }
  /// Adds more bytes.
  #[inline]
  #[must_use]
  pub fn update(self, bytes: &[u8]) -> Self {
    let crc = bytes
      .iter()
      .fold(self.0, |crc, &b| CRC_TABLE[usize::from(crc as u8 ^ b)] ^ (crc >> 8));
    Self(crc)
  }
  /// The CRC of all the bytes added.
  #[inline]
  #[must_use]
  pub const fn finish(self) -> u32 {
    self.0 ^ u32::MAX
  }
}
impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// CRC of a chunk: covers the type tag followed by the payload.
#[inline]
#[must_use]
pub fn chunk_crc(ty: [u8; 4], payload: &[u8]) -> u32 {
  Crc32::new().update(&ty).update(payload).finish()
}

#[test]
fn test_crc_known_values() {
  // the CRC of an empty IEND chunk, as found at the end of every PNG
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE42_6082);
  // the standard CRC-32 check value, fed in two pieces
  assert_eq!(Crc32::new().update(b"1234").update(b"56789").finish(), 0xCBF4_3926);
}
