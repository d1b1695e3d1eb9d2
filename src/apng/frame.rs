use super::*;

/// A chunk in the body of a frame, after its `fcTL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameChunk {
  /// Image data.
  Data(FrameData),
  /// Anything else, kept where it was.
  Other(Chunk),
}
impl FrameChunk {
  /// The underlying chunk.
  #[inline]
  #[must_use]
  pub fn chunk(&self) -> &Chunk {
    match self {
      Self::Data(d) => d.chunk(),
      Self::Other(c) => c,
    }
  }
}

/// One frame of an animation: its `fcTL` and every chunk up to the next one.
///
/// The body is in file order, so chunks that sat between (or before) the
/// frame's data chunks are written back in the same spot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
  control: fcTL,
  body: Vec<FrameChunk>,
}
impl Frame {
  /// A frame with no image data yet.
  #[inline]
  #[must_use]
  pub fn new(control: fcTL) -> Self {
    Self { control, body: Vec::new() }
  }

  /// Appends a data chunk.
  #[inline]
  pub fn push_data(&mut self, data: FrameData) {
    self.body.push(FrameChunk::Data(data));
  }

  /// Appends some other chunk.
  #[inline]
  pub fn push_other(&mut self, chunk: Chunk) {
    self.body.push(FrameChunk::Other(chunk));
  }

  /// The frame control chunk.
  #[inline]
  #[must_use]
  pub const fn control(&self) -> &fcTL {
    &self.control
  }

  pub(crate) fn set_control(&mut self, control: fcTL) {
    self.control = control;
  }

  /// Every chunk after the `fcTL`, in file order.
  #[inline]
  #[must_use]
  pub fn body(&self) -> &[FrameChunk] {
    &self.body
  }

  /// The image data chunks, in file order.
  pub fn data_chunks(&self) -> impl Iterator<Item = &FrameData> + '_ {
    self.body.iter().filter_map(|c| match c {
      FrameChunk::Data(d) => Some(d),
      FrameChunk::Other(_) => None,
    })
  }

  /// The chunks that aren't image data, in file order.
  pub fn other_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
    self.body.iter().filter_map(|c| match c {
      FrameChunk::Data(_) => None,
      FrameChunk::Other(c) => Some(c),
    })
  }

  /// How long the frame stays on screen, see [`FrameControlFields::delay`].
  #[inline]
  #[must_use]
  pub fn delay(&self) -> Duration {
    self.control.delay()
  }

  /// The frame rectangle.
  #[inline]
  #[must_use]
  pub fn region(&self) -> Region {
    self.control.region()
  }

  /// All the image data of the frame as one compressed stream, with the
  /// `fdAT` sequence numbers removed.
  #[must_use]
  pub fn bitmap_data(&self) -> Vec<u8> {
    let total = self.data_chunks().map(|d| d.frame_data().len()).sum();
    let mut out = Vec::with_capacity(total);
    for d in self.data_chunks() {
      out.extend_from_slice(d.frame_data());
    }
    out
  }

  /// The frame's image data as a single `IDAT`, which is what a plain PNG
  /// decoder expects to find.
  #[inline]
  #[must_use]
  pub fn bitmap_chunk(&self) -> IDAT {
    IDAT::new(self.bitmap_data())
  }

  /// Size of the frame's chunks once encoded.
  #[inline]
  #[must_use]
  pub fn encoded_len(&self) -> usize {
    self.control.chunk().encoded_len()
      + self.body.iter().map(|c| c.chunk().encoded_len()).sum::<usize>()
  }

  /// Appends the frame's chunks, in order, to a buffer.
  pub fn write_to(&self, out: &mut Vec<u8>) {
    self.control.chunk().write_to(out);
    self.body.iter().for_each(|c| c.chunk().write_to(out));
  }
}
