use log::{debug, warn};

use super::*;

/// The payload of the `tEXt` chunk written after the frames of every file this
/// crate saves.
pub const WATERMARK_TEXT: &[u8] = b"Software\0Processed by apng-edit";

/// The provenance chunk appended to every saved file.
#[inline]
#[must_use]
pub fn watermark_chunk() -> Chunk {
  Chunk::new(ChunkType::tEXt, WATERMARK_TEXT.to_vec())
}

#[inline]
fn is_watermark(chunk: &Chunk) -> bool {
  chunk.ty() == ChunkType::tEXt && chunk.payload() == WATERMARK_TEXT
}

/// The default for [`ParseOptions::max_canvas_pixels`]: 1GiB of RGBA8.
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Options for [`Apng::from_bytes_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
  /// Reject any chunk whose declared CRC doesn't match its contents.
  ///
  /// When this is off, mismatches are only logged, and the declared CRC is
  /// written back out unchanged.
  pub verify_crc: bool,
  /// Reject headers whose canvas has more pixels than this.
  ///
  /// Compositing allocates the whole canvas, so this bounds the memory an
  /// untrusted file can ask for.
  pub max_canvas_pixels: u64,
}
impl Default for ParseOptions {
  #[inline]
  fn default() -> Self {
    Self { verify_crc: false, max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS }
  }
}

/// An APNG file, held as chunks.
///
/// Every chunk the container doesn't need to understand is kept exactly as it
/// was read, and written back out in its original position relative to the
/// frames:
/// * **pre-frame** chunks come before the animation (`PLTE`, `gAMA`, etc).
/// * the **still image** is the `IDAT` data of a default image that isn't
///   part of the animation, along with anything between it and the first
///   frame.
/// * chunks between two frames stay with the frame they follow.
/// * **post-frame** chunks come after the last frame (normally just `IEND`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Apng {
  header: IHDR,
  animation: Option<acTL>,
  pre: Vec<Chunk>,
  still: Vec<Chunk>,
  frames: Vec<Frame>,
  post: Vec<Chunk>,
}
impl Apng {
  /// Parses an APNG (or plain PNG) datastream.
  ///
  /// ## Failure
  /// * Any [`FormatError`]. Nothing is returned for a datastream that fails
  ///   part way through.
  #[inline]
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
    Self::from_bytes_with(bytes, &ParseOptions::default())
  }

  /// Parses an APNG (or plain PNG) datastream with the options given.
  pub fn from_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Self, FormatError> {
    if !is_png_signature_correct(bytes) {
      return Err(FormatError::BadSignature);
    }
    let mut chunks = RawChunkIter::new(bytes).map(|raw| {
      let raw = raw?;
      let actual = raw.compute_actual_crc();
      if raw.declared_crc() != actual {
        if options.verify_crc {
          return Err(FormatError::CrcMismatch {
            ty: raw.ty(),
            declared: raw.declared_crc(),
            actual,
          });
        }
        warn!("{:?} chunk has CRC {:#010x}, expected {actual:#010x}", raw.ty(), raw.declared_crc());
      }
      Ok(Chunk::from(raw))
    });

    let header = match ApngChunk::try_from(chunks.next().ok_or(FormatError::NoChunksPresent)??)? {
      ApngChunk::Header(ihdr) => ihdr,
      other => return Err(FormatError::FirstChunkNotIHDR(other.chunk().ty())),
    };
    let pixels = u64::from(header.width) * u64::from(header.height);
    if pixels > options.max_canvas_pixels {
      return Err(FormatError::CanvasTooLarge {
        width: header.width,
        height: header.height,
        limit: options.max_canvas_pixels,
      });
    }
    let mut animation: Option<acTL> = None;
    let mut pre = Vec::new();
    let mut still = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    // chunks seen after the still image or a frame's data, not yet known to
    // be part of a frame or after all of them.
    let mut pending = Vec::new();

    for chunk in chunks {
      let chunk = chunk?;
      if is_watermark(&chunk) {
        continue;
      }
      match ApngChunk::try_from(chunk)? {
        ApngChunk::Header(_) => return Err(FormatError::DuplicateHeader),
        ApngChunk::AnimationControl(actl) => {
          if animation.replace(actl).is_some() {
            return Err(FormatError::DuplicateAnimationControl);
          }
        }
        ApngChunk::FrameControl(fctl) => {
          match frames.last_mut() {
            Some(frame) => pending.drain(..).for_each(|c| frame.push_other(c)),
            None => still.append(&mut pending),
          }
          frames.push(Frame::new(fctl));
        }
        ApngChunk::FrameData(data) => match (frames.last_mut(), data) {
          (Some(frame), data) => {
            pending.drain(..).for_each(|c| frame.push_other(c));
            frame.push_data(data);
          }
          (None, FrameData::IDAT(idat)) => {
            still.append(&mut pending);
            still.push(idat.chunk().clone());
          }
          (None, FrameData::fdAT(_)) => return Err(FormatError::FrameDataWithoutControl),
        },
        ApngChunk::Opaque(chunk) => {
          if frames.is_empty() && still.is_empty() {
            pre.push(chunk);
          } else {
            pending.push(chunk);
          }
        }
      }
    }

    match (&animation, frames.is_empty()) {
      (None, false) => return Err(FormatError::MissingAnimationControl),
      (Some(_), true) => return Err(FormatError::AnimationControlWithoutFrames),
      (Some(actl), false) if actl.num_frames as usize != frames.len() => {
        warn!("acTL declares {} frames but {} were found", actl.num_frames, frames.len());
      }
      _ => (),
    }
    debug!(
      "parsed {}x{} image: {} frames, {} pre-frame chunks, {} still image chunks, {} post-frame chunks",
      header.width,
      header.height,
      frames.len(),
      pre.len(),
      still.len(),
      pending.len()
    );
    Ok(Self { header, animation, pre, still, frames, post: pending })
  }

  /// Writes the whole file out.
  ///
  /// The order is always: signature, `IHDR`, pre-frame chunks, `acTL`, still
  /// image, frames, the [watermark](watermark_chunk), post-frame chunks.
  #[must_use]
  pub fn to_bytes(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(self.encoded_len_hint());
    out.extend_from_slice(&PNG_SIGNATURE);
    self.header.chunk().write_to(&mut out);
    self.pre.iter().for_each(|c| c.write_to(&mut out));
    if let (Some(actl), false) = (&self.animation, self.frames.is_empty()) {
      actl.chunk().write_to(&mut out);
    }
    self.still.iter().for_each(|c| c.write_to(&mut out));
    self.frames.iter().for_each(|f| f.write_to(&mut out));
    watermark_chunk().write_to(&mut out);
    self.post.iter().for_each(|c| c.write_to(&mut out));
    out
  }

  fn encoded_len_hint(&self) -> usize {
    let chunks = |list: &[Chunk]| list.iter().map(Chunk::encoded_len).sum::<usize>();
    let frames: usize = self.frames.iter().map(Frame::encoded_len).sum();
    PNG_SIGNATURE.len()
      + self.header.chunk().encoded_len()
      + chunks(&self.pre)
      + 20
      + chunks(&self.still)
      + frames
      + 12
      + WATERMARK_TEXT.len()
      + chunks(&self.post)
  }

  /// Sets how many times the animation plays, 0 meaning forever.
  ///
  /// ## Failure
  /// * [`MutationError::NotAnimated`] if there's no `acTL`. Nothing changes.
  pub fn set_play_count(&mut self, num_plays: u32) -> Result<(), MutationError> {
    let actl = self.animation.as_mut().ok_or(MutationError::NotAnimated)?;
    let patch = AnimationControlPatch { num_plays: Some(num_plays), ..Default::default() };
    *actl = actl.with_fields(&patch);
    Ok(())
  }

  /// Changes some fields of a frame's `fcTL`.
  ///
  /// Only that one chunk is rewritten. Any decoded raster of the frame that
  /// you cached is stale after this.
  ///
  /// ## Failure
  /// Nothing changes if:
  /// * `index` is out of bounds.
  /// * the patch touches the frame rectangle, and the new rectangle would be
  ///   empty or leave the canvas. A frame that was already outside the canvas
  ///   in the file can still have its other fields edited.
  pub fn set_frame_fields(
    &mut self, index: usize, patch: &FrameControlPatch,
  ) -> Result<(), MutationError> {
    let (canvas_width, canvas_height) = self.canvas_size();
    let total = self.frames.len();
    let frame =
      self.frames.get_mut(index).ok_or(MutationError::FrameOutOfBounds { index, total })?;
    let control = frame.control().with_fields(patch);
    let r = control.region();
    let moves = patch.x_offset.is_some()
      || patch.y_offset.is_some()
      || patch.width.is_some()
      || patch.height.is_some();
    if moves && (r.width == 0 || r.height == 0 || !r.fits_within(canvas_width, canvas_height)) {
      return Err(MutationError::FrameOutsideCanvas {
        x: r.x,
        y: r.y,
        width: r.width,
        height: r.height,
        canvas_width,
        canvas_height,
      });
    }
    frame.set_control(control);
    Ok(())
  }

  /// Builds a plain single image PNG of one frame.
  ///
  /// This is what gets handed to a [`FrameDecoder`](crate::FrameDecoder): the
  /// header resized to the frame, the pre-frame chunks (so palettes and such
  /// still apply), the frame's data as one `IDAT`, and the post-frame chunks.
  /// An `IEND` is added if the post-frame chunks didn't have one.
  pub fn frame_png(&self, index: usize) -> Result<Vec<u8>, MutationError> {
    let frame = self.frame(index)?;
    let header = self.header.with_fields(&HeaderPatch {
      width: Some(frame.control().width),
      height: Some(frame.control().height),
      ..Default::default()
    });
    let mut out = PNG_SIGNATURE.to_vec();
    header.chunk().write_to(&mut out);
    self.pre.iter().for_each(|c| c.write_to(&mut out));
    frame.bitmap_chunk().chunk().write_to(&mut out);
    self.post.iter().for_each(|c| c.write_to(&mut out));
    if !self.post.iter().any(|c| c.ty() == ChunkType::IEND) {
      out.extend_from_slice(&encode_chunk(ChunkType::IEND, &[]));
    }
    Ok(out)
  }

  /// The image header.
  #[inline]
  #[must_use]
  pub const fn header(&self) -> &IHDR {
    &self.header
  }

  /// Canvas `(width, height)` in pixels.
  #[inline]
  #[must_use]
  pub fn canvas_size(&self) -> (u32, u32) {
    (self.header.width, self.header.height)
  }

  /// The animation control, if this is an animated image.
  #[inline]
  #[must_use]
  pub const fn animation_control(&self) -> Option<&acTL> {
    self.animation.as_ref()
  }

  /// If the image has any frames.
  #[inline]
  #[must_use]
  pub fn is_animated(&self) -> bool {
    !self.frames.is_empty()
  }

  /// How many times the animation plays (0 is forever), if animated.
  #[inline]
  #[must_use]
  pub fn play_count(&self) -> Option<u32> {
    self.animation.as_ref().map(|actl| actl.num_plays)
  }

  /// The frames, in order.
  #[inline]
  #[must_use]
  pub fn frames(&self) -> &[Frame] {
    &self.frames
  }

  /// One frame.
  #[inline]
  pub fn frame(&self, index: usize) -> Result<&Frame, MutationError> {
    let total = self.frames.len();
    self.frames.get(index).ok_or(MutationError::FrameOutOfBounds { index, total })
  }

  /// Chunks that come before the animation.
  #[inline]
  #[must_use]
  pub fn pre_frame_chunks(&self) -> &[Chunk] {
    &self.pre
  }

  /// The still image chunks.
  #[inline]
  #[must_use]
  pub fn still_image_chunks(&self) -> &[Chunk] {
    &self.still
  }

  /// Chunks that come after the animation.
  #[inline]
  #[must_use]
  pub fn post_frame_chunks(&self) -> &[Chunk] {
    &self.post
  }

  /// The time one pass through all the frames takes.
  #[inline]
  #[must_use]
  pub fn loop_duration(&self) -> Duration {
    self.frames.iter().map(Frame::delay).sum()
  }
}
