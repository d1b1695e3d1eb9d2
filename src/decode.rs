//! Turning frames into rasters, by way of a decoder you provide.

use alloc::vec::Vec;
use log::debug;

use crate::{png::FrameControlFields, Apng, ApngError, Bitmap, DecodeError};

#[cfg(feature = "rayon")]
mod sync_bound {
  /// `Sync` when the `rayon` feature is on, nothing otherwise.
  pub trait MaybeSync: Sync {}
  impl<T: Sync + ?Sized> MaybeSync for T {}
}
#[cfg(not(feature = "rayon"))]
mod sync_bound {
  /// `Sync` when the `rayon` feature is on, nothing otherwise.
  pub trait MaybeSync {}
  impl<T: ?Sized> MaybeSync for T {}
}
pub use sync_bound::MaybeSync;

/// Decodes a complete single image PNG into pixels.
///
/// The input is built by [`Apng::frame_png`], so its `IHDR` already has the
/// frame's width and height. The raster given back must have that same size.
///
/// Any `Fn(&[u8]) -> Result<Bitmap, DecodeError>` is a decoder.
pub trait FrameDecoder: MaybeSync {
  /// Decodes one image.
  fn decode_png(&self, png: &[u8]) -> Result<Bitmap, DecodeError>;
}
impl<F> FrameDecoder for F
where
  F: Fn(&[u8]) -> Result<Bitmap, DecodeError> + MaybeSync,
{
  #[inline]
  fn decode_png(&self, png: &[u8]) -> Result<Bitmap, DecodeError> {
    self(png)
  }
}

/// Decodes a single frame of the animation.
///
/// ## Failure
/// * [`ApngError::Mutation`] if `index` is out of bounds.
/// * [`ApngError::Decode`] if the decoder fails, or gives back a raster that
///   isn't the frame's size or whose pixel buffer doesn't match its size.
pub fn decode_frame<D: FrameDecoder + ?Sized>(
  apng: &Apng, index: usize, decoder: &D,
) -> Result<Bitmap, ApngError> {
  let png = apng.frame_png(index)?;
  let control = apng.frames()[index].control();
  let raster = decoder.decode_png(&png).map_err(|source| ApngError::Decode { index, source })?;
  if raster.width != control.width || raster.height != control.height {
    return Err(ApngError::Decode {
      index,
      source: DecodeError::DimensionMismatch {
        width: control.width,
        height: control.height,
        actual_width: raster.width,
        actual_height: raster.height,
      },
    });
  }
  let expected = (raster.width as usize).saturating_mul(raster.height as usize);
  if raster.pixels.len() != expected {
    return Err(ApngError::Decode {
      index,
      source: DecodeError::BufferSizeMismatch { expected, actual: raster.pixels.len() },
    });
  }
  Ok(raster)
}

/// Decodes the frames listed, each one independent of the others.
///
/// With the `rayon` feature the frames are decoded in parallel. Either way
/// this only returns once every frame has finished.
pub fn decode_frames<D: FrameDecoder + ?Sized>(
  apng: &Apng, indexes: &[usize], decoder: &D,
) -> Vec<Result<Bitmap, ApngError>> {
  #[cfg(feature = "rayon")]
  {
    use rayon::prelude::*;
    indexes.par_iter().map(|&i| decode_frame(apng, i, decoder)).collect()
  }
  #[cfg(not(feature = "rayon"))]
  {
    indexes.iter().map(|&i| decode_frame(apng, i, decoder)).collect()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
  control: FrameControlFields,
  raster: Bitmap,
}

/// Decoded rasters of an animation's frames.
///
/// Each raster remembers the frame control it was decoded under. Once a
/// frame's `fcTL` is edited the old raster is never handed out again, and the
/// frame has to be decoded again. You can also drop entries explicitly with
/// [`invalidate`](Self::invalidate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameCache {
  entries: Vec<Option<CacheEntry>>,
}
impl FrameCache {
  /// An empty cache.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { entries: Vec::new() }
  }

  /// The raster of a frame, if it's cached and still current.
  #[inline]
  #[must_use]
  pub fn get(&self, apng: &Apng, index: usize) -> Option<&Bitmap> {
    let frame = apng.frames().get(index)?;
    match self.entries.get(index) {
      Some(Some(entry)) if entry.control == *frame.control().fields() => Some(&entry.raster),
      _ => None,
    }
  }

  /// Stores the raster of a frame, decoded under the given frame control.
  #[inline]
  pub fn insert(&mut self, index: usize, control: FrameControlFields, raster: Bitmap) {
    if self.entries.len() <= index {
      self.entries.resize(index + 1, None);
    }
    self.entries[index] = Some(CacheEntry { control, raster });
  }

  /// Drops one frame's raster.
  #[inline]
  pub fn invalidate(&mut self, index: usize) {
    if let Some(entry) = self.entries.get_mut(index) {
      *entry = None;
    }
  }

  /// Drops everything.
  #[inline]
  pub fn clear(&mut self) {
    self.entries.clear();
  }

  /// Indexes of the frames that don't have a current raster.
  #[must_use]
  pub fn missing(&self, apng: &Apng) -> Vec<usize> {
    (0..apng.frames().len()).filter(|&i| self.get(apng, i).is_none()).collect()
  }

  /// If every frame has a current raster.
  #[inline]
  #[must_use]
  pub fn is_complete(&self, apng: &Apng) -> bool {
    (0..apng.frames().len()).all(|i| self.get(apng, i).is_some())
  }

  /// Gets a frame's raster, decoding it first if needed.
  pub fn ensure<D: FrameDecoder + ?Sized>(
    &mut self, apng: &Apng, index: usize, decoder: &D,
  ) -> Result<&Bitmap, ApngError> {
    if self.get(apng, index).is_none() {
      let raster = decode_frame(apng, index, decoder)?;
      self.insert(index, *apng.frames()[index].control().fields(), raster);
    }
    // the frame exists, or decode_frame would have failed
    self.get(apng, index).ok_or(ApngError::Mutation(crate::MutationError::FrameOutOfBounds {
      index,
      total: apng.frames().len(),
    }))
  }

  /// Decodes every frame that doesn't have a current raster.
  ///
  /// All the decodes are finished before this returns. Frames that decoded
  /// fine are cached even when others failed.
  ///
  /// ## Failure
  /// * The error of the lowest numbered frame that failed.
  pub fn preload<D: FrameDecoder + ?Sized>(
    &mut self, apng: &Apng, decoder: &D,
  ) -> Result<(), ApngError> {
    let missing = self.missing(apng);
    if missing.is_empty() {
      return Ok(());
    }
    debug!("preloading {} of {} frames", missing.len(), apng.frames().len());
    let results = decode_frames(apng, &missing, decoder);
    let mut first_error = None;
    for (index, result) in missing.into_iter().zip(results) {
      match result {
        Ok(raster) => self.insert(index, *apng.frames()[index].control().fields(), raster),
        Err(e) => {
          debug!("frame {index} failed to decode: {e}");
          first_error.get_or_insert(e);
        }
      }
    }
    first_error.map_or(Ok(()), Err)
  }
}
