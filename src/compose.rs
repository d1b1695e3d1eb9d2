//! Drawing frames onto the canvas, following the APNG dispose and blend rules.
//!
//! The steps for showing frame `n`, given the canvas as frame `n - 1` left it:
//!
//! 1. Dispose of frame `n - 1`. [`DisposeOp::Background`] clears its rectangle
//!    to transparent black, [`DisposeOp::Previous`] puts back the pixels that
//!    were under it (if there's a snapshot of them, otherwise nothing).
//! 2. If frame `n` is [`DisposeOp::Previous`], snapshot its rectangle.
//! 3. If frame `n` is [`BlendOp::Source`], clear its rectangle.
//! 4. Draw frame `n`, alpha blending it for [`BlendOp::Over`].
//!
//! None of the state is kept between calls: it's all in the
//! [`CompositeState`] that goes in and comes back out of [`composite_step`].

use alloc::vec::Vec;
use log::debug;

use crate::{
  blend_over,
  png::{BlendOp, DisposeOp, FrameControlFields, Region},
  Apng, ApngError, Bitmap, FrameCache, FrameDecoder, TRANSPARENT,
};

/// Pixels saved from under a frame, to be put back when it's disposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  /// Where the pixels came from (already clipped to the canvas).
  pub region: Region,
  /// The saved pixels.
  pub pixels: Bitmap,
}

/// The canvas and the snapshot carried from one step to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeState {
  /// What's on screen.
  pub canvas: Bitmap,
  /// Saved by the most recent step, if its frame was [`DisposeOp::Previous`].
  pub snapshot: Option<Snapshot>,
}
impl CompositeState {
  /// The state before the first frame: a transparent canvas and no snapshot.
  #[inline]
  #[must_use]
  pub fn new(width: u32, height: u32) -> Self {
    Self { canvas: Bitmap::new_transparent(width, height), snapshot: None }
  }
}

/// Advances the canvas by one frame.
///
/// * `previous` is the frame control of the frame that was last drawn, `None`
///   for the first frame.
/// * `next` is the frame control of the frame to draw, and `image` is its
///   decoded raster.
#[must_use]
pub fn composite_step(
  mut state: CompositeState, previous: Option<&FrameControlFields>, next: &FrameControlFields,
  image: &Bitmap,
) -> CompositeState {
  let snapshot = state.snapshot.take();
  if let Some(prev) = previous {
    match prev.dispose_op {
      DisposeOp::None => (),
      DisposeOp::Background => state.canvas.fill_region(prev.region(), TRANSPARENT),
      DisposeOp::Previous => {
        if let Some(Snapshot { region, pixels }) = snapshot {
          state.canvas.draw_with(&pixels, region.x, region.y, |s, _| s);
        }
      }
    }
  }

  let region = next.region();
  if next.dispose_op == DisposeOp::Previous {
    let (region, pixels) = state.canvas.copy_region(region);
    state.snapshot = Some(Snapshot { region, pixels });
  }

  match next.blend_op {
    BlendOp::Source => {
      state.canvas.fill_region(region, TRANSPARENT);
      state.canvas.draw_with(image, next.x_offset, next.y_offset, |s, _| s);
    }
    BlendOp::Over => state.canvas.draw_with(image, next.x_offset, next.y_offset, blend_over),
  }
  state
}

/// Composites every frame, in order, and gives back the canvas after each.
///
/// All the frames are decoded (see [`FrameCache::preload`]) before any
/// compositing starts.
pub fn render_all<D: FrameDecoder + ?Sized>(
  apng: &Apng, cache: &mut FrameCache, decoder: &D,
) -> Result<Vec<Bitmap>, ApngError> {
  cache.preload(apng, decoder)?;
  let (width, height) = apng.canvas_size();
  let mut state = CompositeState::new(width, height);
  let mut out = Vec::with_capacity(apng.frames().len());
  let mut previous: Option<&FrameControlFields> = None;
  for (index, frame) in apng.frames().iter().enumerate() {
    let raster = cache.ensure(apng, index, decoder)?;
    let control = frame.control().fields();
    state = composite_step(state, previous, control, raster);
    out.push(state.canvas.clone());
    previous = Some(control);
  }
  debug!("rendered {} frames", out.len());
  Ok(out)
}
