//! Playing an animation back in time.
//!
//! The [`Player`] doesn't run anything by itself. Whatever drives your display
//! (a vsync callback, a timer, a game loop) calls [`Player::tick`], and the
//! player composites however many frames have come due since the last tick.
//! Time comes from a [`Clock`], so tests can step it by hand.

use core::cell::Cell;
use core::time::Duration;

use log::{debug, trace};

use crate::{
  composite_step, Apng, ApngError, Bitmap, CompositeState, FrameCache, FrameDecoder,
};

/// A source of the current time.
///
/// Only differences between readings matter, so the zero point can be
/// anything.
pub trait Clock {
  /// The current time.
  fn now(&self) -> Duration;
}
impl<C: Clock + ?Sized> Clock for &C {
  #[inline]
  fn now(&self) -> Duration {
    (**self).now()
  }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
  now: Cell<Duration>,
}
impl ManualClock {
  /// A clock reading zero.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { now: Cell::new(Duration::ZERO) }
  }
  /// Moves the clock forward.
  #[inline]
  pub fn advance(&self, by: Duration) {
    self.now.set(self.now.get() + by);
  }
  /// Sets the clock to a given time.
  #[inline]
  pub fn set(&self, now: Duration) {
    self.now.set(now);
  }
}
impl Clock for ManualClock {
  #[inline]
  fn now(&self) -> Duration {
    self.now.get()
  }
}

/// Wall clock time, measured from when the clock was made.
#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
  start: std::time::Instant,
}
#[cfg(feature = "std")]
impl StdClock {
  /// A clock starting now.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self { start: std::time::Instant::now() }
  }
}
#[cfg(feature = "std")]
impl Default for StdClock {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
#[cfg(feature = "std")]
impl Clock for StdClock {
  #[inline]
  fn now(&self) -> Duration {
    self.start.elapsed()
  }
}

/// Receives each composited frame, for display or export.
///
/// Any `FnMut(usize, &Bitmap)` is a sink.
pub trait FrameSink {
  /// Frame `index` was just composited, and `canvas` is the full result.
  fn show_frame(&mut self, index: usize, canvas: &Bitmap);
}
impl<F: FnMut(usize, &Bitmap)> FrameSink for F {
  #[inline]
  fn show_frame(&mut self, index: usize, canvas: &Bitmap) {
    self(index, canvas)
  }
}

/// What a [`Player`] is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
  /// Not started, or stopped. The next play starts from the first frame.
  #[default]
  Stopped,
  /// Frames are composited as they come due.
  Playing,
  /// Halted part way. The next play picks up with the next frame.
  Paused,
  /// All the plays the `acTL` asked for are done.
  Finished,
}

/// Schedules the frames of an animation.
///
/// The player owns the canvas, but not the animation or its rasters: those are
/// passed in to each call, so the same [`Apng`] and [`FrameCache`] can also be
/// edited between calls. If a frame is edited, its raster is decoded again
/// before it's next shown.
#[derive(Debug, Clone)]
pub struct Player<C> {
  clock: C,
  state: PlaybackState,
  /// the next frame to draw
  index: usize,
  displayed: Option<usize>,
  loops_completed: u32,
  next_due: Duration,
  composite: CompositeState,
}
impl<C: Clock> Player<C> {
  /// A stopped player.
  #[inline]
  #[must_use]
  pub fn new(clock: C) -> Self {
    Self {
      clock,
      state: PlaybackState::Stopped,
      index: 0,
      displayed: None,
      loops_completed: 0,
      next_due: Duration::ZERO,
      composite: CompositeState::default(),
    }
  }

  /// Starts or resumes playback.
  ///
  /// * Does nothing if already playing.
  /// * If any frame doesn't have a current raster, every missing frame is
  ///   decoded before playback starts.
  /// * From [`Paused`](PlaybackState::Paused), the next frame is drawn on the
  ///   next tick. From [`Stopped`](PlaybackState::Stopped) or
  ///   [`Finished`](PlaybackState::Finished) playback starts over at frame 0.
  ///
  /// ## Failure
  /// * If any frame fails to decode, playback doesn't start.
  pub fn play<D: FrameDecoder + ?Sized>(
    &mut self, apng: &Apng, cache: &mut FrameCache, decoder: &D,
  ) -> Result<(), ApngError> {
    if self.state == PlaybackState::Playing {
      return Ok(());
    }
    cache.preload(apng, decoder)?;
    if self.state != PlaybackState::Paused {
      self.rewind(apng);
    }
    self.state = PlaybackState::Playing;
    self.next_due = self.clock.now();
    debug!("playing from frame {}", self.index);
    Ok(())
  }

  /// Halts playback, keeping the current frame and canvas.
  #[inline]
  pub fn pause(&mut self) {
    if self.state == PlaybackState::Playing {
      self.state = PlaybackState::Paused;
    }
  }

  /// Halts playback and shows frame 0, drawn on a clear canvas.
  ///
  /// ## Failure
  /// * If frame 0 fails to decode. The player is still stopped, with a clear
  ///   canvas.
  pub fn stop<D: FrameDecoder + ?Sized>(
    &mut self, apng: &Apng, cache: &mut FrameCache, decoder: &D,
  ) -> Result<(), ApngError> {
    self.state = PlaybackState::Stopped;
    self.rewind(apng);
    if !apng.frames().is_empty() {
      self.draw(0, apng, cache, decoder)?;
    }
    Ok(())
  }

  /// Composites every frame that has come due.
  ///
  /// Call this periodically. If more than one frame's delay has passed since
  /// the last call, all of those frames are composited now (each reported to
  /// `sink`), so the animation keeps to its timing even when ticks are late.
  /// Whole passes through the animation that are overdue are counted as
  /// played without compositing them.
  ///
  /// Does nothing unless the player is [`Playing`](PlaybackState::Playing).
  ///
  /// ## Failure
  /// * If a frame needs decoding and that fails. Playback is paused on the
  ///   frame before it.
  pub fn tick<D: FrameDecoder + ?Sized, S: FrameSink + ?Sized>(
    &mut self, apng: &Apng, cache: &mut FrameCache, decoder: &D, sink: &mut S,
  ) -> Result<PlaybackState, ApngError> {
    if self.state != PlaybackState::Playing {
      return Ok(self.state);
    }
    let frame_count = apng.frames().len();
    if frame_count == 0 {
      self.state = PlaybackState::Finished;
      return Ok(self.state);
    }
    if self.index >= frame_count {
      // frames were removed since the last tick
      self.rewind(apng);
    }
    let now = self.clock.now();
    let plays = apng.play_count().unwrap_or(1);
    while self.next_due <= now {
      if self.index == 0 {
        self.skip_whole_loops(apng, now, plays);
      }
      let index = self.index;
      if let Err(e) = self.draw(index, apng, cache, decoder) {
        self.state = PlaybackState::Paused;
        return Err(e);
      }
      sink.show_frame(index, &self.composite.canvas);
      self.next_due += apng.frames()[index].delay();
      trace!("frame {index} shown, next due at {:?}", self.next_due);
      self.index = index + 1;
      if self.index == frame_count {
        self.index = 0;
        self.loops_completed = self.loops_completed.saturating_add(1);
        if plays != 0 && self.loops_completed >= plays {
          debug!("finished after {} plays", self.loops_completed);
          self.state = PlaybackState::Finished;
          break;
        }
      }
    }
    Ok(self.state)
  }

  /// At the start of a pass, skips every whole pass that's already overdue,
  /// so a tick after a long gap doesn't composite them all. The last pass of
  /// a finite play count is never skipped.
  fn skip_whole_loops(&mut self, apng: &Apng, now: Duration, plays: u32) {
    let loop_duration = apng.loop_duration();
    if loop_duration.is_zero() {
      return;
    }
    let lag = now.saturating_sub(self.next_due);
    let mut skip = u32::try_from(lag.as_nanos() / loop_duration.as_nanos()).unwrap_or(u32::MAX);
    if plays != 0 {
      skip = skip.min(plays.saturating_sub(self.loops_completed).saturating_sub(1));
    }
    if skip == 0 {
      return;
    }
    debug!("{skip} whole plays overdue, skipping them");
    self.next_due = self.next_due.saturating_add(loop_duration.saturating_mul(skip));
    self.loops_completed = self.loops_completed.saturating_add(skip);
  }

  fn rewind(&mut self, apng: &Apng) {
    let (width, height) = apng.canvas_size();
    self.index = 0;
    self.loops_completed = 0;
    self.displayed = None;
    self.composite = CompositeState::new(width, height);
  }

  fn draw<D: FrameDecoder + ?Sized>(
    &mut self, index: usize, apng: &Apng, cache: &mut FrameCache, decoder: &D,
  ) -> Result<(), ApngError> {
    let raster = cache.ensure(apng, index, decoder)?;
    let frames = apng.frames();
    let state = if index == 0 {
      // every pass through the animation starts from a clear canvas
      let (width, height) = apng.canvas_size();
      CompositeState::new(width, height)
    } else {
      core::mem::take(&mut self.composite)
    };
    let previous = index.checked_sub(1).map(|i| frames[i].control().fields());
    self.composite = composite_step(state, previous, frames[index].control().fields(), raster);
    self.displayed = Some(index);
    Ok(())
  }

  /// What the player is doing.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> PlaybackState {
    self.state
  }

  /// The frame most recently composited, if any.
  #[inline]
  #[must_use]
  pub const fn current_frame(&self) -> Option<usize> {
    self.displayed
  }

  /// How many full passes through the frames have been played since the last
  /// start from frame 0.
  #[inline]
  #[must_use]
  pub const fn loops_completed(&self) -> u32 {
    self.loops_completed
  }

  /// The canvas as of the most recent frame.
  #[inline]
  #[must_use]
  pub const fn canvas(&self) -> &Bitmap {
    &self.composite.canvas
  }

  /// The player's clock.
  #[inline]
  #[must_use]
  pub const fn clock(&self) -> &C {
    &self.clock
  }
}
