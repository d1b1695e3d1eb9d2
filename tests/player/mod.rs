use core::time::Duration;

use apng_edit::{
  png::FrameControlPatch, Apng, ApngError, Bitmap, FrameCache, FrameSink, ManualClock,
  PlaybackState, Player,
};

use super::{rgba, three_frame_apng, CountingDecoder};

const FRAME: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct Recorder {
  shown: Vec<usize>,
  last: Option<Bitmap>,
}
impl FrameSink for Recorder {
  fn show_frame(&mut self, index: usize, canvas: &Bitmap) {
    self.shown.push(index);
    self.last = Some(canvas.clone());
  }
}

struct Rig {
  apng: Apng,
  cache: FrameCache,
  decoder: CountingDecoder,
  player: Player<ManualClock>,
  sink: Recorder,
}
impl Rig {
  fn new(num_plays: u32) -> Self {
    Self {
      apng: Apng::from_bytes(&three_frame_apng(num_plays)).unwrap(),
      cache: FrameCache::new(),
      decoder: CountingDecoder::default(),
      player: Player::new(ManualClock::new()),
      sink: Recorder::default(),
    }
  }
  fn play(&mut self) -> Result<(), ApngError> {
    self.player.play(&self.apng, &mut self.cache, &self.decoder)
  }
  fn stop(&mut self) -> Result<(), ApngError> {
    self.player.stop(&self.apng, &mut self.cache, &self.decoder)
  }
  fn tick(&mut self) -> Result<PlaybackState, ApngError> {
    self.player.tick(&self.apng, &mut self.cache, &self.decoder, &mut self.sink)
  }
  fn advance(&mut self, by: Duration) -> Result<PlaybackState, ApngError> {
    self.player.clock().advance(by);
    self.tick()
  }
}

#[test]
fn test_play_count_is_exact() {
  let mut rig = Rig::new(2);
  rig.play().unwrap();
  assert_eq!(rig.decoder.calls(), 3);
  assert_eq!(rig.tick(), Ok(PlaybackState::Playing));
  for _ in 0..20 {
    rig.advance(FRAME).unwrap();
  }
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0, 1, 2]);
  assert_eq!(rig.player.state(), PlaybackState::Finished);
  assert_eq!(rig.player.loops_completed(), 2);
  // the last frame stays up
  assert_eq!(rig.player.current_frame(), Some(2));
  assert!(rig.player.canvas().pixels.iter().all(|&p| p == rgba(0, 0, 255, 255)));
  // nothing was decoded twice
  assert_eq!(rig.decoder.calls(), 3);
}

#[test]
fn test_play_count_zero_loops_forever() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.tick().unwrap();
  for _ in 0..29 {
    assert_eq!(rig.advance(FRAME), Ok(PlaybackState::Playing));
  }
  assert_eq!(rig.sink.shown.len(), 30);
  assert_eq!(rig.player.loops_completed(), 10);
}

#[test]
fn test_late_tick_catches_up() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.advance(Duration::from_millis(250)).unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2]);
  rig.advance(Duration::from_millis(49)).unwrap();
  assert_eq!(rig.sink.shown.len(), 3);
  rig.advance(Duration::from_millis(1)).unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0]);
  // each pass starts over on a clear canvas
  assert_eq!(rig.sink.last, Some(Bitmap::new_filled(4, 4, rgba(255, 0, 0, 255))));
}

#[test]
fn test_pause_and_resume() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.tick().unwrap();
  rig.advance(FRAME).unwrap();
  rig.player.pause();
  assert_eq!(rig.advance(FRAME * 10), Ok(PlaybackState::Paused));
  assert_eq!(rig.sink.shown, vec![0, 1]);
  assert_eq!(rig.player.current_frame(), Some(1));

  rig.play().unwrap();
  // the next frame comes up right away
  rig.tick().unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2]);
  // playing again while playing changes nothing
  rig.play().unwrap();
  rig.tick().unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2]);
}

#[test]
fn test_stop_shows_first_frame() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.advance(FRAME * 4).unwrap();
  assert_eq!(rig.player.loops_completed(), 1);
  rig.stop().unwrap();
  assert_eq!(rig.player.state(), PlaybackState::Stopped);
  assert_eq!(rig.player.current_frame(), Some(0));
  assert_eq!(rig.player.loops_completed(), 0);
  assert!(rig.player.canvas().pixels.iter().all(|&p| p == rgba(255, 0, 0, 255)));

  let shown = rig.sink.shown.len();
  assert_eq!(rig.advance(FRAME * 10), Ok(PlaybackState::Stopped));
  assert_eq!(rig.sink.shown.len(), shown);

  rig.play().unwrap();
  rig.tick().unwrap();
  assert_eq!(rig.sink.shown.last(), Some(&0));
}

#[test]
fn test_play_after_finish_restarts() {
  let mut rig = Rig::new(1);
  rig.play().unwrap();
  rig.advance(FRAME * 5).unwrap();
  assert_eq!(rig.player.state(), PlaybackState::Finished);
  assert_eq!(rig.sink.shown, vec![0, 1, 2]);
  rig.play().unwrap();
  assert_eq!(rig.player.loops_completed(), 0);
  rig.tick().unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0]);
}

#[test]
fn test_preload_failure_blocks_play() {
  let mut rig = Rig::new(1);
  rig.decoder.set_fail(true);
  assert!(matches!(rig.play(), Err(ApngError::Decode { index: 0, .. })));
  assert_eq!(rig.player.state(), PlaybackState::Stopped);
  assert_eq!(rig.tick(), Ok(PlaybackState::Stopped));
  assert!(rig.sink.shown.is_empty());
}

#[test]
fn test_stale_frame_failure_pauses() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.tick().unwrap();
  let patch = FrameControlPatch { delay_num: Some(2), ..Default::default() };
  rig.apng.set_frame_fields(1, &patch).unwrap();
  rig.decoder.set_fail(true);
  assert!(matches!(rig.advance(FRAME), Err(ApngError::Decode { index: 1, .. })));
  assert_eq!(rig.player.state(), PlaybackState::Paused);
  assert_eq!(rig.player.current_frame(), Some(0));

  rig.decoder.set_fail(false);
  rig.play().unwrap();
  rig.tick().unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1]);
  assert_eq!(rig.decoder.calls(), 5);
}

#[test]
fn test_long_gap_skips_whole_passes() {
  let mut rig = Rig::new(0);
  rig.play().unwrap();
  rig.tick().unwrap();
  let hour = Duration::from_secs(3600);
  assert_eq!(rig.advance(hour), Ok(PlaybackState::Playing));
  // the rest of the first pass, then only the frame now due
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0]);
  assert_eq!(rig.player.loops_completed(), 12_000);
  // timing carries on from where it should be
  rig.advance(FRAME).unwrap();
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0, 1]);
}

#[test]
fn test_long_gap_still_plays_the_last_pass() {
  let mut rig = Rig::new(3);
  rig.play().unwrap();
  rig.tick().unwrap();
  assert_eq!(rig.advance(Duration::from_secs(3600)), Ok(PlaybackState::Finished));
  assert_eq!(rig.sink.shown, vec![0, 1, 2, 0, 1, 2]);
  assert_eq!(rig.player.loops_completed(), 3);
  assert_eq!(rig.player.current_frame(), Some(2));
}
