use apng_edit::{
  composite_step, png::*, render_all, Apng, ApngError, Bitmap, CompositeState, DecodeError,
  FrameCache,
};

use super::{build_apng, control, raw_rgba_decoder, rgba};

const RED: pixel_formats::r8g8b8a8_Srgb = rgba(255, 0, 0, 255);
const GREEN: pixel_formats::r8g8b8a8_Srgb = rgba(0, 255, 0, 255);
const BLUE: pixel_formats::r8g8b8a8_Srgb = rgba(0, 0, 255, 255);
const CLEAR: pixel_formats::r8g8b8a8_Srgb = rgba(0, 0, 0, 0);

fn render(width: u32, height: u32, frames: &[(FrameControlFields, Bitmap)]) -> Vec<Bitmap> {
  let apng = Apng::from_bytes(&build_apng(width, height, 1, frames)).unwrap();
  let mut cache = FrameCache::new();
  let out = render_all(&apng, &mut cache, &raw_rgba_decoder).unwrap();
  assert!(cache.is_complete(&apng));
  out
}

#[test]
fn test_dispose_background() {
  let red = Bitmap::new_filled(4, 4, RED);
  let green = Bitmap::new_filled(2, 2, GREEN);
  let blue = Bitmap::new_filled(1, 1, BLUE);
  let frames = [
    (control(0, 0, &red, DisposeOp::None, BlendOp::Source), red),
    (control(1, 1, &green, DisposeOp::Background, BlendOp::Source), green),
    (control(0, 0, &blue, DisposeOp::None, BlendOp::Over), blue),
  ];
  let canvases = render(4, 4, &frames);
  assert_eq!(canvases.len(), 3);
  assert!(canvases[0].pixels.iter().all(|&p| p == RED));
  assert_eq!(canvases[1].get(1, 1), Some(GREEN));
  assert_eq!(canvases[1].get(3, 3), Some(RED));

  let last = &canvases[2];
  for y in 0..4 {
    for x in 0..4 {
      let expected = match (x, y) {
        (0, 0) => BLUE,
        (1..=2, 1..=2) => CLEAR,
        _ => RED,
      };
      assert_eq!(last.get(x, y), Some(expected), "({x},{y})");
    }
  }
}

#[test]
fn test_dispose_previous_restores_exactly() {
  let red = Bitmap::new_filled(4, 4, RED);
  let green = Bitmap::new_filled(2, 2, rgba(0, 255, 0, 100));
  let nothing = Bitmap::new_filled(1, 1, CLEAR);
  let frames = [
    (control(0, 0, &red, DisposeOp::None, BlendOp::Source), red),
    (control(2, 2, &green, DisposeOp::Previous, BlendOp::Over), green),
    (control(0, 0, &nothing, DisposeOp::None, BlendOp::Over), nothing),
  ];
  let canvases = render(4, 4, &frames);
  assert_ne!(canvases[1], canvases[0]);
  assert_eq!(canvases[2], canvases[0]);
}

#[test]
fn test_first_frame_previous_is_not_an_error() {
  let red = Bitmap::new_filled(2, 2, RED);
  let nothing = Bitmap::new_filled(1, 1, CLEAR);
  let first = control(0, 0, &red, DisposeOp::Previous, BlendOp::Source);
  let second = control(0, 0, &nothing, DisposeOp::None, BlendOp::Over);

  let state = composite_step(CompositeState::new(2, 2), None, &first, &red);
  assert!(state.canvas.pixels.iter().all(|&p| p == RED));
  let snapshot = state.snapshot.clone().unwrap();
  assert_eq!(snapshot.region, first.region());
  assert!(snapshot.pixels.pixels.iter().all(|&p| p == CLEAR));

  // the first frame's "previous" is the empty canvas
  let state = composite_step(state, Some(&first), &second, &nothing);
  assert!(state.canvas.pixels.iter().all(|&p| p == CLEAR));
  assert!(state.snapshot.is_none());

  // with no snapshot at all, disposal leaves the canvas alone
  let mut red_canvas = CompositeState::new(2, 2);
  red_canvas.canvas = red.clone();
  let state = composite_step(red_canvas, Some(&first), &second, &nothing);
  assert_eq!(state.canvas, red);
}

#[test]
fn test_blend_source_and_over() {
  let half_blue = Bitmap::new_filled(1, 1, rgba(0, 0, 255, 128));
  let mut base = CompositeState::new(2, 1);
  base.canvas = Bitmap::new_filled(2, 1, RED);

  let source = control(1, 0, &half_blue, DisposeOp::None, BlendOp::Source);
  let state = composite_step(base.clone(), None, &source, &half_blue);
  assert_eq!(state.canvas.get(1, 0), Some(rgba(0, 0, 255, 128)));
  assert_eq!(state.canvas.get(0, 0), Some(RED));

  let over = control(1, 0, &half_blue, DisposeOp::None, BlendOp::Over);
  let state = composite_step(base, None, &over, &half_blue);
  assert_eq!(state.canvas.get(1, 0), Some(rgba(127, 0, 128, 255)));
}

#[test]
fn test_stale_raster_is_decoded_again() {
  let red = Bitmap::new_filled(2, 2, RED);
  let frames = [
    (control(0, 0, &red, DisposeOp::None, BlendOp::Source), red.clone()),
    (control(0, 0, &red, DisposeOp::None, BlendOp::Source), red),
  ];
  let mut apng = Apng::from_bytes(&build_apng(2, 2, 1, &frames)).unwrap();
  let decoder = super::CountingDecoder::default();
  let mut cache = FrameCache::new();
  render_all(&apng, &mut cache, &decoder).unwrap();
  assert_eq!(decoder.calls(), 2);
  render_all(&apng, &mut cache, &decoder).unwrap();
  assert_eq!(decoder.calls(), 2);

  let patch = FrameControlPatch { delay_num: Some(3), ..Default::default() };
  apng.set_frame_fields(1, &patch).unwrap();
  assert_eq!(cache.missing(&apng), vec![1]);
  assert!(cache.get(&apng, 0).is_some());
  render_all(&apng, &mut cache, &decoder).unwrap();
  assert_eq!(decoder.calls(), 3);

  cache.invalidate(0);
  assert!(!cache.is_complete(&apng));
  decoder.set_fail(true);
  let err = render_all(&apng, &mut cache, &decoder).unwrap_err();
  assert!(matches!(err, apng_edit::ApngError::Decode { index: 0, .. }));
}

#[test]
fn test_dispose_background_on_big_canvas() {
  let red = Bitmap::new_filled(10, 10, RED);
  let dot = Bitmap::new_filled(1, 1, BLUE);
  let frames = [
    (control(0, 0, &red, DisposeOp::Background, BlendOp::Source), red),
    (control(5, 5, &dot, DisposeOp::None, BlendOp::Over), dot),
  ];
  let canvases = render(10, 10, &frames);
  assert!(canvases[0].pixels.iter().all(|&p| p == RED));
  let last = &canvases[1];
  for y in 0..10 {
    for x in 0..10 {
      let expected = if (x, y) == (5, 5) { BLUE } else { CLEAR };
      assert_eq!(last.get(x, y), Some(expected), "({x},{y})");
    }
  }
}

#[test]
fn test_short_pixel_buffer_is_a_decode_error() {
  let red = Bitmap::new_filled(2, 2, RED);
  let frames = [(control(0, 0, &red, DisposeOp::None, BlendOp::Source), red)];
  let apng = Apng::from_bytes(&build_apng(2, 2, 1, &frames)).unwrap();
  let empty = |_png: &[u8]| -> Result<Bitmap, DecodeError> {
    Ok(Bitmap { width: 2, height: 2, pixels: Vec::new() })
  };
  let mut cache = FrameCache::new();
  assert_eq!(
    render_all(&apng, &mut cache, &empty),
    Err(ApngError::Decode {
      index: 0,
      source: DecodeError::BufferSizeMismatch { expected: 4, actual: 0 },
    })
  );
  assert!(!cache.is_complete(&apng));
}
