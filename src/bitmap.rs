#![forbid(unsafe_code)]

//! Provides the heap-allocated raster that frames are composited onto.

use alloc::vec;
use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

use crate::png::Region;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// Fully transparent black.
pub const TRANSPARENT: r8g8b8a8_Srgb = r8g8b8a8_Srgb { r: 0, g: 0, b: 0, a: 0 };

/// An owned direct-color image.
///
/// The fields are public, but if you put them together weirdly the methods of
/// this type might panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P = r8g8b8a8_Srgb> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P: Copy> Bitmap<P> {
  /// A bitmap with every pixel set to `fill`.
  #[inline]
  #[must_use]
  pub fn new_filled(width: u32, height: u32, fill: P) -> Self {
    Self { width, height, pixels: vec![fill; (width as usize) * (height as usize)] }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }

  /// The part of `region` that's actually on this bitmap.
  #[inline]
  #[must_use]
  pub fn clip(&self, region: Region) -> Region {
    let x = region.x.min(self.width);
    let y = region.y.min(self.height);
    Region {
      x,
      y,
      width: region.width.min(self.width - x),
      height: region.height.min(self.height - y),
    }
  }

  /// Sets every pixel within the region (clipped to the bitmap) to `value`.
  #[inline]
  pub fn fill_region(&mut self, region: Region, value: P) {
    let r = self.clip(region);
    for y in r.y..(r.y + r.height) {
      let start = xy_width_to_index(r.x, y, self.width);
      self.pixels[start..start + r.width as usize].fill(value);
    }
  }

  /// Copies the region (clipped to the bitmap) out into its own bitmap.
  #[inline]
  #[must_use]
  pub fn copy_region(&self, region: Region) -> (Region, Self) {
    let r = self.clip(region);
    let mut pixels = Vec::with_capacity((r.width as usize) * (r.height as usize));
    for y in r.y..(r.y + r.height) {
      let start = xy_width_to_index(r.x, y, self.width);
      pixels.extend_from_slice(&self.pixels[start..start + r.width as usize]);
    }
    (r, Self { width: r.width, height: r.height, pixels })
  }

  /// Draws `src` with its top left at `(x, y)`, combining each source pixel
  /// with the destination pixel using `op(src, dst)`.
  ///
  /// Parts of `src` that fall off this bitmap are skipped.
  #[inline]
  pub fn draw_with(&mut self, src: &Self, x: u32, y: u32, mut op: impl FnMut(P, P) -> P) {
    let r = self.clip(Region { x, y, width: src.width, height: src.height });
    for row in 0..r.height {
      let src_start = xy_width_to_index(0, row, src.width);
      let dst_start = xy_width_to_index(r.x, r.y + row, self.width);
      let src_row = &src.pixels[src_start..src_start + r.width as usize];
      let dst_row = &mut self.pixels[dst_start..dst_start + r.width as usize];
      for (d, s) in dst_row.iter_mut().zip(src_row.iter().copied()) {
        *d = op(s, *d);
      }
    }
  }
}

impl Bitmap<r8g8b8a8_Srgb> {
  /// A fully transparent bitmap.
  #[inline]
  #[must_use]
  pub fn new_transparent(width: u32, height: u32) -> Self {
    Self::new_filled(width, height, TRANSPARENT)
  }

  /// Builds a bitmap from tightly packed RGBA8 bytes.
  ///
  /// Gives `None` if the byte count isn't exactly `width * height * 4`.
  #[inline]
  #[must_use]
  pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
    let rgba: &[[u8; 4]] = bytemuck::try_cast_slice(bytes).ok()?;
    if rgba.len() != (width as usize) * (height as usize) {
      return None;
    }
    let pixels = rgba.iter().map(|&[r, g, b, a]| r8g8b8a8_Srgb { r, g, b, a }).collect();
    Some(Self { width, height, pixels })
  }

  /// The pixels as tightly packed RGBA8 bytes.
  #[inline]
  #[must_use]
  pub fn to_rgba_bytes(&self) -> Vec<u8> {
    let rgba: Vec<[u8; 4]> = self.pixels.iter().map(|p| [p.r, p.g, p.b, p.a]).collect();
    bytemuck::cast_slice::<[u8; 4], u8>(&rgba).to_vec()
  }
}

/// Alpha blends `src` over `dst`, both non-premultiplied.
///
/// This is the 8-bit formula given by the APNG extension for `APNG_BLEND_OP_OVER`.
#[inline]
#[must_use]
pub fn blend_over(src: r8g8b8a8_Srgb, dst: r8g8b8a8_Srgb) -> r8g8b8a8_Srgb {
  match src.a {
    0xFF => src,
    0 => dst,
    _ => {
      let sa = u32::from(src.a);
      // destination alpha after it's been covered by the source
      let da = u32::from(dst.a) * (255 - sa) / 255;
      let out_a = sa + da;
      if out_a == 0 {
        return TRANSPARENT;
      }
      let channel = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * da) / out_a) as u8;
      r8g8b8a8_Srgb {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: out_a as u8,
      }
    }
  }
}

#[test]
fn test_blend_over() {
  let red = r8g8b8a8_Srgb { r: 255, g: 0, b: 0, a: 255 };
  let half_blue = r8g8b8a8_Srgb { r: 0, g: 0, b: 255, a: 128 };
  assert_eq!(blend_over(red, half_blue), red);
  assert_eq!(blend_over(TRANSPARENT, red), red);
  assert_eq!(blend_over(half_blue, TRANSPARENT), half_blue);
  let mixed = blend_over(half_blue, red);
  assert_eq!(mixed.a, 255);
  assert_eq!(mixed.b, 128);
  assert_eq!(mixed.r, 127);
}

#[test]
fn test_regions_clip() {
  let mut bitmap = Bitmap::new_filled(4, 3, 1_u8);
  bitmap.fill_region(Region { x: 2, y: 1, width: 10, height: 10 }, 0);
  assert_eq!(bitmap.pixels, vec![1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0, 0]);
  let (r, copy) = bitmap.copy_region(Region { x: 1, y: 1, width: 2, height: 5 });
  assert_eq!(r, Region { x: 1, y: 1, width: 2, height: 2 });
  assert_eq!(copy.pixels, vec![1, 0, 1, 0]);
  let src = Bitmap::new_filled(3, 3, 7_u8);
  bitmap.draw_with(&src, 3, 2, |s, _| s);
  assert_eq!(bitmap.get(3, 2), Some(7));
  assert_eq!(bitmap.get(2, 2), Some(0));
  assert_eq!(bitmap.get(4, 2), None);
}

#[test]
fn test_rgba_bytes() {
  let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
  let bitmap = Bitmap::from_rgba_bytes(2, 1, &bytes).unwrap();
  assert_eq!(bitmap.get(1, 0), Some(r8g8b8a8_Srgb { r: 5, g: 6, b: 7, a: 8 }));
  assert_eq!(bitmap.to_rgba_bytes(), bytes.to_vec());
  assert!(Bitmap::from_rgba_bytes(3, 1, &bytes).is_none());
  assert!(Bitmap::from_rgba_bytes(1, 1, &bytes[..3]).is_none());
}
