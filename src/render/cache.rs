use image::{RgbaImage, imageops::FilterType};
use xxhash_rust::xxh3::Xxh3;

use crate::{
    assets::decode::BitmapResolver,
    foundation::{
        core::{Pos, Size},
        error::CollageResult,
    },
    model::{collage::Collage, settings::CanvasSettings, tile::SourceRef, tile::Tile},
    render::composite::composite,
};

const XXH3_SEED: u64 = 0x2c6f_1a9e_53d7_b804;

/// Widest preview shown before downscaling.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 800;

/// Content hash of everything that can change composited output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollageFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint settings and tiles as they would be composited right now.
///
/// Path sources are keyed by path, not file contents. `scale` is left out.
pub fn fingerprint_collage(settings: &CanvasSettings, tiles: &[Tile]) -> CollageFingerprint {
    let mut h = StableHasher::new();
    settings.feed(&mut h);
    tiles.feed(&mut h);
    h.finish()
}

/// Length-framed xxh3 stream with a fixed seed.
struct StableHasher(Xxh3);

impl StableHasher {
    fn new() -> Self {
        Self(Xxh3::with_seed(XXH3_SEED))
    }

    fn raw(&mut self, b: &[u8]) {
        self.0.update(b);
    }

    fn tag(&mut self, v: u8) {
        self.raw(&[v]);
    }

    fn dim(&mut self, v: u32) {
        self.raw(&v.to_le_bytes());
    }

    fn coord(&mut self, v: i64) {
        self.raw(&v.to_le_bytes());
    }

    fn count(&mut self, n: usize) {
        self.raw(&(n as u64).to_le_bytes());
    }

    fn blob(&mut self, b: &[u8]) {
        self.count(b.len());
        self.raw(b);
    }

    fn finish(self) -> CollageFingerprint {
        let v = self.0.digest128();
        CollageFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Output-affecting state written into a [`StableHasher`].
trait Feed {
    fn feed(&self, h: &mut StableHasher);
}

impl Feed for Size {
    fn feed(&self, h: &mut StableHasher) {
        h.dim(self.width);
        h.dim(self.height);
    }
}

impl Feed for Pos {
    fn feed(&self, h: &mut StableHasher) {
        h.coord(self.x);
        h.coord(self.y);
    }
}

impl<T: Feed> Feed for Option<T> {
    fn feed(&self, h: &mut StableHasher) {
        match self {
            Some(v) => {
                h.tag(1);
                v.feed(h);
            }
            None => h.tag(0),
        }
    }
}

impl<T: Feed> Feed for [T] {
    fn feed(&self, h: &mut StableHasher) {
        h.count(self.len());
        for item in self {
            item.feed(h);
        }
    }
}

impl Feed for CanvasSettings {
    fn feed(&self, h: &mut StableHasher) {
        Size::new(self.width, self.height).feed(h);
        h.dim(self.border);
        h.raw(&[self.background.r, self.background.g, self.background.b]);
        h.dim(self.corner_radius);
    }
}

impl Feed for SourceRef {
    fn feed(&self, h: &mut StableHasher) {
        match self {
            SourceRef::Path(p) => {
                h.tag(0);
                h.blob(p.to_string_lossy().as_bytes());
            }
            SourceRef::Embedded { filename, bytes } => {
                h.tag(1);
                h.blob(filename.as_bytes());
                h.blob(bytes);
            }
        }
    }
}

impl Feed for Tile {
    fn feed(&self, h: &mut StableHasher) {
        self.source().feed(h);
        self.target_size.feed(h);
        self.effective_position().feed(h);
        h.tag(u8::from(self.locked));
        h.dim(self.corner_radius);
    }
}

/// Memoizes the last composite of a collage, keyed by [`CollageFingerprint`].
///
/// Sits outside the engine, so layout and compositing stay pure. Path sources are
/// keyed by path only: when a file changes on disk the cache keeps serving the old
/// composite until [`PreviewCache::invalidate`] is called.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entry: Option<(CollageFingerprint, RgbaImage)>,
    renders: u64,
}

impl PreviewCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out `collage`, then return the cached composite or render a fresh one.
    pub fn get_or_render<R: BitmapResolver + ?Sized>(
        &mut self,
        collage: &mut Collage,
        resolver: &mut R,
    ) -> CollageResult<&RgbaImage> {
        collage.recalc_layout()?;
        let fp = fingerprint_collage(collage.settings(), collage.tiles());
        let img = match self.entry.take() {
            Some((cached, img)) if cached == fp => img,
            _ => {
                tracing::debug!(?fp, "preview cache miss, recompositing");
                self.renders += 1;
                composite(collage.tiles(), collage.settings(), resolver)?
            }
        };
        Ok(&self.entry.insert((fp, img)).1)
    }

    /// Drop the cached image, e.g. after a source file changed on disk.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of composites performed so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

/// Downscale `img` to at most `max_width` pixels wide, keeping its aspect ratio.
pub fn preview_image(img: &RgbaImage, max_width: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_width || max_width == 0 {
        return img.clone();
    }
    let scale = f64::from(max_width) / f64::from(w);
    let new_h = ((f64::from(h) * scale) as u32).max(1);
    image::imageops::resize(img, max_width, new_h, FilterType::Lanczos3)
}

/// Preview zoom factor, clamped to the editor's `[0.1, 5.0]` range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLevel(f64);

impl ZoomLevel {
    /// Smallest zoom.
    pub const MIN: f64 = 0.1;
    /// Largest zoom.
    pub const MAX: f64 = 5.0;

    /// Clamp `level` into range; NaN becomes 1.0.
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            return Self(1.0);
        }
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    /// Zoom factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Display size of a `width` x `height` image at this zoom.
    pub fn apply(self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.0) as u32).max(1);
        (scale(width), scale(height))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
