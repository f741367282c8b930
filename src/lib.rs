//! Collage building: shelf-packing layout and deterministic raster compositing.
//!
//! A [`Collage`] is an ordered list of [`Tile`]s (paint order) plus [`CanvasSettings`].
//! Two pure stages turn it into pixels:
//!
//! 1. **Layout**: [`layout_tiles`] places every unlocked tile into rows, left to right,
//!    top to bottom, inside the border. A tile that would lose more than half its width
//!    past the row end starts a new row.
//! 2. **Composite**: [`composite`] center-crops each source to its target aspect,
//!    resamples it (Lanczos3), applies an optional rounded-corner mask and blends the
//!    part inside the border-inset safe area onto a background-filled canvas.
//!
//! Around the core sit the bitmap loader ([`SourceLoader`]), a fingerprint-keyed
//! [`PreviewCache`], image export, self-contained JSON project files and a
//! [`TemplateStore`] of named size presets.
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: layout and compositing are pure for a given input.
//! - **Single-threaded**: every call completes synchronously; nothing is cancellable.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod layout;
mod model;
mod project;
mod render;
mod templates;

pub use assets::decode::{
    BitmapResolver, SourceLoader, decode_bitmap, probe_size, read_source_bytes,
};
pub use foundation::core::{IRect, Pos, Rgb8, Size};
pub use foundation::error::{BitmapLoadError, CollageError, CollageResult};
pub use layout::shelf::{OVERFLOW_THRESHOLD, layout_tiles};
pub use model::collage::Collage;
pub use model::settings::{CanvasSettings, CanvasSettingsInput, SettingValue};
pub use model::tile::{SourceRef, Tile, TileEdit};
pub use project::file::{ProjectFile, ProjectImage, load_project, save_project};
pub use render::cache::{
    CollageFingerprint, DEFAULT_PREVIEW_WIDTH, PreviewCache, ZoomLevel, fingerprint_collage,
    preview_image,
};
pub use render::composite::{CompositeReport, composite, composite_with_report};
pub use render::crop::{crop_to_aspect, fit_tile};
pub use render::export::{ExportFormat, export_image};
pub use render::mask::rounded_mask;
pub use templates::store::{Template, TemplateStore};
