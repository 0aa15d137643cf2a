//! Cover-crop geometry and the interactive reposition view model.
//!
//! [`cover_crop`] computes the centered source rectangle that fills a target
//! aspect ratio, discarding excess on one axis. [`CropView`] models the
//! pan/zoom state of an on-screen crop box; [`clamp_view`] is the pure state
//! transition applied on every pointer update so the visible rectangle never
//! leaves the scaled source.

/// Crop region within the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the centered "cover" crop for the given source and target sizes.
///
/// The returned rectangle has the target's aspect ratio (within rounding)
/// and is centered on the axis that gets cropped:
/// - source relatively wider than the target: full height, centered
///   horizontally;
/// - source relatively taller (or equal): full width, centered vertically.
pub fn cover_crop(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> CropRegion {
    let target_aspect = target_width as f64 / target_height as f64;

    let (crop_width, crop_height) =
        if (source_width as f64 / source_height as f64) > target_aspect {
            // Source is relatively wider — keep full height
            let h = source_height;
            let w = ((h as f64 * target_aspect).round() as u32).min(source_width);
            (w.max(1), h)
        } else {
            // Source is relatively taller or equal — keep full width
            let w = source_width;
            let h = ((w as f64 / target_aspect).round() as u32).min(source_height);
            (w, h.max(1))
        };

    let x = (source_width.saturating_sub(crop_width)) / 2;
    let y = (source_height.saturating_sub(crop_height)) / 2;

    CropRegion {
        x,
        y,
        width: crop_width,
        height: crop_height,
    }
}

/// The on-screen crop box, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// A viewport with the given display dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pan/zoom state of the interactive crop.
///
/// Offsets are the source image's top-left corner in viewport space (zero or
/// negative once clamped); `zoom` multiplies the base cover scale and is
/// clamped to 1 or greater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropView {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
}

impl CropView {
    /// The auto-centered view at the given zoom, already clamped.
    pub fn centered(viewport: Viewport, source_width: u32, source_height: u32, zoom: f64) -> Self {
        let zoom = zoom.max(1.0);
        let scale = cover_scale(viewport, source_width, source_height) * zoom;
        clamp_view(
            Self {
                offset_x: (viewport.width - source_width as f64 * scale) / 2.0,
                offset_y: (viewport.height - source_height as f64 * scale) / 2.0,
                zoom,
            },
            viewport,
            source_width,
            source_height,
        )
    }
}

/// Scale at which the source exactly covers the viewport at zoom 1.
pub fn cover_scale(viewport: Viewport, source_width: u32, source_height: u32) -> f64 {
    (viewport.width / source_width as f64).max(viewport.height / source_height as f64)
}

/// Clamp a pan/zoom update so the viewport never shows space outside the
/// scaled source: `offset_x ∈ [viewport.width − source_width·scale, 0]`, and
/// symmetrically for `offset_y`.
pub fn clamp_view(
    view: CropView,
    viewport: Viewport,
    source_width: u32,
    source_height: u32,
) -> CropView {
    let zoom = view.zoom.max(1.0);
    let scale = cover_scale(viewport, source_width, source_height) * zoom;

    let min_x = viewport.width - source_width as f64 * scale;
    let min_y = viewport.height - source_height as f64 * scale;

    CropView {
        offset_x: view.offset_x.clamp(min_x.min(0.0), 0.0),
        offset_y: view.offset_y.clamp(min_y.min(0.0), 0.0),
        zoom,
    }
}

/// Map a (clamped) view back to the source rectangle visible in the viewport.
pub fn view_region(
    view: CropView,
    viewport: Viewport,
    source_width: u32,
    source_height: u32,
) -> CropRegion {
    let view = clamp_view(view, viewport, source_width, source_height);
    let scale = cover_scale(viewport, source_width, source_height) * view.zoom;

    let x = ((-view.offset_x / scale).round() as u32).min(source_width.saturating_sub(1));
    let y = ((-view.offset_y / scale).round() as u32).min(source_height.saturating_sub(1));
    let width = ((viewport.width / scale).round() as u32)
        .max(1)
        .min(source_width - x);
    let height = ((viewport.height / scale).round() as u32)
        .max(1)
        .min(source_height - y);

    CropRegion {
        x,
        y,
        width,
        height,
    }
}
