//! Sheet layout planning: tiling photo copies onto a physical paper sheet.
//!
//! All dimensions here are physical inches; nothing in this module touches
//! pixels. The planner evaluates the paper in both orientations, keeps the
//! one that fits more copies, and describes the resulting grid together with
//! the cut-mark geometry a document renderer needs.

use serde::{Deserialize, Serialize};

use crate::error::PassfotoError;

/// Page margin assumed by the print document, in inches.
pub const PAGE_MARGIN_IN: f64 = 0.5;

/// A physical paper sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    /// Sheet width in inches.
    pub width_in: f64,
    /// Sheet height in inches.
    pub height_in: f64,
}

impl PaperSize {
    /// A sheet with the given physical dimensions.
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
        }
    }

    /// 10×15 cm photo paper in landscape (5.91×3.94 in).
    pub const fn photo_10x15() -> Self {
        Self::new(5.91, 3.94)
    }
}

/// How many copies to place on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Copies {
    /// As many as the sheet holds in the better orientation.
    AutoFit,
    /// Exactly this many, even if the sheet cannot geometrically hold them.
    Exact(u32),
}

/// Columns × rows that fit one paper orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFit {
    pub cols: u32,
    pub rows: u32,
}

impl GridFit {
    /// Total tiles in this grid.
    pub fn count(&self) -> u32 {
        self.cols * self.rows
    }
}

/// Tiles that fit along one axis: `max(1, ⌊(sheet + gap) / (tile + gap)⌋)`.
///
/// The `+gap` numerator treats the sheet as having one trailing gap's worth
/// of slack, which simplifies the division (n tiles need n−1 internal gaps).
/// This slightly overcounts versus exact `n·tile + (n−1)·gap ≤ sheet`
/// packing; the behavior is intentional and pinned by tests. The floor at 1
/// guarantees progress even when a single tile exceeds the sheet.
fn fit_axis(sheet_in: f64, tile_in: f64, gap_in: f64) -> u32 {
    (((sheet_in + gap_in) / (tile_in + gap_in)).floor() as u32).max(1)
}

/// Grid that fits a sheet of the given size.
pub fn fit_grid(
    sheet_width_in: f64,
    sheet_height_in: f64,
    tile_width_in: f64,
    tile_height_in: f64,
    gap_in: f64,
) -> GridFit {
    GridFit {
        cols: fit_axis(sheet_width_in, tile_width_in, gap_in),
        rows: fit_axis(sheet_height_in, tile_height_in, gap_in),
    }
}

/// The planned sheet: chosen orientation, grid, tile count, and mark sizing.
///
/// This is a description, not pixels — enough for a renderer to emit a
/// paginated document with `count` copies of the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Sheet width in the chosen orientation, inches.
    pub paper_width_in: f64,
    /// Sheet height in the chosen orientation, inches.
    pub paper_height_in: f64,
    /// Whether the paper was rotated from its native orientation.
    pub rotated: bool,
    /// Columns the grid wraps at.
    pub cols: u32,
    /// Rows actually used by `count` tiles.
    pub rows: u32,
    /// Total tiles to place.
    pub count: u32,
    /// Per-tile physical width (the photo's print width), inches.
    pub tile_width_in: f64,
    /// Per-tile physical height (the photo's print height), inches.
    pub tile_height_in: f64,
    /// Uniform gap between tiles in both axes, inches.
    pub gap_in: f64,
    /// Corner cut-mark length (`gap / 2`), inches.
    pub cut_mark_in: f64,
}

/// One photo copy's position on the sheet, relative to the content origin
/// (top-left tile corner, inside the page margin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub col: u32,
    pub row: u32,
    pub x_in: f64,
    pub y_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

/// A straight cut-mark segment in sheet coordinates, inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1_in: f64,
    pub y1_in: f64,
    pub x2_in: f64,
    pub y2_in: f64,
}

/// Plan the maximum-yield (or exact-count) tiling of photo copies.
///
/// Both paper orientations are evaluated; the one fitting more tiles wins,
/// with ties going to the native orientation. With [`Copies::Exact`] the
/// requested count is never clamped to capacity — overflow is the printer's
/// concern — but the grid still wraps at the winning orientation's column
/// count.
pub fn plan_sheet(
    photo_width_in: f64,
    photo_height_in: f64,
    paper: PaperSize,
    gap_in: f64,
    copies: Copies,
) -> Result<SheetLayout, PassfotoError> {
    if photo_width_in <= 0.0 || photo_height_in <= 0.0 {
        return Err(PassfotoError::InvalidFormatDimensions(format!(
            "{photo_width_in}x{photo_height_in} in photo"
        )));
    }
    if paper.width_in <= 0.0 || paper.height_in <= 0.0 {
        return Err(PassfotoError::InvalidFormatDimensions(format!(
            "{}x{} in paper",
            paper.width_in, paper.height_in
        )));
    }
    if gap_in < 0.0 {
        return Err(PassfotoError::InvalidFormatDimensions(format!(
            "{gap_in} in gap"
        )));
    }

    let native = fit_grid(
        paper.width_in,
        paper.height_in,
        photo_width_in,
        photo_height_in,
        gap_in,
    );
    let turned = fit_grid(
        paper.height_in,
        paper.width_in,
        photo_width_in,
        photo_height_in,
        gap_in,
    );

    // Ties favor the native orientation
    let rotated = turned.count() > native.count();
    let (fit, paper_width_in, paper_height_in) = if rotated {
        (turned, paper.height_in, paper.width_in)
    } else {
        (native, paper.width_in, paper.height_in)
    };

    let count = match copies {
        Copies::AutoFit => fit.count(),
        Copies::Exact(0) => {
            return Err(PassfotoError::InvalidFormatDimensions(
                "0 copies requested".into(),
            ))
        }
        Copies::Exact(n) => n,
    };
    let rows = count.div_ceil(fit.cols);

    Ok(SheetLayout {
        paper_width_in,
        paper_height_in,
        rotated,
        cols: fit.cols,
        rows,
        count,
        tile_width_in: photo_width_in,
        tile_height_in: photo_height_in,
        gap_in,
        cut_mark_in: gap_in / 2.0,
    })
}

impl SheetLayout {
    /// Per-copy rectangles in row-major order, wrapping at `cols`.
    pub fn tiles(&self) -> impl Iterator<Item = TileRect> + '_ {
        (0..self.count).map(move |i| {
            let col = i % self.cols;
            let row = i / self.cols;
            TileRect {
                col,
                row,
                x_in: col as f64 * (self.tile_width_in + self.gap_in),
                y_in: row as f64 * (self.tile_height_in + self.gap_in),
                width_in: self.tile_width_in,
                height_in: self.tile_height_in,
            }
        })
    }

    /// Corner cut marks for one tile: at each corner, a horizontal and a
    /// vertical segment of length `cut_mark_in` extending outward from the
    /// tile edge into the surrounding gap, guiding scissor trimming.
    pub fn cut_marks(&self, tile: &TileRect) -> Vec<Segment> {
        let c = self.cut_mark_in;
        if c <= 0.0 {
            return Vec::new();
        }
        let (left, top) = (tile.x_in, tile.y_in);
        let (right, bottom) = (tile.x_in + tile.width_in, tile.y_in + tile.height_in);

        let horizontal = |x: f64, y: f64, dir: f64| Segment {
            x1_in: x,
            y1_in: y,
            x2_in: x + dir * c,
            y2_in: y,
        };
        let vertical = |x: f64, y: f64, dir: f64| Segment {
            x1_in: x,
            y1_in: y,
            x2_in: x,
            y2_in: y + dir * c,
        };

        vec![
            horizontal(left, top, -1.0),
            vertical(left, top, -1.0),
            horizontal(right, top, 1.0),
            vertical(right, top, -1.0),
            horizontal(left, bottom, -1.0),
            vertical(left, bottom, 1.0),
            horizontal(right, bottom, 1.0),
            vertical(right, bottom, 1.0),
        ]
    }
}
