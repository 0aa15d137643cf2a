//! Photo format specifications and the format registry.
//!
//! A [`PhotoFormat`] pairs a pixel target (the composited raster size) with
//! the physical size that raster occupies on paper. Built-in formats are
//! immutable and defined once; user-defined formats are managed through
//! [`FormatRegistry`] and persisted by the host.

use serde::{Deserialize, Serialize};

use crate::error::PassfotoError;

/// Format id selected when the active format is deleted or unknown.
pub const DEFAULT_FORMAT_ID: &str = "eu_35x45";

/// A named photo specification: output raster size plus physical print size.
///
/// By convention the pixel and print dimensions describe the same aspect
/// ratio, but this is not enforced — a mismatch means the print document
/// stretches the raster into the print box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoFormat {
    /// Stable identifier, e.g. `eu_35x45`.
    pub id: String,

    /// Human-readable label.
    pub label: String,

    /// Required output raster width in pixels.
    pub width_px: u32,

    /// Required output raster height in pixels.
    pub height_px: u32,

    /// Physical width the raster occupies when printed, in inches.
    pub print_width_in: f64,

    /// Physical height the raster occupies when printed, in inches.
    pub print_height_in: f64,

    /// Whether this is a built-in (immutable) format.
    pub builtin: bool,
}

impl PhotoFormat {
    /// Create a user-defined format. Call [`PhotoFormat::validate`] before
    /// handing it to the compositor or the layout planner.
    pub fn custom(
        id: impl Into<String>,
        label: impl Into<String>,
        width_px: u32,
        height_px: u32,
        print_width_in: f64,
        print_height_in: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width_px,
            height_px,
            print_width_in,
            print_height_in,
            builtin: false,
        }
    }

    /// Reject non-positive pixel or print dimensions.
    ///
    /// Validation happens at the format-editing boundary so the compositor
    /// and planner only ever see well-formed targets.
    pub fn validate(&self) -> Result<(), PassfotoError> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(PassfotoError::InvalidFormatDimensions(format!(
                "{}x{} px",
                self.width_px, self.height_px
            )));
        }
        if self.print_width_in <= 0.0 || self.print_height_in <= 0.0 {
            return Err(PassfotoError::InvalidFormatDimensions(format!(
                "{}x{} in",
                self.print_width_in, self.print_height_in
            )));
        }
        Ok(())
    }
}

fn builtin(
    id: &str,
    label: &str,
    width_px: u32,
    height_px: u32,
    print_width_in: f64,
    print_height_in: f64,
) -> PhotoFormat {
    PhotoFormat {
        id: id.to_string(),
        label: label.to_string(),
        width_px,
        height_px,
        print_width_in,
        print_height_in,
        builtin: true,
    }
}

/// The built-in format set, in presentation order.
///
/// Pixel targets correspond to the physical sizes at 300 dpi.
pub fn builtin_formats() -> Vec<PhotoFormat> {
    vec![
        builtin("eu_35x45", "EU / Schengen 35\u{d7}45 mm", 413, 531, 1.378, 1.772),
        builtin("us_2x2", "US 2\u{d7}2 in", 600, 600, 2.0, 2.0),
        builtin("jp_35x45", "Japan 35\u{d7}45 mm", 413, 531, 1.378, 1.772),
        builtin("cn_33x48", "China 33\u{d7}48 mm", 390, 567, 1.299, 1.890),
    ]
}

/// Built-in formats plus user-defined ones, with selection tracking.
///
/// Built-ins cannot be edited or removed. Removing the selected custom
/// format falls back to [`DEFAULT_FORMAT_ID`].
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<PhotoFormat>,
    selected_id: String,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Registry with only the built-in formats, default format selected.
    pub fn new() -> Self {
        Self {
            formats: builtin_formats(),
            selected_id: DEFAULT_FORMAT_ID.to_string(),
        }
    }

    /// Registry seeded with previously persisted custom formats.
    ///
    /// Each custom format is validated; the first invalid one aborts.
    pub fn with_custom(custom: Vec<PhotoFormat>) -> Result<Self, PassfotoError> {
        let mut registry = Self::new();
        for format in custom {
            registry.add_custom(format)?;
        }
        Ok(registry)
    }

    /// All formats, built-ins first.
    pub fn formats(&self) -> &[PhotoFormat] {
        &self.formats
    }

    /// Only the user-defined formats, for persistence.
    pub fn custom_formats(&self) -> impl Iterator<Item = &PhotoFormat> {
        self.formats.iter().filter(|f| !f.builtin)
    }

    /// Look up a format by id.
    pub fn get(&self, id: &str) -> Option<&PhotoFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// The currently selected format.
    ///
    /// Falls back to the default built-in if the selected id is missing,
    /// so callers always get a usable format.
    pub fn selected(&self) -> &PhotoFormat {
        self.get(&self.selected_id)
            .or_else(|| self.get(DEFAULT_FORMAT_ID))
            .unwrap_or(&self.formats[0])
    }

    /// Select a format by id. Returns `false` if the id is unknown, leaving
    /// the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected_id = id.to_string();
            true
        } else {
            false
        }
    }

    /// Add or update a user-defined format.
    ///
    /// The format is validated first. An id colliding with a built-in is
    /// rejected; an existing custom format with the same id is replaced.
    pub fn add_custom(&mut self, format: PhotoFormat) -> Result<(), PassfotoError> {
        format.validate()?;
        if self.get(&format.id).is_some_and(|f| f.builtin) {
            return Err(PassfotoError::InvalidFormatDimensions(format!(
                "id {} is reserved by a built-in format",
                format.id
            )));
        }
        let format = PhotoFormat {
            builtin: false,
            ..format
        };
        if let Some(existing) = self.formats.iter_mut().find(|f| f.id == format.id) {
            *existing = format;
        } else {
            self.formats.push(format);
        }
        Ok(())
    }

    /// Remove a user-defined format by id. Built-ins are never removed.
    ///
    /// Removing the selected format resets the selection to the default
    /// built-in. Returns `true` if a format was removed.
    pub fn remove_custom(&mut self, id: &str) -> bool {
        let before = self.formats.len();
        self.formats.retain(|f| f.builtin || f.id != id);
        let removed = self.formats.len() < before;
        if removed && self.selected_id == id {
            self.selected_id = DEFAULT_FORMAT_ID.to_string();
        }
        removed
    }
}
