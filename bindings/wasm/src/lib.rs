use serde::Deserialize;
use wasm_bindgen::prelude::*;

use passfoto::crop::{CropView, Viewport};
use passfoto::format::{builtin_formats, PhotoFormat};
use passfoto::layout::{plan_sheet, Copies, PaperSize, SheetLayout};

/// Interactive crop state, passed as part of the compose options.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// Options for photo composition, passed as a JavaScript object.
///
/// All fields are optional. `formatId` selects a built-in format's pixel
/// target; explicit `targetWidth`/`targetHeight` override it.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposeOptions {
    pub format_id: Option<String>,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub view: Option<ViewOptions>,
    pub watermark: Option<String>,
    pub output: Option<String>,
    pub quality: Option<f32>,
}

/// Options for sheet planning, passed as a JavaScript object.
///
/// `copies` omitted or null means auto-fit.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanOptions {
    pub photo_width_in: f64,
    pub photo_height_in: f64,
    pub paper_width_in: Option<f64>,
    pub paper_height_in: Option<f64>,
    pub gap_in: Option<f64>,
    pub copies: Option<u32>,
}

/// Options for download file naming.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FileNameOptions {
    pub person_name: Option<String>,
    pub output: Option<String>,
}

fn format_to_str(format: passfoto::OutputFormat) -> &'static str {
    match format {
        passfoto::OutputFormat::Png => "png",
        passfoto::OutputFormat::Jpeg => "jpeg",
    }
}

fn string_to_format(format: &str) -> Result<passfoto::OutputFormat, JsValue> {
    match format {
        "png" => Ok(passfoto::OutputFormat::Png),
        "jpeg" => Ok(passfoto::OutputFormat::Jpeg),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown output format: {format}"),
        )),
    }
}

fn builtin_by_id(id: &str) -> Result<PhotoFormat, JsValue> {
    builtin_formats()
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| make_error("INVALID_OPTIONS", &format!("unknown format id: {id}")))
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `PassfotoError` into a JS `Error` with a machine-readable `code` property.
fn to_js_error(e: passfoto::PassfotoError) -> JsValue {
    let code = match &e {
        passfoto::PassfotoError::DecodeError(_) => "DECODE_ERROR",
        passfoto::PassfotoError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
        passfoto::PassfotoError::InvalidSourceImage => "INVALID_SOURCE_IMAGE",
        passfoto::PassfotoError::InvalidFormatDimensions(_) => "INVALID_FORMAT_DIMENSIONS",
        passfoto::PassfotoError::EncodeError(_) => "ENCODE_ERROR",
        passfoto::PassfotoError::InvalidQuality(_) => "INVALID_QUALITY",
        passfoto::PassfotoError::RenderContextUnavailable(_) => "RENDER_CONTEXT_UNAVAILABLE",
    };
    make_error(code, &e.to_string())
}

fn parse_options<T: Default + for<'de> Deserialize<'de>>(options: JsValue) -> Result<T, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

/// Apply parsed `ComposeOptions` to a `PhotoComposer`, returning the
/// configured composer ready for composition.
fn apply_options(
    mut composer: passfoto::PhotoComposer,
    opts: &ComposeOptions,
) -> Result<passfoto::PhotoComposer, JsValue> {
    if let Some(ref id) = opts.format_id {
        composer = composer.format(&builtin_by_id(id)?);
    }
    if let (Some(w), Some(h)) = (opts.target_width, opts.target_height) {
        composer = composer.target(w, h);
    }
    if let Some(ref view) = opts.view {
        composer = composer.view(
            CropView {
                offset_x: view.offset_x,
                offset_y: view.offset_y,
                zoom: view.zoom,
            },
            Viewport::new(view.viewport_width, view.viewport_height),
        );
    }
    if let Some(ref text) = opts.watermark {
        composer = composer.watermark(text.clone());
    }
    if let Some(ref fmt) = opts.output {
        composer = composer.output(string_to_format(fmt)?);
    }
    if let Some(q) = opts.quality {
        composer = composer.quality(q);
    }
    Ok(composer)
}

/// Build a plain JS object from a `ComposedPhoto`.
fn build_photo_object(photo: &passfoto::ComposedPhoto) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    let data = js_sys::Uint8Array::from(&photo.data[..]);
    js_sys::Reflect::set(&obj, &"data".into(), &data)?;
    js_sys::Reflect::set(
        &obj,
        &"format".into(),
        &JsValue::from_str(format_to_str(photo.format)),
    )?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(photo.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(photo.height))?;
    js_sys::Reflect::set(
        &obj,
        &"originalSize".into(),
        &JsValue::from(photo.original_size as u32),
    )?;
    Ok(JsValue::from(obj))
}

/// Compose a passport photo with the given options.
///
/// @param input - Raw image bytes (JPEG, PNG, or WebP)
/// @param options - Optional object with fields: formatId, targetWidth,
///   targetHeight, view, watermark, output, quality
#[wasm_bindgen]
pub fn compose(input: Vec<u8>, options: JsValue) -> Result<JsValue, JsValue> {
    let opts: ComposeOptions = parse_options(options)?;

    let composer = passfoto::PhotoComposer::new(input).map_err(to_js_error)?;
    let composer = apply_options(composer, &opts)?;

    let result = composer.compose().map_err(to_js_error)?;

    build_photo_object(&result)
}

/// The built-in photo formats, as an array of plain objects.
#[wasm_bindgen]
pub fn formats() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&builtin_formats())
        .map_err(|e| make_error("INTERNAL", &e.to_string()))
}

/// Plan a print sheet for the given photo and paper sizes.
///
/// @param options - Object with fields: photoWidthIn, photoHeightIn,
///   paperWidthIn, paperHeightIn (default 10×15 cm paper), gapIn (default
///   0.1), copies (omitted = auto-fit)
#[wasm_bindgen(js_name = "planSheet")]
pub fn plan_sheet_js(options: JsValue) -> Result<JsValue, JsValue> {
    let opts: PlanOptions = parse_options(options)?;

    let paper = match (opts.paper_width_in, opts.paper_height_in) {
        (Some(w), Some(h)) => PaperSize::new(w, h),
        _ => PaperSize::photo_10x15(),
    };
    let copies = match opts.copies {
        Some(n) => Copies::Exact(n),
        None => Copies::AutoFit,
    };

    let layout = plan_sheet(
        opts.photo_width_in,
        opts.photo_height_in,
        paper,
        opts.gap_in.unwrap_or(0.1),
        copies,
    )
    .map_err(to_js_error)?;

    serde_wasm_bindgen::to_value(&layout).map_err(|e| make_error("INTERNAL", &e.to_string()))
}

/// Render the HTML print document for a planned sheet.
///
/// @param layout - A layout object returned by `planSheet`
/// @param data - The composed photo bytes
/// @param format - The photo's encoding, "png" or "jpeg"
#[wasm_bindgen(js_name = "printDocument")]
pub fn print_document(layout: JsValue, data: Vec<u8>, format: &str) -> Result<String, JsValue> {
    let layout: SheetLayout = serde_wasm_bindgen::from_value(layout)
        .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid layout: {e}")))?;
    let output = string_to_format(format)?;

    Ok(passfoto::document::render_print_document(
        &layout, &data, output,
    ))
}

/// File name for downloading a composed photo, stamped with the current time.
///
/// @param format_id - A built-in format id, e.g. "eu_35x45"
/// @param options - Optional object with fields: personName, output
#[wasm_bindgen(js_name = "downloadFileName")]
pub fn download_file_name(format_id: &str, options: JsValue) -> Result<String, JsValue> {
    let opts: FileNameOptions = parse_options(options)?;
    let format = builtin_by_id(format_id)?;
    let output = match opts.output {
        Some(ref fmt) => string_to_format(fmt)?,
        None => passfoto::OutputFormat::default(),
    };
    Ok(passfoto::export::download_file_name_now(
        opts.person_name.as_deref(),
        &format,
        output,
    ))
}
