use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use passfoto_wasm::{compose, download_file_name, formats, plan_sheet_js, print_document};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ]);
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let obj = js_sys::Object::new();
    for (key, value) in entries {
        js_sys::Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
    }
    JsValue::from(obj)
}

fn get_u32(obj: &JsValue, key: &str) -> u32 {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .unwrap()
        .as_f64()
        .unwrap() as u32
}

fn get_data(obj: &JsValue) -> Vec<u8> {
    let data = js_sys::Reflect::get(obj, &JsValue::from_str("data")).unwrap();
    js_sys::Uint8Array::from(data).to_vec()
}

#[wasm_bindgen_test]
fn compose_defaults_to_eu_dimensions() {
    let png = make_test_png(200, 300);
    let result = compose(png.clone(), JsValue::NULL).unwrap();

    assert_eq!(get_u32(&result, "width"), 413);
    assert_eq!(get_u32(&result, "height"), 531);
    assert_eq!(get_u32(&result, "originalSize"), png.len() as u32);
    assert!(!get_data(&result).is_empty());
}

#[wasm_bindgen_test]
fn compose_with_format_id() {
    let png = make_test_png(300, 300);
    let opts = options(&[("formatId", JsValue::from_str("us_2x2"))]);
    let result = compose(png, opts).unwrap();

    assert_eq!(get_u32(&result, "width"), 600);
    assert_eq!(get_u32(&result, "height"), 600);
}

#[wasm_bindgen_test]
fn compose_with_watermark_changes_output() {
    let png = make_test_png(200, 300);
    let plain = compose(png.clone(), JsValue::NULL).unwrap();
    let opts = options(&[("watermark", JsValue::from_str("SPECIMEN"))]);
    let marked = compose(png, opts).unwrap();

    assert_ne!(get_data(&plain), get_data(&marked));
}

#[wasm_bindgen_test]
fn compose_jpeg_output() {
    let png = make_test_png(200, 300);
    let opts = options(&[
        ("output", JsValue::from_str("jpeg")),
        ("quality", JsValue::from_f64(0.9)),
    ]);
    let result = compose(png, opts).unwrap();
    let data = get_data(&result);

    assert_eq!(data[0], 0xFF);
    assert_eq!(data[1], 0xD8);
}

#[wasm_bindgen_test]
fn invalid_input_returns_coded_error() {
    let err = compose(b"not an image".to_vec(), JsValue::NULL).unwrap_err();
    let code = js_sys::Reflect::get(&err, &JsValue::from_str("code")).unwrap();
    assert_eq!(code.as_string().unwrap(), "DECODE_ERROR");
}

#[wasm_bindgen_test]
fn unknown_format_id_is_rejected() {
    let png = make_test_png(100, 100);
    let opts = options(&[("formatId", JsValue::from_str("nope"))]);
    let err = compose(png, opts).unwrap_err();
    let code = js_sys::Reflect::get(&err, &JsValue::from_str("code")).unwrap();
    assert_eq!(code.as_string().unwrap(), "INVALID_OPTIONS");
}

#[wasm_bindgen_test]
fn formats_lists_the_builtins() {
    let list = js_sys::Array::from(&formats().unwrap());
    assert_eq!(list.length(), 4);
    let first = list.get(0);
    let id = js_sys::Reflect::get(&first, &JsValue::from_str("id")).unwrap();
    assert_eq!(id.as_string().unwrap(), "eu_35x45");
    let ids: Vec<_> = (0..list.length())
        .map(|i| {
            js_sys::Reflect::get(&list.get(i), &JsValue::from_str("id"))
                .unwrap()
                .as_string()
                .unwrap()
        })
        .collect();
    assert!(ids.contains(&"jp_35x45".to_string()));
}

#[wasm_bindgen_test]
fn plan_sheet_auto_fits_eu_on_default_paper() {
    let opts = options(&[
        ("photoWidthIn", JsValue::from_f64(1.378)),
        ("photoHeightIn", JsValue::from_f64(1.772)),
    ]);
    let layout = plan_sheet_js(opts).unwrap();

    assert_eq!(get_u32(&layout, "cols"), 4);
    assert_eq!(get_u32(&layout, "rows"), 2);
    assert_eq!(get_u32(&layout, "count"), 8);
}

#[wasm_bindgen_test]
fn plan_sheet_exact_copies_flow_into_the_document() {
    let opts = options(&[
        ("photoWidthIn", JsValue::from_f64(2.0)),
        ("photoHeightIn", JsValue::from_f64(2.0)),
        ("copies", JsValue::from_f64(6.0)),
    ]);
    let layout = plan_sheet_js(opts).unwrap();
    assert_eq!(get_u32(&layout, "count"), 6);

    let png = make_test_png(300, 300);
    let photo = compose(png, JsValue::NULL).unwrap();
    let doc = print_document(layout, get_data(&photo), "png").unwrap();
    assert_eq!(doc.matches("class=\"tile\"").count(), 6);
    assert!(doc.contains("data:image/png;base64,"));
}

#[wasm_bindgen_test]
fn download_file_name_has_expected_shape() {
    let opts = options(&[
        ("personName", JsValue::from_str("Jane Doe")),
        ("output", JsValue::from_str("jpeg")),
    ]);
    let name = download_file_name("eu_35x45", opts).unwrap();
    assert!(name.starts_with("jane_doe-passport-eu_35x45-413x531-"));
    assert!(name.ends_with(".jpg"));
}
