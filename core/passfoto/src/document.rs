//! Print document generation.
//!
//! Renders a [`SheetLayout`] plus the encoded photo bytes into a
//! self-contained HTML document with physical (inch) units, ready to hand to
//! the platform's print facility. The photo is embedded once as a base64
//! `data:` URI in the stylesheet; tiles reference it as a background
//! stretched to the tile box, so a pixel/print aspect mismatch stretches the
//! raster rather than failing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::layout::{SheetLayout, PAGE_MARGIN_IN};
use crate::OutputFormat;

/// Render the print document for a planned sheet.
///
/// `data` is the encoded photo in `format` — typically a
/// [`ComposedPhoto`](crate::ComposedPhoto)'s `data`/`format` pair. The page
/// is sized to the chosen paper orientation with a fixed [`PAGE_MARGIN_IN`]
/// margin; copies wrap at the layout's column count with the uniform gap in
/// both axes, and each tile carries corner cut marks of the layout's mark
/// length. Copies beyond the page overflow onto further pages at the
/// printer's discretion.
pub fn render_print_document(layout: &SheetLayout, data: &[u8], format: OutputFormat) -> String {
    let mime = match format {
        OutputFormat::Png => "image/png",
        OutputFormat::Jpeg => "image/jpeg",
    };
    let encoded = STANDARD.encode(data);

    let content_width_in =
        layout.cols as f64 * layout.tile_width_in + (layout.cols - 1) as f64 * layout.gap_in;

    let mut doc = String::new();
    doc.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<title>Print sheet</title>\n<style>\n");
    doc.push_str(&format!(
        "@page {{ size: {:.4}in {:.4}in; margin: {}in; }}\n",
        layout.paper_width_in, layout.paper_height_in, PAGE_MARGIN_IN
    ));
    doc.push_str("* { box-sizing: border-box; }\nbody { margin: 0; }\n");
    doc.push_str(&format!(
        ".sheet {{ display: flex; flex-wrap: wrap; gap: {:.4}in; width: {:.4}in; }}\n",
        layout.gap_in, content_width_in
    ));
    doc.push_str(&format!(
        ".tile {{ position: relative; width: {:.4}in; height: {:.4}in; \
         background-image: url(\"data:{};base64,{}\"); background-size: 100% 100%; }}\n",
        layout.tile_width_in, layout.tile_height_in, mime, encoded
    ));

    let has_marks = layout.cut_mark_in > 0.0;
    if has_marks {
        let c = layout.cut_mark_in;
        doc.push_str(&format!(
            ".cm {{ position: absolute; width: {c:.4}in; height: {c:.4}in; }}\n"
        ));
        doc.push_str(&format!(
            ".tl {{ left: -{c:.4}in; top: -{c:.4}in; \
             border-right: 0.5pt solid #000; border-bottom: 0.5pt solid #000; }}\n"
        ));
        doc.push_str(&format!(
            ".tr {{ right: -{c:.4}in; top: -{c:.4}in; \
             border-left: 0.5pt solid #000; border-bottom: 0.5pt solid #000; }}\n"
        ));
        doc.push_str(&format!(
            ".bl {{ left: -{c:.4}in; bottom: -{c:.4}in; \
             border-right: 0.5pt solid #000; border-top: 0.5pt solid #000; }}\n"
        ));
        doc.push_str(&format!(
            ".br {{ right: -{c:.4}in; bottom: -{c:.4}in; \
             border-left: 0.5pt solid #000; border-top: 0.5pt solid #000; }}\n"
        ));
    }

    doc.push_str("</style>\n</head>\n<body>\n<div class=\"sheet\">\n");
    for _ in 0..layout.count {
        if has_marks {
            doc.push_str(
                "<div class=\"tile\"><i class=\"cm tl\"></i><i class=\"cm tr\"></i>\
                 <i class=\"cm bl\"></i><i class=\"cm br\"></i></div>\n",
            );
        } else {
            doc.push_str("<div class=\"tile\"></div>\n");
        }
    }
    doc.push_str("</div>\n</body>\n</html>\n");

    doc
}
