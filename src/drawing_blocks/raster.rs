use crate::error::RenderError;

/// Rasterizes an SVG document to PNG bytes.
///
/// The pixmap is sized from the document's own size times `scale` and filled with
/// `background` before drawing. System fonts are loaded for the labels; on a machine
/// without fonts the text is silently left out.
pub fn svg_to_png(svg: &str, scale: f32, background: &str) -> Result<Vec<u8>, RenderError> {
    let color =
        parse_color(background).ok_or_else(|| RenderError::Background(background.to_string()))?;

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "DejaVu Sans".to_string();

    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::SvgParse(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RenderError::PixmapAlloc { width, height })?;
    pixmap.fill(color);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap
        .encode_png()
        .map_err(|e| RenderError::PngEncode(e.to_string()))
}

/// Accepts `transparent`, `white`, `black` and `#rgb` / `#rrggbb` / `#rrggbbaa` hex colors.
pub fn parse_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
    match hex.len() {
        3 => {
            let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
            Some(tiny_skia::Color::from_rgba8(r * 17, g * 17, b * 17, 255))
        }
        6 => Some(tiny_skia::Color::from_rgba8(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            255,
        )),
        8 => Some(tiny_skia::Color::from_rgba8(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            channel(6, 2)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_parse_color() {
        assert_eq!(
            parse_color("#fff"),
            Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255))
        );
        assert_eq!(
            parse_color("#ff8000"),
            Some(tiny_skia::Color::from_rgba8(255, 128, 0, 255))
        );
        assert_eq!(
            parse_color("#00000080"),
            Some(tiny_skia::Color::from_rgba8(0, 0, 0, 128))
        );
        assert_eq!(parse_color("White"), parse_color("#ffffff"));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("teal"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_svg_to_png() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30" viewBox="0 0 40 30"><circle cx="20" cy="15" r="10" fill="#ffa500"/></svg>"##;
        let png = svg_to_png(svg, 1.0, "white").unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        // IHDR width and height
        assert_eq!(&png[16..20], &40u32.to_be_bytes());
        assert_eq!(&png[20..24], &30u32.to_be_bytes());
    }

    #[test]
    fn test_svg_to_png_errors() {
        assert!(matches!(
            svg_to_png("not svg", 1.0, "white"),
            Err(RenderError::SvgParse(_))
        ));
        assert!(matches!(
            svg_to_png("<svg/>", 1.0, "mauve"),
            Err(RenderError::Background(_))
        ));
    }
}
