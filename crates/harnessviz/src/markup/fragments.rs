//! Cells for titles, color bars, images and captions

use super::table::{render_attrs, Cell};
use crate::core::{format_number, line_breaks, translate_color, ColorMode};
use crate::model::Image;

/// `bgcolor` attribute for a color, or `None` when no color is set
pub fn bgcolor_attr(color: Option<&str>) -> Option<(String, String)> {
    color
        .filter(|c| !c.is_empty())
        .map(|c| ("bgcolor".to_string(), translate_color(c, ColorMode::hex())))
}

/// Cell holding `content`, shaded with `bgcolor` when one is set
pub fn title_cell(content: impl Into<String>, bgcolor: Option<&str>) -> Cell {
    Cell::new(content).with_attrs(bgcolor_attr(bgcolor))
}

/// Narrow swatch showing a color, or `None` without a color
pub fn colorbar_cell(color: Option<&str>) -> Option<Cell> {
    let bgcolor = bgcolor_attr(color)?;
    Some(Cell::empty().with_attrs([bgcolor]).with_attr("width", "4"))
}

fn size_attrs(image: &Image) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    if let Some(width) = image.width {
        attrs.push(("width".to_string(), format_number(width)));
    }
    if let Some(height) = image.height {
        attrs.push(("height".to_string(), format_number(height)));
    }
    if image.fixedsize {
        attrs.push(("fixedsize".to_string(), "true".to_string()));
    }
    attrs
}

/// Cell showing an image
///
/// A fixed-size image is wrapped in a borderless inner table so that a
/// narrow image does not shrink the surrounding cell.
pub fn image_cell(image: Option<&Image>) -> Option<Cell> {
    let image = image?;
    let mut cell = Cell::empty();
    if image.caption.is_some() {
        cell = cell.with_attr("sides", "TLR");
    }
    cell = cell.with_attrs(bgcolor_attr(image.bgcolor.as_deref()));

    let img = format!("<img scale=\"{}\" src=\"{}\"/>", image.scale, image.src);
    if image.fixedsize {
        let inner_attrs = render_attrs(
            size_attrs(image)
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        cell.content = [
            String::new(),
            "    <table border=\"0\" cellspacing=\"0\" cellborder=\"0\"><tr>".to_string(),
            format!("     <td{}>{}</td>", inner_attrs, img),
            "    </tr></table>".to_string(),
            "   ".to_string(),
        ]
        .join("\n");
    } else {
        cell = cell.with_attrs(size_attrs(image));
        cell.content = img;
    }
    Some(cell)
}

/// Cell showing the caption under an image, if there is one
pub fn caption_cell(image: Option<&Image>) -> Option<Cell> {
    let image = image?;
    let caption = image.caption.as_deref()?;
    Some(
        Cell::new(line_breaks(caption))
            .with_attr("sides", "BLR")
            .with_attrs(bgcolor_attr(image.bgcolor.as_deref())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageScale;

    fn image(width: Option<f64>, height: Option<f64>, fixedsize: bool) -> Image {
        Image {
            src: "pic.png".to_string(),
            scale: ImageScale::True,
            width,
            height,
            fixedsize,
            bgcolor: None,
            caption: None,
        }
    }

    #[test]
    fn test_bgcolor_attr() {
        assert_eq!(
            bgcolor_attr(Some("RD")),
            Some(("bgcolor".to_string(), "#ff0000".to_string()))
        );
        assert_eq!(bgcolor_attr(Some("")), None);
        assert_eq!(bgcolor_attr(None), None);
    }

    #[test]
    fn test_colorbar() {
        let cell = colorbar_cell(Some("BU")).unwrap();
        assert_eq!(cell.attr_string(), " bgcolor=\"#0066ff\" width=\"4\"");
        assert!(cell.content.is_empty());
        assert!(colorbar_cell(None).is_none());
    }

    #[test]
    fn test_image_without_fixedsize() {
        let cell = image_cell(Some(&image(Some(100.0), Some(50.0), false))).unwrap();
        assert_eq!(cell.attr_string(), " width=\"100\" height=\"50\"");
        assert_eq!(cell.content, "<img scale=\"true\" src=\"pic.png\"/>");
    }

    #[test]
    fn test_fixedsize_image_wrapped_in_table() {
        let cell = image_cell(Some(&image(Some(60.0), Some(30.0), true))).unwrap();
        assert_eq!(cell.attr_string(), "");
        assert!(cell.content.contains(
            "<td width=\"60\" height=\"30\" fixedsize=\"true\"><img scale=\"true\" src=\"pic.png\"/></td>"
        ));
        assert!(cell.content.contains("cellborder=\"0\""));
    }

    #[test]
    fn test_caption() {
        let mut img = image(None, None, false);
        assert!(caption_cell(Some(&img)).is_none());
        img.caption = Some("Front\n<a href=\"x\">view</a>".to_string());
        img.bgcolor = Some("YE".to_string());
        let caption = caption_cell(Some(&img)).unwrap();
        assert_eq!(caption.content, "Front<br />view");
        assert_eq!(caption.attr_string(), " sides=\"BLR\" bgcolor=\"#ffff00\"");
        let picture = image_cell(Some(&img)).unwrap();
        assert!(picture.attr_string().starts_with(" sides=\"TLR\""));
        assert!(image_cell(None).is_none());
    }
}
