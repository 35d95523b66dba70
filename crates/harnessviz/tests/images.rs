//! Image sizing against real files

use harnessviz::markup::image_cell;
use harnessviz::model::{aspect_ratio, Image, ImageConfig, ImageScale};
use image::{ImageBuffer, Rgb, Rgba};
use tempfile::TempDir;

fn write_png(dir: &TempDir, width: u32, height: u32) -> String {
    let path = dir.path().join("picture.png");
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    buffer.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_aspect_ratio_of_file() {
    let dir = TempDir::new().unwrap();
    let src = write_png(&dir, 40, 20);
    assert_eq!(aspect_ratio(&src), 2.0);
}

#[test]
fn test_aspect_ratio_of_bmp_and_gif() {
    let dir = TempDir::new().unwrap();
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(30, 60);
    for name in ["picture.bmp", "picture.gif"] {
        let path = dir.path().join(name);
        buffer.save(&path).unwrap();
        assert_eq!(aspect_ratio(&path), 0.5, "{}", name);
    }
}

#[test]
fn test_missing_file_assumes_square() {
    let dir = TempDir::new().unwrap();
    assert_eq!(aspect_ratio(dir.path().join("missing.png")), 1.0);
}

#[test]
fn test_height_from_width() {
    let dir = TempDir::new().unwrap();
    let src = write_png(&dir, 40, 20);
    let image = Image::from_config(ImageConfig {
        src,
        width: Some(100.0),
        ..Default::default()
    });
    assert!(image.fixedsize);
    assert_eq!(image.scale, ImageScale::True);
    assert_eq!(image.height, Some(50.0));

    let cell = image_cell(Some(&image)).unwrap();
    assert!(cell
        .content
        .contains("width=\"100\" height=\"50\" fixedsize=\"true\""));
}

#[test]
fn test_width_from_height() {
    let dir = TempDir::new().unwrap();
    let src = write_png(&dir, 40, 20);
    let image = Image::from_config(ImageConfig {
        src,
        height: Some(30.0),
        ..Default::default()
    });
    assert_eq!(image.width, Some(60.0));
}

#[test]
fn test_explicit_scale_keeps_given_size() {
    let dir = TempDir::new().unwrap();
    let src = write_png(&dir, 40, 20);
    let image = Image::from_config(ImageConfig {
        src,
        width: Some(100.0),
        scale: Some(ImageScale::Width),
        ..Default::default()
    });
    assert!(!image.fixedsize);
    assert_eq!(image.height, None);
}

#[test]
fn test_both_dimensions_scale_both() {
    let image = Image::from_config(ImageConfig {
        src: "any.png".to_string(),
        width: Some(10.0),
        height: Some(20.0),
        ..Default::default()
    });
    assert_eq!(image.scale, ImageScale::Both);
    assert!(!image.fixedsize);
}
