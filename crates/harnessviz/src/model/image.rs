//! Images embedded in connector and cable nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{trace, warn};

use crate::core::de;

/// How an image scales inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScaleValue", into = "String")]
pub enum ImageScale {
    False,
    True,
    Width,
    Height,
    Both,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaleValue {
    Flag(bool),
    Name(String),
}

impl TryFrom<ScaleValue> for ImageScale {
    type Error = String;

    fn try_from(value: ScaleValue) -> Result<Self, Self::Error> {
        match value {
            ScaleValue::Flag(true) => Ok(Self::True),
            ScaleValue::Flag(false) => Ok(Self::False),
            ScaleValue::Name(name) => name.parse(),
        }
    }
}

impl FromStr for ImageScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "false" => Ok(Self::False),
            "true" => Ok(Self::True),
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown image scale: {}", s)),
        }
    }
}

impl fmt::Display for ImageScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::False => "false",
            Self::True => "true",
            Self::Width => "width",
            Self::Height => "height",
            Self::Both => "both",
        };
        write!(f, "{}", name)
    }
}

impl From<ImageScale> for String {
    fn from(value: ImageScale) -> Self {
        value.to_string()
    }
}

/// Image settings as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    pub src: String,
    #[serde(default)]
    pub scale: Option<ImageScale>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub fixedsize: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub bgcolor: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub caption: Option<String>,
}

/// Image with scale, size and fixedsize resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    pub scale: ImageScale,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fixedsize: bool,
    pub bgcolor: Option<String>,
    pub caption: Option<String>,
}

impl Image {
    /// Resolve an image configuration
    ///
    /// With `fixedsize` and a single dimension, the other dimension is taken
    /// from the aspect ratio of the file at `src`.
    pub fn from_config(config: ImageConfig) -> Self {
        let width = config.width.filter(|w| *w > 0.0);
        let height = config.height.filter(|h| *h > 0.0);
        let one_dimension = width.is_some() != height.is_some();

        let fixedsize = config
            .fixedsize
            .unwrap_or(one_dimension && config.scale.is_none());

        let scale = config.scale.unwrap_or(match (width, height) {
            (None, None) => ImageScale::False,
            (Some(_), Some(_)) => ImageScale::Both,
            _ => ImageScale::True,
        });

        let (width, height) = match (fixedsize, width, height) {
            (true, None, Some(h)) => (Some(h * aspect_ratio(&config.src)), Some(h)),
            (true, Some(w), None) => (Some(w), Some(w / aspect_ratio(&config.src))),
            (_, w, h) => (w, h),
        };

        trace!(src = %config.src, %scale, fixedsize, ?width, ?height, "Resolved image");

        Self {
            src: config.src,
            scale,
            width,
            height,
            fixedsize,
            bgcolor: config.bgcolor.filter(|c| !c.is_empty()),
            caption: config.caption.filter(|c| !c.is_empty()),
        }
    }
}

/// Width over height of the image at `path`, or 1.0 if it cannot be read
pub fn aspect_ratio(path: impl AsRef<Path>) -> f64 {
    let path = path.as_ref();
    match image::image_dimensions(path) {
        Ok((width, height)) if width > 0 && height > 0 => f64::from(width) / f64::from(height),
        Ok((width, height)) => {
            warn!(path = %path.display(), width, height, "Invalid image size, assuming 1:1");
            1.0
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "Unable to read image size, assuming 1:1");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: Option<f64>, height: Option<f64>) -> ImageConfig {
        ImageConfig {
            src: "does/not/exist.png".to_string(),
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_dimensions() {
        let image = Image::from_config(config(None, None));
        assert_eq!(image.scale, ImageScale::False);
        assert!(!image.fixedsize);
        assert_eq!(image.width, None);
    }

    #[test]
    fn test_both_dimensions() {
        let image = Image::from_config(config(Some(100.0), Some(50.0)));
        assert_eq!(image.scale, ImageScale::Both);
        assert!(!image.fixedsize);
        assert_eq!((image.width, image.height), (Some(100.0), Some(50.0)));
    }

    #[test]
    fn test_one_dimension_unreadable_file_is_square() {
        let image = Image::from_config(config(Some(80.0), None));
        assert_eq!(image.scale, ImageScale::True);
        assert!(image.fixedsize);
        assert_eq!(image.height, Some(80.0));
    }

    #[test]
    fn test_explicit_scale_disables_fixedsize() {
        let mut cfg = config(None, Some(40.0));
        cfg.scale = Some(ImageScale::Height);
        let image = Image::from_config(cfg);
        assert!(!image.fixedsize);
        assert_eq!(image.scale, ImageScale::Height);
        assert_eq!(image.width, None);
    }

    #[test]
    fn test_scale_from_yaml_bool() {
        let cfg: ImageConfig =
            serde_json::from_str(r#"{"src": "a.png", "scale": true}"#).unwrap();
        assert_eq!(cfg.scale, Some(ImageScale::True));
        let cfg: ImageConfig =
            serde_json::from_str(r#"{"src": "a.png", "scale": "both"}"#).unwrap();
        assert_eq!(cfg.scale, Some(ImageScale::Both));
        assert!(serde_json::from_str::<ImageConfig>(r#"{"src": "a.png", "scale": "fit"}"#).is_err());
    }
}
