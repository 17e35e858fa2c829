//! Export formats, quality presets and download artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats offered by the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
    Doc,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Svg,
        ExportFormat::Pdf,
        ExportFormat::Doc,
    ];

    /// File extension appended to the chosen file name.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Doc => "doc",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Doc => "application/msword",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            "doc" => Ok(ExportFormat::Doc),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Raster quality presets. Each maps to a resolution multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ImageQuality {
    #[default]
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "2160p")]
    UltraHd,
    #[serde(rename = "4K")]
    FourK,
    #[serde(rename = "8K")]
    EightK,
}

impl ImageQuality {
    pub fn multiplier(&self) -> u32 {
        match self {
            ImageQuality::FullHd => 1,
            ImageQuality::UltraHd => 2,
            ImageQuality::FourK => 4,
            ImageQuality::EightK => 8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageQuality::FullHd => "1080p",
            ImageQuality::UltraHd => "2160p",
            ImageQuality::FourK => "4K",
            ImageQuality::EightK => "8K",
        }
    }

    /// Parse a quality label. Unknown labels fall back to 1080p.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "2160p" => ImageQuality::UltraHd,
            "4K" | "4k" => ImageQuality::FourK,
            "8K" | "8k" => ImageQuality::EightK,
            "1080p" => ImageQuality::FullHd,
            other => {
                log::debug!("Unknown image quality '{other}', using 1080p");
                ImageQuality::FullHd
            }
        }
    }
}

impl From<String> for ImageQuality {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A finished export, ready for the host's download mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// `<name>.<extension>`
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// `data:` URL carrying the same content.
    pub data_url: String,
}

impl ExportArtifact {
    /// Build a binary artifact with a base64 data URL.
    pub fn binary(file_name: String, format: ExportFormat, bytes: Vec<u8>) -> Self {
        let data_url = base64_data_url(format.mime_type(), &bytes);
        Self {
            file_name,
            mime_type: format.mime_type(),
            bytes,
            data_url,
        }
    }

    /// Build an SVG artifact with a percent-encoded data URL.
    pub fn svg(file_name: String, svg: String) -> Self {
        let data_url = svg_data_url(&svg);
        Self {
            file_name,
            mime_type: ExportFormat::Svg.mime_type(),
            bytes: svg.into_bytes(),
            data_url,
        }
    }
}

/// Encode bytes as a base64 `data:` URL.
pub fn base64_data_url(mime_type: &str, bytes: &[u8]) -> String {
    use base64::{Engine, engine::general_purpose::STANDARD};
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Encode an SVG document as a percent-encoded UTF-8 `data:` URL.
pub fn svg_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        urlencoding::encode(svg)
    )
}

/// Split a base64 `data:` URL into its MIME type and decoded bytes.
pub fn parse_base64_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_multipliers() {
        assert_eq!(ImageQuality::from_label("1080p").multiplier(), 1);
        assert_eq!(ImageQuality::from_label("2160p").multiplier(), 2);
        assert_eq!(ImageQuality::from_label("4K").multiplier(), 4);
        assert_eq!(ImageQuality::from_label("8K").multiplier(), 8);
        assert_eq!(ImageQuality::from_label("720p").multiplier(), 1);
    }

    #[test]
    fn test_quality_serde_labels() {
        let quality: ImageQuality = serde_json::from_str("\"4K\"").expect("label");
        assert_eq!(quality, ImageQuality::FourK);
        let quality: ImageQuality = serde_json::from_str("\"720p\"").expect("fallback");
        assert_eq!(quality, ImageQuality::FullHd);
        assert_eq!(serde_json::to_string(&ImageQuality::UltraHd).expect("json"), "\"2160p\"");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Png));
        assert_eq!("jpg".parse::<ExportFormat>(), Ok(ExportFormat::Jpeg));
        assert!("gif".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Jpeg.extension(), "jpeg");
    }

    #[test]
    fn test_svg_data_url_is_percent_encoded() {
        let url = svg_data_url("<svg a=\"b\"/>");
        assert_eq!(url, "data:image/svg+xml;charset=utf-8,%3Csvg%20a%3D%22b%22%2F%3E");
    }

    #[test]
    fn test_base64_data_url_parse() {
        let url = base64_data_url("image/png", &[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
        let (mime, bytes) = parse_base64_data_url(&url).expect("parse");
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
        assert!(parse_base64_data_url("data:text/plain,hello").is_none());
    }

    #[test]
    fn test_artifacts() {
        let png = ExportArtifact::binary("a.png".into(), ExportFormat::Png, vec![1]);
        assert_eq!(png.mime_type, "image/png");
        assert!(png.data_url.starts_with("data:image/png;base64,"));

        let svg = ExportArtifact::svg("a.svg".into(), "<svg/>".into());
        assert_eq!(svg.bytes, b"<svg/>".to_vec());
        assert!(svg.data_url.starts_with("data:image/svg+xml;charset=utf-8,"));
    }
}
