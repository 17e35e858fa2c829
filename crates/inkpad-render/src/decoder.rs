//! Image upload decoding backed by the `image` crate.

use crate::error::{RenderError, RenderResult};
use inkpad_core::export::parse_base64_data_url;
use inkpad_core::shapes::ImageFormat;
use inkpad_core::{BoxFuture, DecodedImage, EditorError, EditorResult, ImageDecoder};

/// Decodes PNG, JPEG and WebP uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterImageDecoder;

impl RasterImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RasterImageDecoder {
    fn decode(&self, data_url: String) -> BoxFuture<'static, EditorResult<DecodedImage>> {
        Box::pin(async move {
            decode_data_url(&data_url).map_err(|e| EditorError::ImageDecode(e.to_string()))
        })
    }
}

/// Decode a base64 image `data:` URL and read its pixel size.
pub fn decode_data_url(data_url: &str) -> RenderResult<DecodedImage> {
    let (mime, data) = parse_base64_data_url(data_url).ok_or(RenderError::InvalidDataUrl)?;
    let format = ImageFormat::from_mime(&mime)
        .or_else(|| ImageFormat::from_magic_bytes(&data))
        .ok_or_else(|| RenderError::UnsupportedFormat(mime.clone()))?;
    let decoded = image::load_from_memory_with_format(&data, codec_format(format))?;
    log::debug!(
        "Decoded {} upload: {}x{}",
        format.mime_type(),
        decoded.width(),
        decoded.height()
    );
    Ok(DecodedImage {
        width: decoded.width(),
        height: decoded.height(),
        data,
        format,
    })
}

/// The `image` crate's name for a stored format.
pub(crate) fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::export::base64_data_url;
    use std::io::Cursor;

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode");
        bytes
    }

    #[test]
    fn test_decode_png_dimensions() {
        let png = tiny_png(7, 3);
        let decoded = decode_data_url(&base64_data_url("image/png", &png)).expect("decode");
        assert_eq!((decoded.width, decoded.height), (7, 3));
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.data, png);
    }

    #[test]
    fn test_unknown_mime_falls_back_to_magic_bytes() {
        let png = tiny_png(2, 2);
        let url = base64_data_url("application/octet-stream", &png);
        assert_eq!(decode_data_url(&url).expect("decode").format, ImageFormat::Png);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            decode_data_url("not a url"),
            Err(RenderError::InvalidDataUrl)
        ));
        let url = base64_data_url("text/plain", b"hello world");
        assert!(matches!(
            decode_data_url(&url),
            Err(RenderError::UnsupportedFormat(_))
        ));
        let url = base64_data_url("image/png", b"\x89PNG broken");
        assert!(matches!(decode_data_url(&url), Err(RenderError::Image(_))));
    }

    #[test]
    fn test_decoder_future_maps_errors() {
        let decoder = RasterImageDecoder::new();
        let result = pollster::block_on(decoder.decode("data:,".to_string()));
        assert!(matches!(result, Err(EditorError::ImageDecode(_))));

        let png = tiny_png(4, 4);
        let result = pollster::block_on(decoder.decode(base64_data_url("image/png", &png)));
        assert_eq!(result.expect("decoded").width, 4);
    }
}
