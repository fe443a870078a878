//! System clipboard binding
//!
//! Clipboard images arrive as raw RGBA pixels and are stored as PNG. Without
//! the `clipboard` feature the clipboard never holds an image.

use snapnote_core::capability::Clipboard;
use snapnote_core::error::{Result, SnapnoteError};
use snapnote_core::store::ImageBuffer;

/// The system clipboard, read through arboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArboardClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for ArboardClipboard {
    fn has_image(&self) -> bool {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_image())
            .is_ok()
    }

    fn read_image(&self) -> Result<ImageBuffer> {
        let image = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_image())
            .map_err(|e| SnapnoteError::ImageUnavailable(e.to_string()))?;
        log::debug!("Clipboard image is {}x{}", image.width, image.height);
        encode_png(image.width, image.height, image.bytes.into_owned())
    }
}

#[cfg(not(feature = "clipboard"))]
impl Clipboard for ArboardClipboard {
    fn has_image(&self) -> bool {
        false
    }

    fn read_image(&self) -> Result<ImageBuffer> {
        Err(SnapnoteError::ImageUnavailable(
            "clipboard support is not enabled in this build".to_string(),
        ))
    }
}

/// Encode RGBA pixels as PNG.
#[cfg(feature = "clipboard")]
pub fn encode_png(width: usize, height: usize, rgba: Vec<u8>) -> Result<ImageBuffer> {
    use std::io::Cursor;

    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(SnapnoteError::Unknown(format!(
            "Clipboard image is too large ({}x{})",
            width, height
        )));
    };
    let pixels = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        SnapnoteError::Unknown("Clipboard image has an unexpected pixel layout".to_string())
    })?;

    let mut png = Cursor::new(Vec::new());
    pixels
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| SnapnoteError::Unknown(format!("Could not encode clipboard image: {}", e)))?;
    Ok(ImageBuffer::new(png.into_inner()))
}

#[cfg(all(test, feature = "clipboard"))]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_pixel() {
        let png = encode_png(1, 1, vec![255, 0, 0, 255]).unwrap();
        assert!(png.as_bytes().starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let err = encode_png(2, 2, vec![0; 4]).unwrap_err();
        assert_eq!(err.kind(), "Unknown");
    }
}
