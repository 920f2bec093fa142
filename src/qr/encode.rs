use std::io::Cursor;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

/// Render `data` as a PNG QR code and return it as a base64 data URI.
pub fn encode_data_uri(data: &str) -> anyhow::Result<String> {
    let code = QrCode::new(data.as_bytes()).context("build qr code")?;
    let img = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("encode png")?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "data:image/png;base64,";

    #[test]
    fn encodes_text_to_png_data_uri() {
        let uri = encode_data_uri("hello").unwrap();
        assert!(uri.starts_with(PREFIX));
        assert!(uri.len() > PREFIX.len());

        let png = STANDARD.decode(&uri[PREFIX.len()..]).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn distinct_inputs_yield_distinct_images() {
        let a = encode_data_uri("hello").unwrap();
        let b = encode_data_uri("world").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn handles_long_input() {
        let long = "x".repeat(1000);
        let uri = encode_data_uri(&long).unwrap();
        assert!(uri.starts_with(PREFIX));
    }
}
