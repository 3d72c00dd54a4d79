//! Avatar thumbnails attached to outgoing chat events.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use image::imageops::FilterType;

pub const THUMBNAIL_SIZE: u32 = 100;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Resizes a base64 data URL image to exactly `width` x `height` and returns it
/// as a PNG data URL. Anything that is not a data URL (a plain link or the
/// default placeholder) is returned unchanged.
pub fn resize(src: &str, width: u32, height: u32) -> super::Result<String> {
    let Some(rest) = src.strip_prefix(DATA_URL_SCHEME) else {
        return Ok(src.to_owned());
    };

    let (_, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| super::Error::InvalidAvatar("expected a base64 data url".into()))?;

    let bytes = STANDARD.decode(payload.trim())?;
    let resized = image::load_from_memory(&bytes)?.resize_exact(width, height, FilterType::Triangle);

    let mut png = Cursor::new(Vec::new());
    resized.write_to(&mut png, ImageFormat::Png)?;

    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

pub fn thumbnail(src: &str) -> super::Result<String> {
    resize(src, THUMBNAIL_SIZE, THUMBNAIL_SIZE)
}

#[cfg(test)]
mod test {
    use image::{GenericImageView, Rgb, RgbImage};

    use super::*;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = RgbImage::from_pixel(width, height, Rgb([12, 200, 90]));
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner()))
    }

    fn decode(data_url: &str) -> image::DynamicImage {
        let (_, payload) = data_url.split_once(BASE64_MARKER).unwrap();
        image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn should_resize_to_exact_dimensions() {
        let src = png_data_url(320, 40);

        let actual = thumbnail(&src).unwrap();

        assert!(actual.starts_with("data:image/png;base64,"));
        assert_eq!(decode(&actual).dimensions(), (100, 100));
    }

    #[test]
    fn should_pass_through_plain_links() {
        let actual = thumbnail(crate::user::DEFAULT_AVATAR).unwrap();

        assert_eq!(actual, crate::user::DEFAULT_AVATAR);
    }

    #[test]
    fn should_reject_data_url_without_base64_payload() {
        let actual = thumbnail("data:image/png,rawbytes");

        assert!(matches!(actual, Err(crate::user::Error::InvalidAvatar(_))));
    }

    #[test]
    fn should_reject_undecodable_image() {
        let garbage = format!("data:image/png;base64,{}", STANDARD.encode(b"not a png"));

        assert!(thumbnail(&garbage).is_err());
    }
}
