use std::path::Path;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use log::{debug, info, warn};

use crate::error::WallpaperError;
use crate::request::{normalize_encoded_image, RequestSource, WallpaperRequest};
use crate::service::WallpaperService;

pub const ENCODED_IMAGE_SUCCESS: &str = "Wallpaper set successfully!";
pub const PATH_SUCCESS: &str = "Wallpaper set successfully from file!";

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
/// Line breaks are dropped before decoding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes base64 text the way the host's default decoder does, ignoring ASCII whitespace.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64.decode(compact)
}

/// Normalizes an encoded-image payload and decodes it into raw image bytes.
pub fn decode_encoded_payload(input: &str) -> Result<Vec<u8>, WallpaperError> {
    decode_base64(normalize_encoded_image(input)).map_err(|e| {
        debug!("Base64 payload rejected: {}", e);
        WallpaperError::Decode { origin: RequestSource::EncodedImage }
    })
}

fn success_message(origin: RequestSource) -> &'static str {
    match origin {
        RequestSource::EncodedImage => ENCODED_IMAGE_SUCCESS,
        RequestSource::Path => PATH_SUCCESS,
    }
}

/// Decodes a request's payload and hands the image to the platform service.
///
/// Every call starts fresh and ends in exactly one outcome. Calls are not
/// serialized; two overlapping requests both reach the service and the later
/// `set_bitmap` wins.
pub struct WallpaperApplier<S> {
    service: S,
}

impl<S: WallpaperService> WallpaperApplier<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn set_wallpaper_from_encoded_image(&self, data: &str) -> Result<&'static str, WallpaperError> {
        self.apply(WallpaperRequest::encoded_image(data))
    }

    pub fn set_wallpaper_from_path(&self, path: &str) -> Result<&'static str, WallpaperError> {
        self.apply(WallpaperRequest::path(path))
    }

    pub fn apply(&self, request: WallpaperRequest) -> Result<&'static str, WallpaperError> {
        let origin = request.source();
        match self.try_apply(request) {
            Ok(message) => {
                info!("{}", message);
                Ok(message)
            }
            Err(e) => {
                warn!("Wallpaper request from {:?} rejected ({}): {}", origin, e.code().unwrap_or("-"), e);
                Err(e)
            }
        }
    }

    fn try_apply(&self, request: WallpaperRequest) -> Result<&'static str, WallpaperError> {
        let origin = request.source();
        let decoded = match request.normalized() {
            WallpaperRequest::FromEncodedImage { data } => {
                let bytes = decode_encoded_payload(&data)?;
                debug!("Decoded {} bytes of base64 payload", bytes.len());
                self.service.decode_bytes(&bytes)?
            }
            WallpaperRequest::FromPath { path } => self.service.decode_file(Path::new(&path))?,
        };
        let bitmap = decoded.ok_or(WallpaperError::Decode { origin })?;
        debug!("Bitmap decoded, applying as wallpaper");

        self.service.set_bitmap(&bitmap)?;
        Ok(success_message(origin))
    }

    /// Probes the wallpaper facility. Any probe failure reads as unsupported.
    pub fn is_supported(&self) -> bool {
        match self.service.acquire() {
            Ok(()) => true,
            Err(e) => {
                debug!("Wallpaper service probe failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::memory::MemoryWallpaperService;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        base64::engine::general_purpose::STANDARD.encode(out.into_inner())
    }

    #[test]
    fn lenient_decoder_accepts_missing_padding_and_line_breaks() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVs\nbG8=\n").unwrap(), b"hello");
        assert!(decode_base64("not*base64!").is_err());
    }

    #[test]
    fn lenient_decoder_ignores_trailing_bits() {
        assert_eq!(decode_base64("aGVsbG9=").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVsbG9").unwrap(), b"hello");
    }

    #[test]
    fn data_uri_payload_is_applied() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        let payload = format!("data:image/png;base64,{}", png_base64(4, 5));
        assert_eq!(applier.set_wallpaper_from_encoded_image(&payload), Ok(ENCODED_IMAGE_SUCCESS));
        let current = applier.service().current_wallpaper().unwrap();
        assert_eq!((current.width(), current.height()), (4, 5));
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        let err = applier.set_wallpaper_from_encoded_image("%%%not base64%%%").unwrap_err();
        assert_eq!(err.code(), Some("DECODE_ERROR"));
        assert_eq!(err.to_string(), "Failed to decode base64 image");
        assert_eq!(applier.service().apply_count(), 0);
    }

    #[test]
    fn valid_base64_of_non_image_is_a_decode_error() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        let err = applier.set_wallpaper_from_encoded_image("aGVsbG8gd29ybGQ=").unwrap_err();
        assert_eq!(err, WallpaperError::Decode { origin: RequestSource::EncodedImage });
    }

    #[test]
    fn empty_payload_is_a_decode_error() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        let err = applier.set_wallpaper_from_encoded_image("").unwrap_err();
        assert_eq!(err.code(), Some("DECODE_ERROR"));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        let err = applier.set_wallpaper_from_path("file:///no/such/wallpaper.png").unwrap_err();
        assert_eq!(err, WallpaperError::Decode { origin: RequestSource::Path });
        assert_eq!(err.to_string(), "Failed to decode image file");
    }

    #[test]
    fn io_failure_while_applying_is_a_wallpaper_error() {
        let service = MemoryWallpaperService::new();
        service.fail_apply_with(ServiceError::Io("permission denied".into()));
        let applier = WallpaperApplier::new(service);
        let err = applier.set_wallpaper_from_encoded_image(&png_base64(1, 1)).unwrap_err();
        assert_eq!(err.code(), Some("WALLPAPER_ERROR"));
        assert_eq!(err.to_string(), "Failed to set wallpaper: permission denied");
        assert!(applier.service().current_wallpaper().is_none());
    }

    #[test]
    fn other_failure_while_applying_is_an_unknown_error() {
        let service = MemoryWallpaperService::new();
        service.fail_apply_with(ServiceError::Other("DeadObjectException".into()));
        let applier = WallpaperApplier::new(service);
        let err = applier.set_wallpaper_from_encoded_image(&png_base64(1, 1)).unwrap_err();
        assert_eq!(err.code(), Some("UNKNOWN_ERROR"));
        assert_eq!(err.to_string(), "Unexpected error: DeadObjectException");
    }

    #[test]
    fn second_request_overwrites_first() {
        let applier = WallpaperApplier::new(MemoryWallpaperService::new());
        applier.set_wallpaper_from_encoded_image(&png_base64(2, 2)).unwrap();
        applier.set_wallpaper_from_encoded_image(&png_base64(7, 3)).unwrap();
        let current = applier.service().current_wallpaper().unwrap();
        assert_eq!((current.width(), current.height()), (7, 3));
        assert_eq!(applier.service().apply_count(), 2);
    }

    #[test]
    fn probe_failure_reads_as_unsupported() {
        let service = MemoryWallpaperService::new();
        let applier = WallpaperApplier::new(service);
        assert!(applier.is_supported());
        applier.service().fail_probe_with(ServiceError::Other("no service".into()));
        assert!(!applier.is_supported());
    }
}
