use serde::Serialize;
use thiserror::Error;

use crate::request::RequestSource;

pub const DECODE_ERROR: &str = "DECODE_ERROR";
pub const WALLPAPER_ERROR: &str = "WALLPAPER_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Terminal failure of a wallpaper request. None of these are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WallpaperError {
    /// The payload could not be interpreted as an image.
    #[error("{}", decode_message(.origin))]
    Decode { origin: RequestSource },
    /// The image decoded but the platform failed to persist it.
    #[error("Failed to set wallpaper: {0}")]
    Wallpaper(String),
    #[error("Unexpected error: {0}")]
    Unknown(String),
    /// The current platform has no wallpaper capability at all.
    #[error("Wallpaper feature is only available on Android")]
    PlatformUnavailable,
}

fn decode_message(origin: &RequestSource) -> &'static str {
    match origin {
        RequestSource::EncodedImage => "Failed to decode base64 image",
        RequestSource::Path => "Failed to decode image file",
    }
}

impl WallpaperError {
    /// Stable error code reported to the caller. The platform rejection carries none.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Decode { .. } => Some(DECODE_ERROR),
            Self::Wallpaper(_) => Some(WALLPAPER_ERROR),
            Self::Unknown(_) => Some(UNKNOWN_ERROR),
            Self::PlatformUnavailable => None,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<ServiceError> for WallpaperError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Io(message) => Self::Wallpaper(message),
            ServiceError::Other(message) => Self::Unknown(message),
        }
    }
}

/// The `{code, message}` shape a rejected request resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
}

/// Failure raised by a platform wallpaper service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Storage or permission failure while the platform persists the wallpaper.
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
