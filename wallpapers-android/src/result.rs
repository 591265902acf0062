use serde::Serialize;
use wallpapers_core::WallpaperError;

/// Outcome of a native call, handed back to the host as JSON so it can resolve
/// or reject its promise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
}

impl BridgeResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize bridge result: {}", e);
            r#"{"ok":false,"code":"UNKNOWN_ERROR","message":"Unexpected error: serialization failed"}"#.to_string()
        })
    }
}

impl From<Result<&'static str, WallpaperError>> for BridgeResult {
    fn from(result: Result<&'static str, WallpaperError>) -> Self {
        match result {
            Ok(message) => Self {
                ok: true,
                code: None,
                message: message.to_string(),
            },
            Err(err) => {
                let payload = err.payload();
                Self {
                    ok: false,
                    code: payload.code,
                    message: payload.message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallpapers_core::{RequestSource, ENCODED_IMAGE_SUCCESS};

    #[test]
    fn success_serializes_without_code() {
        let result = BridgeResult::from(Ok(ENCODED_IMAGE_SUCCESS));
        assert_eq!(result.to_json(), r#"{"ok":true,"message":"Wallpaper set successfully!"}"#);
    }

    #[test]
    fn rejection_carries_code() {
        let result = BridgeResult::from(Err(WallpaperError::Decode { origin: RequestSource::Path }));
        assert_eq!(
            result.to_json(),
            r#"{"ok":false,"code":"DECODE_ERROR","message":"Failed to decode image file"}"#
        );
    }

    #[test]
    fn wallpaper_error_keeps_detail() {
        let result = BridgeResult::from(Err(WallpaperError::Wallpaper("EACCES".into())));
        assert_eq!(result.code, Some("WALLPAPER_ERROR"));
        assert_eq!(result.message, "Failed to set wallpaper: EACCES");
    }
}
