use serde::Serialize;

/// Host platform as far as wallpaper support is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    /// Any platform without a wallpaper implementation.
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }

    pub fn has_wallpaper_capability(self) -> bool {
        matches!(self, Platform::Android)
    }
}
