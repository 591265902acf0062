use std::sync::Arc;

use log::{debug, error};
use tokio::task;

use crate::applier::WallpaperApplier;
use crate::error::WallpaperError;
use crate::platform::Platform;
use crate::service::WallpaperService;

/// Caller-facing wallpaper operations with platform gating.
///
/// On a platform without the capability the set operations reject with
/// [`WallpaperError::PlatformUnavailable`] and `is_supported` resolves `false`,
/// without touching the service. The async operations suspend once, while the
/// decode-and-apply work runs on tokio's blocking pool. Callers already off the
/// UI thread, like the JNI entry points, use the `*_blocking` twins instead.
pub struct WallpaperModule<S> {
    applier: Arc<WallpaperApplier<S>>,
    platform: Platform,
}

impl<S> Clone for WallpaperModule<S> {
    fn clone(&self) -> Self {
        Self {
            applier: Arc::clone(&self.applier),
            platform: self.platform,
        }
    }
}

impl<S: WallpaperService + 'static> WallpaperModule<S> {
    pub fn new(service: S) -> Self {
        Self::with_platform(service, Platform::current())
    }

    pub fn with_platform(service: S, platform: Platform) -> Self {
        Self {
            applier: Arc::new(WallpaperApplier::new(service)),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn applier(&self) -> &WallpaperApplier<S> {
        &self.applier
    }

    fn gate(&self) -> Result<(), WallpaperError> {
        if self.platform.has_wallpaper_capability() {
            Ok(())
        } else {
            debug!("Wallpaper request rejected on {:?}", self.platform);
            Err(WallpaperError::PlatformUnavailable)
        }
    }

    pub fn set_wallpaper_from_encoded_image_blocking(&self, data: &str) -> Result<&'static str, WallpaperError> {
        self.gate()?;
        self.applier.set_wallpaper_from_encoded_image(data)
    }

    pub fn set_wallpaper_from_path_blocking(&self, path: &str) -> Result<&'static str, WallpaperError> {
        self.gate()?;
        self.applier.set_wallpaper_from_path(path)
    }

    pub fn is_supported_blocking(&self) -> bool {
        self.platform.has_wallpaper_capability() && self.applier.is_supported()
    }

    pub async fn set_wallpaper_from_encoded_image(&self, data: String) -> Result<&'static str, WallpaperError> {
        self.gate()?;
        let applier = Arc::clone(&self.applier);
        run_blocking(move || applier.set_wallpaper_from_encoded_image(&data)).await
    }

    pub async fn set_wallpaper_from_path(&self, path: String) -> Result<&'static str, WallpaperError> {
        self.gate()?;
        let applier = Arc::clone(&self.applier);
        run_blocking(move || applier.set_wallpaper_from_path(&path)).await
    }

    pub async fn is_supported(&self) -> bool {
        if !self.platform.has_wallpaper_capability() {
            return false;
        }
        let applier = Arc::clone(&self.applier);
        task::spawn_blocking(move || applier.is_supported())
            .await
            .unwrap_or_else(|e| {
                error!("Wallpaper probe task failed: {}", e);
                false
            })
    }
}

async fn run_blocking<F>(work: F) -> Result<&'static str, WallpaperError>
where
    F: FnOnce() -> Result<&'static str, WallpaperError> + Send + 'static,
{
    match task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) => {
            error!("Wallpaper task failed: {}", e);
            Err(WallpaperError::Unknown(e.to_string()))
        }
    }
}
