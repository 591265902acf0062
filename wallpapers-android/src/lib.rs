//! Android wallpaper backend for `wallpapers-core`.
//!
//! On Android this crate provides [`AndroidWallpaperService`] and the JNI entry
//! points the host's native module calls. Elsewhere only the result encoding is
//! compiled, so the workspace builds on desktop hosts.

mod result;

pub use result::BridgeResult;

#[cfg(target_os = "android")]
mod android_wallpaper;
#[cfg(target_os = "android")]
mod bridge;

#[cfg(target_os = "android")]
pub use android_wallpaper::AndroidWallpaperService;
#[cfg(target_os = "android")]
pub use bridge::LOG_TAG;
