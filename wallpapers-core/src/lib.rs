//! Sets the device wallpaper from a base64 image payload or a local file path.
//!
//! Requests are normalized ([`request`]), decoded and handed to a platform
//! [`WallpaperService`] by the [`WallpaperApplier`], and exposed to callers with
//! platform gating through [`WallpaperModule`].

pub mod applier;
pub mod error;
pub mod memory;
pub mod module;
pub mod platform;
pub mod request;
pub mod service;

pub use applier::{decode_base64, decode_encoded_payload, WallpaperApplier, ENCODED_IMAGE_SUCCESS, PATH_SUCCESS};
pub use error::{ErrorPayload, ServiceError, WallpaperError, DECODE_ERROR, UNKNOWN_ERROR, WALLPAPER_ERROR};
pub use memory::MemoryWallpaperService;
pub use module::WallpaperModule;
pub use platform::Platform;
pub use request::{normalize_encoded_image, normalize_path, RequestSource, WallpaperRequest};
pub use service::WallpaperService;
