// Platform service seam between the applier and the OS wallpaper facility
use std::path::Path;

use crate::error::ServiceError;

/// Service trait for the host's wallpaper capability.
///
/// Decoders report an undecodable payload as `Ok(None)`, the same way the
/// platform decoders hand back a null bitmap. `Err` is reserved for failures of
/// the service itself.
pub trait WallpaperService: Send + Sync {
    /// In-memory image representation accepted by [`WallpaperService::set_bitmap`].
    type Bitmap;

    fn decode_bytes(&self, bytes: &[u8]) -> Result<Option<Self::Bitmap>, ServiceError>;

    fn decode_file(&self, path: &Path) -> Result<Option<Self::Bitmap>, ServiceError>;

    /// Commits the bitmap as the device wallpaper.
    fn set_bitmap(&self, bitmap: &Self::Bitmap) -> Result<(), ServiceError>;

    /// Acquires a handle to the wallpaper facility and drops it again.
    fn acquire(&self) -> Result<(), ServiceError>;
}
