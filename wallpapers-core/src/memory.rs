use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use image::io::Reader;
use image::DynamicImage;
use log::debug;

use crate::error::ServiceError;
use crate::service::WallpaperService;

/// Wallpaper service backed by process memory.
///
/// Decodes with the `image` crate and keeps the last applied image as the
/// "current wallpaper". Failures can be injected to exercise the error paths of
/// callers without a device.
#[derive(Default)]
pub struct MemoryWallpaperService {
    current: Mutex<Option<DynamicImage>>,
    applied: AtomicUsize,
    apply_failure: Mutex<Option<ServiceError>>,
    probe_failure: Mutex<Option<ServiceError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryWallpaperService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set_bitmap` call fail with `err`.
    pub fn fail_apply_with(&self, err: ServiceError) {
        *lock(&self.apply_failure) = Some(err);
    }

    /// Makes every following `acquire` call fail with `err`.
    pub fn fail_probe_with(&self, err: ServiceError) {
        *lock(&self.probe_failure) = Some(err);
    }

    pub fn current_wallpaper(&self) -> Option<DynamicImage> {
        lock(&self.current).clone()
    }

    /// Number of successful `set_bitmap` calls.
    pub fn apply_count(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

impl WallpaperService for MemoryWallpaperService {
    type Bitmap = DynamicImage;

    fn decode_bytes(&self, bytes: &[u8]) -> Result<Option<DynamicImage>, ServiceError> {
        match image::load_from_memory(bytes) {
            Ok(img) => Ok(Some(img)),
            Err(e) => {
                debug!("Decoding {} bytes failed: {}", bytes.len(), e);
                Ok(None)
            }
        }
    }

    fn decode_file(&self, path: &Path) -> Result<Option<DynamicImage>, ServiceError> {
        // The format comes from the file content; picker cache paths often lack an extension.
        let reader = match Reader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader,
            Err(e) => {
                debug!("Opening {} failed: {}", path.display(), e);
                return Ok(None);
            }
        };
        match reader.decode() {
            Ok(img) => Ok(Some(img)),
            Err(e) => {
                debug!("Decoding {} failed: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn set_bitmap(&self, bitmap: &DynamicImage) -> Result<(), ServiceError> {
        if let Some(err) = lock(&self.apply_failure).clone() {
            return Err(err);
        }
        *lock(&self.current) = Some(bitmap.clone());
        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn acquire(&self) -> Result<(), ServiceError> {
        match lock(&self.probe_failure).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
