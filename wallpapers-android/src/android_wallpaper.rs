use std::path::Path;

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JString, JThrowable, JValue};
use jni::{JNIEnv, JavaVM};
use log::{debug, info};
use wallpapers_core::{ServiceError, WallpaperService};

const WALLPAPER_MANAGER: &str = "android/app/WallpaperManager";
const BITMAP_FACTORY: &str = "android/graphics/BitmapFactory";
const IO_EXCEPTION: &str = "java/io/IOException";

/// Wallpaper service over `android.app.WallpaperManager`, reached through JNI.
pub struct AndroidWallpaperService {
    vm: JavaVM,
    context: GlobalRef,
}

impl AndroidWallpaperService {
    pub fn new(vm: JavaVM, context: GlobalRef) -> Self {
        Self { vm, context }
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| ServiceError::Other(format!("Failed to attach current thread: {}", e)))?;
        f(&mut env, self.context.as_obj())
    }
}

/// Converts a failed JNI call into a service error, clearing any pending Java exception.
fn java_failure(env: &mut JNIEnv, err: JniError, what: &str) -> ServiceError {
    if !matches!(err, JniError::JavaException) {
        return ServiceError::Other(format!("{}: {}", what, err));
    }

    let throwable = match env.exception_occurred() {
        Ok(throwable) => throwable,
        Err(e) => return ServiceError::Other(format!("{}: {}", what, e)),
    };
    // No further JNI call is legal while the exception is pending.
    let _ = env.exception_clear();

    let message = throwable_message(env, &throwable).unwrap_or_else(|| what.to_string());
    match env.is_instance_of(&throwable, IO_EXCEPTION) {
        Ok(true) => ServiceError::Io(message),
        _ => ServiceError::Other(message),
    }
}

fn throwable_message(env: &mut JNIEnv, throwable: &JThrowable) -> Option<String> {
    let value = env
        .call_method(throwable, "getMessage", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    if value.is_null() {
        return None;
    }
    let message = JString::from(value);
    env.get_string(&message).ok().map(String::from)
}

fn wallpaper_manager<'local>(env: &mut JNIEnv<'local>, context: &JObject) -> Result<JObject<'local>, ServiceError> {
    let manager = env
        .call_static_method(
            WALLPAPER_MANAGER,
            "getInstance",
            "(Landroid/content/Context;)Landroid/app/WallpaperManager;",
            &[JValue::Object(context)],
        )
        .map_err(|e| java_failure(env, e, "Failed to get WallpaperManager instance"))?
        .l()
        .map_err(|e| ServiceError::Other(format!("Failed to get wallpaper manager object: {}", e)))?;

    if manager.is_null() {
        return Err(ServiceError::Other("WallpaperManager is not available".to_string()));
    }
    Ok(manager)
}

/// Pins a decoded bitmap, mapping Java's `null` to the decoder sentinel.
fn pin_bitmap(env: &mut JNIEnv, bitmap: JObject) -> Result<Option<GlobalRef>, ServiceError> {
    if bitmap.is_null() {
        return Ok(None);
    }
    env.new_global_ref(bitmap)
        .map(Some)
        .map_err(|e| ServiceError::Other(format!("Failed to pin bitmap: {}", e)))
}

impl WallpaperService for AndroidWallpaperService {
    type Bitmap = GlobalRef;

    fn decode_bytes(&self, bytes: &[u8]) -> Result<Option<GlobalRef>, ServiceError> {
        let len = i32::try_from(bytes.len())
            .map_err(|_| ServiceError::Other(format!("Image of {} bytes is too large", bytes.len())))?;

        self.with_env(|env, _| {
            let java_byte_array = env
                .byte_array_from_slice(bytes)
                .map_err(|e| java_failure(env, e, "Failed to create Java byte array"))?;
            debug!("Created Java byte array of {} bytes", len);

            let bitmap = env
                .call_static_method(
                    BITMAP_FACTORY,
                    "decodeByteArray",
                    "([BII)Landroid/graphics/Bitmap;",
                    &[
                        JValue::Object(&JObject::from(java_byte_array)),
                        JValue::Int(0),
                        JValue::Int(len),
                    ],
                )
                .map_err(|e| java_failure(env, e, "Failed to decode bitmap from byte array"))?
                .l()
                .map_err(|e| ServiceError::Other(format!("Failed to get bitmap object: {}", e)))?;

            pin_bitmap(env, bitmap)
        })
    }

    fn decode_file(&self, path: &Path) -> Result<Option<GlobalRef>, ServiceError> {
        let path = path.to_string_lossy().into_owned();

        self.with_env(|env, _| {
            let java_path = env
                .new_string(path.as_str())
                .map_err(|e| java_failure(env, e, "Failed to create path string"))?;

            let bitmap = env
                .call_static_method(
                    BITMAP_FACTORY,
                    "decodeFile",
                    "(Ljava/lang/String;)Landroid/graphics/Bitmap;",
                    &[JValue::Object(&JObject::from(java_path))],
                )
                .map_err(|e| java_failure(env, e, "Failed to decode bitmap from file"))?
                .l()
                .map_err(|e| ServiceError::Other(format!("Failed to get bitmap object: {}", e)))?;

            pin_bitmap(env, bitmap)
        })
    }

    fn set_bitmap(&self, bitmap: &GlobalRef) -> Result<(), ServiceError> {
        self.with_env(|env, context| {
            let manager = wallpaper_manager(env, context)?;
            env.call_method(
                &manager,
                "setBitmap",
                "(Landroid/graphics/Bitmap;)V",
                &[JValue::Object(bitmap.as_obj())],
            )
            .map_err(|e| java_failure(env, e, "Failed to set wallpaper bitmap"))?;
            info!("Setting wallpaper from bitmap has done.");
            Ok(())
        })
    }

    fn acquire(&self) -> Result<(), ServiceError> {
        self.with_env(|env, context| wallpaper_manager(env, context).map(|_| ()))
    }
}
