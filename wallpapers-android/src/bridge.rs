//! JNI entry points for `com.wallpapers.WallpapersModule`.
//!
//! The Kotlin side declares:
//!
//! ```kotlin
//! external fun nativeSetWallpaperFromBase64(context: Context, data: String): String
//! external fun nativeSetWallpaperFromPath(context: Context, path: String): String
//! external fun nativeIsSupported(context: Context): Boolean
//! ```
//!
//! and resolves or rejects its promise from the returned JSON.

use std::ffi::c_void;

use jni::objects::{JObject, JString};
use jni::sys::{jboolean, jint, jstring, JNI_FALSE, JNI_TRUE, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use log::{error, LevelFilter};
use wallpapers_core::{WallpaperError, WallpaperModule};

use crate::android_wallpaper::AndroidWallpaperService;
use crate::result::BridgeResult;

pub const LOG_TAG: &str = "WallpapersModule";

#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Info)
            .with_tag(LOG_TAG),
    );
    log::info!("Wallpapers native library loaded");
    JNI_VERSION_1_6
}

fn module_for(env: &JNIEnv, context: &JObject) -> Result<WallpaperModule<AndroidWallpaperService>, WallpaperError> {
    let vm = env
        .get_java_vm()
        .map_err(|e| WallpaperError::Unknown(format!("Failed to get JavaVM: {}", e)))?;
    let context = env
        .new_global_ref(context)
        .map_err(|e| WallpaperError::Unknown(format!("Failed to pin context: {}", e)))?;
    Ok(WallpaperModule::new(AndroidWallpaperService::new(vm, context)))
}

fn read_string(env: &mut JNIEnv, value: &JString) -> Result<String, WallpaperError> {
    env.get_string(value)
        .map(String::from)
        .map_err(|e| WallpaperError::Unknown(format!("Failed to read argument: {}", e)))
}

fn to_jstring(env: &mut JNIEnv, result: BridgeResult) -> jstring {
    match env.new_string(result.to_json()) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("Failed to create result string: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_wallpapers_WallpapersModule_nativeSetWallpaperFromBase64<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
    data: JString<'local>,
) -> jstring {
    let result = read_string(&mut env, &data).and_then(|data| {
        module_for(&env, &context)?.set_wallpaper_from_encoded_image_blocking(&data)
    });
    to_jstring(&mut env, result.into())
}

#[no_mangle]
pub extern "system" fn Java_com_wallpapers_WallpapersModule_nativeSetWallpaperFromPath<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
    path: JString<'local>,
) -> jstring {
    let result = read_string(&mut env, &path).and_then(|path| {
        module_for(&env, &context)?.set_wallpaper_from_path_blocking(&path)
    });
    to_jstring(&mut env, result.into())
}

#[no_mangle]
pub extern "system" fn Java_com_wallpapers_WallpapersModule_nativeIsSupported<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
) -> jboolean {
    match module_for(&env, &context) {
        Ok(module) if module.is_supported_blocking() => JNI_TRUE,
        Ok(_) => JNI_FALSE,
        Err(e) => {
            log::debug!("Wallpaper probe unavailable: {}", e);
            JNI_FALSE
        }
    }
}
