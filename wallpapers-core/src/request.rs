use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const FILE_SCHEME: &str = "file://";

/// A single wallpaper change request as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WallpaperRequest {
    /// Base64 image bytes, optionally prefixed with `data:image/<subtype>;base64,`.
    FromEncodedImage { data: String },
    /// Local image path, optionally prefixed with `file://`.
    FromPath { path: String },
}

/// Where the image bytes of a request come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestSource {
    EncodedImage,
    Path,
}

impl WallpaperRequest {
    pub fn encoded_image(data: impl Into<String>) -> Self {
        Self::FromEncodedImage { data: data.into() }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self::FromPath { path: path.into() }
    }

    pub fn source(&self) -> RequestSource {
        match self {
            Self::FromEncodedImage { .. } => RequestSource::EncodedImage,
            Self::FromPath { .. } => RequestSource::Path,
        }
    }

    /// Strips the scheme marker matching the request kind.
    pub fn normalized(self) -> Self {
        match self {
            Self::FromEncodedImage { data } => {
                let clean = normalize_encoded_image(&data);
                if clean.len() == data.len() {
                    Self::FromEncodedImage { data }
                } else {
                    Self::FromEncodedImage { data: clean.to_string() }
                }
            }
            Self::FromPath { path } => {
                let clean = normalize_path(&path);
                if clean.len() == path.len() {
                    Self::FromPath { path }
                } else {
                    Self::FromPath { path: clean.to_string() }
                }
            }
        }
    }

    /// The raw payload, without any normalization applied.
    pub fn payload(&self) -> &str {
        match self {
            Self::FromEncodedImage { data } => data,
            Self::FromPath { path } => path,
        }
    }
}

fn data_uri_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    // The pattern is a literal and always compiles.
    PREFIX.get_or_init(|| Regex::new(r"^data:image/[^;]+;base64,").unwrap())
}

/// Removes one leading `data:image/<subtype>;base64,` marker, if present.
///
/// The remaining content is not validated here; malformed base64 surfaces
/// later as a decode error.
pub fn normalize_encoded_image(input: &str) -> &str {
    match data_uri_prefix().find(input) {
        Some(prefix) => &input[prefix.end()..],
        None => input,
    }
}

/// Removes one leading `file://` marker, if present.
pub fn normalize_path(input: &str) -> &str {
    input.strip_prefix(FILE_SCHEME).unwrap_or(input)
}
