//! Optional sprite images. Each one loads independently; whatever fails is
//! drawn with primitives instead.

use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Background,
    Bird,
    Pipe,
    Cloud,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Background,
        AssetKind::Bird,
        AssetKind::Pipe,
        AssetKind::Cloud,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetKind::Background => "bg.png",
            AssetKind::Bird => "bird.png",
            AssetKind::Pipe => "pipe.png",
            AssetKind::Cloud => "cloud.png",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Load outcome for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Missing,
    Failed(String),
    Loaded,
}

#[derive(Debug, Default)]
pub struct Assets {
    images: HashMap<AssetKind, RgbaImage>,
    status: HashMap<AssetKind, AssetStatus>,
}

impl Assets {
    /// No images: everything renders with primitives.
    pub fn none() -> Self {
        Self::default()
    }

    /// Try every asset in `dir`.
    pub fn load_dir(dir: &Path) -> Self {
        let mut assets = Self::none();
        for kind in AssetKind::ALL {
            let path = dir.join(kind.file_name());
            match load_image(&path) {
                Ok(image) => {
                    debug!(asset = %kind, width = image.width(), height = image.height(), "asset loaded");
                    assets.insert(kind, image);
                }
                Err(AssetError::NotFound(_)) => {
                    debug!(asset = %kind, "asset missing, using fallback");
                    assets.status.insert(kind, AssetStatus::Missing);
                }
                Err(e) => {
                    warn!(asset = %kind, error = %e, "asset failed, using fallback");
                    assets.status.insert(kind, AssetStatus::Failed(e.to_string()));
                }
            }
        }
        assets
    }

    pub fn insert(&mut self, kind: AssetKind, image: RgbaImage) {
        self.images.insert(kind, image);
        self.status.insert(kind, AssetStatus::Loaded);
    }

    pub fn get(&self, kind: AssetKind) -> Option<&RgbaImage> {
        self.images.get(&kind)
    }

    pub fn status(&self, kind: AssetKind) -> AssetStatus {
        self.status.get(&kind).cloned().unwrap_or_default()
    }

    pub fn loaded_count(&self) -> usize {
        self.images.len()
    }
}

/// Decode one PNG into RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(image.to_rgba8())
}
