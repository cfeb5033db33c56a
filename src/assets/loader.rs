//! Byte sources for art, fonts, and catalogs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::foundation::error::{VnframeError, VnframeResult};

/// Asynchronous byte source addressed by relative path (`images/bar.png`, `fonts/...`).
///
/// Loads run on a single-threaded runtime and may resolve in any order.
pub trait AssetLoader {
    /// Fetch the raw bytes stored under `path`.
    fn load_bytes(&self, path: &str) -> impl Future<Output = VnframeResult<Vec<u8>>>;
}

impl<L: AssetLoader + ?Sized> AssetLoader for &L {
    fn load_bytes(&self, path: &str) -> impl Future<Output = VnframeResult<Vec<u8>>> {
        (**self).load_bytes(path)
    }
}

/// Normalize a relative asset path: forward slashes, no `.`/empty segments, no `..`.
pub fn normalize_rel_path(source: &str) -> VnframeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VnframeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(VnframeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VnframeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(VnframeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Reads assets from a directory tree with `tokio::fs`.
#[derive(Clone, Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    /// Serve assets from under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLoader for FsAssetLoader {
    async fn load_bytes(&self, path: &str) -> VnframeResult<Vec<u8>> {
        let rel = normalize_rel_path(path)?;
        let full = self.root.join(&rel);
        tokio::fs::read(&full)
            .await
            .map_err(|e| VnframeError::asset(format!("read '{}': {e}", full.display())))
    }
}

/// In-memory asset table. Counts loads per path.
#[derive(Debug, Default)]
pub struct MemoryAssetLoader {
    files: RefCell<HashMap<String, Vec<u8>>>,
    loads: RefCell<HashMap<String, usize>>,
    total: Cell<usize>,
}

impl MemoryAssetLoader {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path` (normalized), replacing any previous entry.
    pub fn insert(&self, path: &str, bytes: impl Into<Vec<u8>>) -> VnframeResult<()> {
        let rel = normalize_rel_path(path)?;
        self.files.borrow_mut().insert(rel, bytes.into());
        Ok(())
    }

    /// Number of `load_bytes` calls made for `path`, successful or not.
    pub fn load_count(&self, path: &str) -> usize {
        normalize_rel_path(path)
            .ok()
            .and_then(|p| self.loads.borrow().get(&p).copied())
            .unwrap_or(0)
    }

    /// Number of `load_bytes` calls across all paths.
    pub fn total_loads(&self) -> usize {
        self.total.get()
    }
}

impl AssetLoader for MemoryAssetLoader {
    async fn load_bytes(&self, path: &str) -> VnframeResult<Vec<u8>> {
        let rel = normalize_rel_path(path)?;
        *self.loads.borrow_mut().entry(rel.clone()).or_default() += 1;
        self.total.set(self.total.get() + 1);
        self.files
            .borrow()
            .get(&rel)
            .cloned()
            .ok_or_else(|| VnframeError::asset(format!("no asset at '{rel}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
