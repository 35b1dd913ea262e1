//! Bundle loader - read once, share for the life of the process

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::bundle::{BundleError, ModelBundle};

/// Read and validate the artifact at `path`
pub fn load_bundle(path: &Path) -> Result<ModelBundle, BundleError> {
    tracing::info!("Loading model bundle from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BundleError::NotFound { path: path.to_path_buf() },
        _ => BundleError::Read { path: path.to_path_buf(), source: e },
    })?;

    let bundle = ModelBundle::from_bytes(&bytes, path)?;

    tracing::info!(
        model = bundle.metadata.model_kind.as_str(),
        scaler = bundle.metadata.scaler_kind.as_str(),
        sha256 = bundle.metadata.sha256.as_str(),
        size_bytes = bundle.metadata.size_bytes,
        "Model bundle loaded successfully"
    );
    if !bundle.metadata.encoder_matches_binarization {
        tracing::warn!(
            classes = ?bundle.metadata.encoder_classes,
            "Bundle encoder does not map YES/NO to 1/0; form inputs are binarized without it"
        );
    }

    Ok(bundle)
}

/// Lazily-initialized bundle behind a one-time guard
///
/// Only a successful load is kept. A failed load is reported to the caller
/// and the next access tries again.
#[derive(Debug)]
pub struct BundleCache {
    path: PathBuf,
    cell: OnceCell<Arc<ModelBundle>>,
    loads: AtomicUsize,
}

impl BundleCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the bundle, loading it on first use
    ///
    /// Concurrent first callers block on the guard; exactly one of them reads
    /// the file.
    pub fn get(&self) -> Result<Arc<ModelBundle>, BundleError> {
        self.cell
            .get_or_try_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                load_bundle(&self.path).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// Already-loaded bundle, without triggering a load
    pub fn loaded(&self) -> Option<Arc<ModelBundle>> {
        self.cell.get().cloned()
    }

    /// Number of times the file has been read
    pub fn load_attempts(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// `get` on the blocking pool, for async callers
    pub async fn get_async(self: &Arc<Self>) -> Result<Arc<ModelBundle>, BundleError> {
        if let Some(bundle) = self.loaded() {
            return Ok(bundle);
        }

        let cache = Arc::clone(self);
        match tokio::task::spawn_blocking(move || cache.get()).await {
            Ok(result) => result,
            Err(e) => Err(BundleError::Read {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            }),
        }
    }
}
