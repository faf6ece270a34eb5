use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::archive::{self, ArchiveError};
use crate::model::hub::{HubError, ModelHub};
use crate::model::language_packs::{self, DEFAULT_LANGUAGE};
use crate::model::ProgressFn;

#[derive(Debug, Error)]
pub enum ModelResolveError {
    #[error("could not determine model cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown language pack '{0}'; pass a model directory path instead")]
    UnknownLanguage(String),
    #[error("no archive found in repository '{0}'")]
    ArchiveNotFound(String),
    #[error("archive '{file}' not found in repository '{repo}'")]
    NamedArchiveNotFound { repo: String, file: String },
    #[error("repository '{repo}' contains more than one archive ({candidates}); pass '{repo}:<file>' to select one")]
    AmbiguousArchive { repo: String, candidates: String },
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Resolves a model identifier to a local model directory.
///
/// Resolution order, first match wins:
/// 1. no identifier: the default built-in language pack
/// 2. an existing local path: used directly, no remote lookup
/// 3. with a hub attached: an existing hub repository, whose single archive
///    (or the one named by a `repo:file` qualifier) is downloaded and
///    extracted into the cache
/// 4. a built-in language pack name (e.g. `en-us`, `fr`, `nl`)
pub struct ModelResolver {
    cache_dir: PathBuf,
    hub: Option<Box<dyn ModelHub>>,
    progress: Option<ProgressFn>,
}

impl ModelResolver {
    pub fn new() -> Result<Self, ModelResolveError> {
        Ok(Self::with_cache_dir(default_cache_dir()?))
    }

    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            hub: None,
            progress: None,
        }
    }

    /// Attach a remote hub; without one, only local paths and built-in
    /// language packs resolve.
    pub fn with_hub(mut self, hub: Box<dyn ModelHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn resolve(&self, ident: Option<&str>) -> Result<PathBuf, ModelResolveError> {
        let ident = match ident {
            None => return self.builtin(DEFAULT_LANGUAGE),
            Some(ident) => ident,
        };

        let local = Path::new(ident);
        if local.exists() {
            log::info!("using local model at {}", local.display());
            return Ok(local.to_path_buf());
        }

        let (repo, qualifier) = split_qualifier(ident);
        if let Some(hub) = self.hub.as_deref() {
            if hub.repo_exists(repo)? {
                return self.from_hub(hub, repo, qualifier);
            }
        }

        self.builtin(ident)
    }

    fn builtin(&self, language: &str) -> Result<PathBuf, ModelResolveError> {
        let pack = language_packs::find(language)
            .ok_or_else(|| ModelResolveError::UnknownLanguage(language.to_string()))?;

        let model_dir = self.cache_dir.join(pack.model_name);
        if model_dir.exists() {
            log::info!("using cached model {}", pack.model_name);
            return Ok(model_dir);
        }

        self.ensure_cache_dir()?;
        let archive_path = self.cache_dir.join(format!("{}.zip", pack.model_name));
        log::info!(
            "downloading language pack '{language}' from {}",
            pack.archive_url()
        );
        self.download(&pack.archive_url(), &archive_path)?;
        let model_dir = archive::extract_archive(&archive_path, &model_dir)?;
        let _ = fs::remove_file(&archive_path);
        Ok(model_dir)
    }

    fn from_hub(
        &self,
        hub: &dyn ModelHub,
        repo: &str,
        qualifier: Option<&str>,
    ) -> Result<PathBuf, ModelResolveError> {
        let archives = hub.list_archives(repo)?;
        let file = match qualifier {
            Some(named) => {
                if !archives.iter().any(|a| a == named) {
                    return Err(ModelResolveError::NamedArchiveNotFound {
                        repo: repo.to_string(),
                        file: named.to_string(),
                    });
                }
                named.to_string()
            }
            None => match archives.as_slice() {
                [] => return Err(ModelResolveError::ArchiveNotFound(repo.to_string())),
                [only] => only.clone(),
                many => {
                    return Err(ModelResolveError::AmbiguousArchive {
                        repo: repo.to_string(),
                        candidates: many.join(", "),
                    })
                }
            },
        };

        // Repository files may sit under subdirectories; cache entries are
        // keyed by the bare file name.
        let file_name = Path::new(&file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone());
        let model_dir = self.cache_dir.join(archive::archive_stem(&file_name));
        if model_dir.exists() {
            log::info!("using cached model {}", model_dir.display());
            return Ok(model_dir);
        }

        self.ensure_cache_dir()?;
        let archive_path = self.cache_dir.join(&file_name);
        log::info!("downloading '{file}' from repository '{repo}'");
        hub.fetch_archive(repo, &file, &archive_path, self.progress.as_ref())?;
        let model_dir = archive::extract_archive(&archive_path, &model_dir)?;
        let _ = fs::remove_file(&archive_path);
        Ok(model_dir)
    }

    fn ensure_cache_dir(&self) -> Result<(), ModelResolveError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| ModelResolveError::CacheDir {
            path: self.cache_dir.clone(),
            source: e,
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), ModelResolveError> {
        let download_err = |e: reqwest::Error| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        };
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(download_err)?;
        let total = response.content_length().unwrap_or(0);
        let bytes = response.bytes().map_err(download_err)?;

        // Write to a temp file first, then rename for atomicity.
        let temp_path = dest.with_extension("part");
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |e: std::io::Error| ModelResolveError::Write { path, source: e }
        };
        let mut file = File::create(&temp_path).map_err(write_err(&temp_path))?;
        let mut downloaded: u64 = 0;
        for chunk in bytes.chunks(1024 * 1024) {
            file.write_all(chunk).map_err(write_err(&temp_path))?;
            downloaded += chunk.len() as u64;
            if let Some(cb) = self.progress.as_ref() {
                cb(downloaded, total);
            }
        }
        file.flush().map_err(write_err(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, dest).map_err(write_err(dest))?;
        Ok(())
    }
}

/// Platform-specific model cache directory.
pub fn default_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("voxlive").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("voxlive").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn split_qualifier(ident: &str) -> (&str, Option<&str>) {
    match ident.split_once(':') {
        Some((repo, file)) if !repo.is_empty() && !file.is_empty() => (repo, Some(file)),
        _ => (ident, None),
    }
}
