use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::archive;
use crate::model::ProgressFn;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("hub request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("hub returned an unreadable file listing for {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write archive to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remote model hub: a namespace of repositories, each holding files of
/// which some are model archives.
pub trait ModelHub {
    fn repo_exists(&self, repo: &str) -> Result<bool, HubError>;

    /// Names of the archive files in the repository, in listing order.
    fn list_archives(&self, repo: &str) -> Result<Vec<String>, HubError>;

    fn fetch_archive(
        &self,
        repo: &str,
        file: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<(), HubError>;
}

/// Hub implementation backed by the Hugging Face model API.
pub struct HuggingFaceHub {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HuggingFaceHub {
    pub fn new() -> Self {
        Self::with_endpoint("https://huggingface.co")
    }

    /// Point at a different endpoint (mirrors, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self, repo: &str) -> String {
        format!("{}/api/models/{repo}", self.endpoint)
    }
}

impl Default for HuggingFaceHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RepoInfo {
    #[serde(default)]
    siblings: Vec<RepoFile>,
}

#[derive(Deserialize)]
struct RepoFile {
    rfilename: String,
}

impl ModelHub for HuggingFaceHub {
    fn repo_exists(&self, repo: &str) -> Result<bool, HubError> {
        let url = self.api_url(repo);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| HubError::Request { url, source: e })?;
        Ok(response.status().is_success())
    }

    fn list_archives(&self, repo: &str) -> Result<Vec<String>, HubError> {
        let url = self.api_url(repo);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| HubError::Request {
                url: url.clone(),
                source: e,
            })?;
        let info: RepoInfo = response
            .json()
            .map_err(|e| HubError::Listing { url, source: e })?;
        Ok(info
            .siblings
            .into_iter()
            .map(|file| file.rfilename)
            .filter(|name| archive::is_archive_name(name))
            .collect())
    }

    fn fetch_archive(
        &self,
        repo: &str,
        file: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<(), HubError> {
        let url = format!("{}/{repo}/resolve/main/{file}", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| HubError::Request {
                url: url.clone(),
                source: e,
            })?;

        let total = response.content_length().unwrap_or(0);
        let bytes = response
            .bytes()
            .map_err(|e| HubError::Request { url, source: e })?;

        // Write to a temp file first, then rename for atomicity.
        let temp_path = dest.with_extension("part");
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |e: std::io::Error| HubError::Write { path, source: e }
        };
        let mut out = File::create(&temp_path).map_err(write_err(&temp_path))?;
        let mut downloaded: u64 = 0;
        for chunk in bytes.chunks(1024 * 1024) {
            out.write_all(chunk).map_err(write_err(&temp_path))?;
            downloaded += chunk.len() as u64;
            if let Some(cb) = progress {
                cb(downloaded, total);
            }
        }
        out.flush().map_err(write_err(&temp_path))?;
        drop(out);

        fs::rename(&temp_path, dest).map_err(write_err(dest))?;
        Ok(())
    }
}
