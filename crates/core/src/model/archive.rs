use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use thiserror::Error;

const ARCHIVE_SUFFIXES: &[&str] = &[".zip", ".tar.gz", ".tgz"];

pub fn is_archive_name(name: &str) -> bool {
    ARCHIVE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// The archive file name without its archive suffix; extracted models live
/// in a directory of this name.
pub fn archive_stem(file_name: &str) -> &str {
    for suffix in ARCHIVE_SUFFIXES {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return stem;
        }
    }
    file_name
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read archive {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid zip archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("failed to unpack archive {path}: {source}")]
    Unpack {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to stage extraction at {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Extract `archive_path` into the directory `dest`.
///
/// Extraction goes through a `<dest>.extracting` staging directory so an
/// interrupted run never leaves a half-populated model directory. If the
/// archive wraps everything in a single top-level directory (Vosk models
/// do), that inner directory becomes `dest`; otherwise the staging root is
/// renamed as a whole.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<PathBuf, ArchiveError> {
    let staging = staging_dir(dest);
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| ArchiveError::Stage {
            path: staging.clone(),
            source: e,
        })?;
    }
    fs::create_dir_all(&staging).map_err(|e| ArchiveError::Stage {
        path: staging.clone(),
        source: e,
    })?;

    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = if file_name.ends_with(".zip") {
        extract_zip(archive_path, &staging)
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
        extract_tar_gz(archive_path, &staging)
    } else {
        Err(ArchiveError::UnsupportedFormat(file_name))
    };
    if let Err(err) = result {
        let _ = fs::remove_dir_all(&staging);
        return Err(err);
    }

    promote(&staging, dest)
}

fn extract_zip(archive_path: &Path, staging: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Read {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    archive.extract(staging).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })
}

fn extract_tar_gz(archive_path: &Path, staging: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Read {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let tar = GzDecoder::new(file);
    tar::Archive::new(tar)
        .unpack(staging)
        .map_err(|e| ArchiveError::Unpack {
            path: archive_path.to_path_buf(),
            source: e,
        })
}

fn promote(staging: &Path, dest: &Path) -> Result<PathBuf, ArchiveError> {
    let entries: Vec<PathBuf> = fs::read_dir(staging)
        .map_err(|e| ArchiveError::Stage {
            path: staging.to_path_buf(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();

    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| ArchiveError::Stage {
            path: dest.to_path_buf(),
            source: e,
        })?;
    }

    let stage_err = |e: io::Error| ArchiveError::Stage {
        path: dest.to_path_buf(),
        source: e,
    };
    if entries.len() == 1 && entries[0].is_dir() {
        fs::rename(&entries[0], dest).map_err(stage_err)?;
        let _ = fs::remove_dir_all(staging);
    } else {
        fs::rename(staging, dest).map_err(stage_err)?;
    }
    Ok(dest.to_path_buf())
}

fn staging_dir(dest: &Path) -> PathBuf {
    // Not `with_extension`: model names contain dots ("...-0.15").
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!("{name}.extracting"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[rstest]
    #[case("vosk-model-small-nl-0.22.zip", "vosk-model-small-nl-0.22")]
    #[case("model.tar.gz", "model")]
    #[case("model.tgz", "model")]
    #[case("not-an-archive.bin", "not-an-archive.bin")]
    fn test_archive_stem(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(archive_stem(name), expected);
    }

    #[rstest]
    #[case("m.zip", true)]
    #[case("m.tar.gz", true)]
    #[case("m.tgz", true)]
    #[case("m.onnx", false)]
    #[case("README.md", false)]
    fn test_is_archive_name(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_archive_name(name), expected);
    }

    #[test]
    fn test_tar_gz_single_dir_is_promoted() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("model.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("vosk-model-small-xx-0.1/am/final.mdl", b"am".as_slice()),
                ("vosk-model-small-xx-0.1/conf/model.conf", b"conf".as_slice()),
            ],
        );

        let dest = tmp.path().join("model");
        let root = extract_archive(&archive, &dest).unwrap();
        assert_eq!(root, dest);
        assert!(dest.join("am/final.mdl").is_file());
        assert!(dest.join("conf/model.conf").is_file());
        assert!(!staging_dir(&dest).exists());
    }

    #[test]
    fn test_zip_multiple_root_entries_kept_in_place() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("flat.zip");
        write_zip(
            &archive,
            &[("a.txt", b"a".as_slice()), ("b.txt", b"b".as_slice())],
        );

        let dest = tmp.path().join("flat");
        extract_archive(&archive, &dest).unwrap();
        assert!(dest.join("a.txt").is_file());
        assert!(dest.join("b.txt").is_file());
    }

    #[test]
    fn test_zip_single_dir_is_promoted() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("wrapped.zip");
        write_zip(&archive, &[("inner/model.conf", b"c".as_slice())]);

        let dest = tmp.path().join("wrapped");
        extract_archive(&archive, &dest).unwrap();
        assert!(dest.join("model.conf").is_file());
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("model.rar");
        fs::write(&archive, b"not really").unwrap();

        let dest = tmp.path().join("model");
        let err = extract_archive(&archive, &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedFormat(_)));
        assert!(!dest.exists());
    }
}
