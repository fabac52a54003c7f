//! Archive download and extraction.
//!
//! The portable runtime install strategy needs exactly two operations from
//! the network: fetch a dist archive to disk, and unpack it. Downloads run
//! on a blocking client with a connect/read timeout (the only timeout in the
//! program); extraction dispatches on the archive extension.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::{BasecampError, Result};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const CHUNK_SIZE: usize = 8192;

/// Progress callback: (bytes downloaded so far, total if known).
pub type ProgressFn<'a> = &'a dyn Fn(u64, Option<u64>);

/// Downloads files over HTTPS.
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    /// Create a downloader with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DOWNLOAD_TIMEOUT)
    }

    /// Create a downloader with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent("basecamp")
                .timeout(timeout)
                .build()
                .expect("client configuration is static"),
        }
    }

    /// Download `url` to `dest`, reporting progress per chunk.
    pub fn download(&self, url: &str, dest: &Path, on_progress: ProgressFn<'_>) -> Result<()> {
        let fail = |message: String| BasecampError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        let mut response = self.client.get(url).send().map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let total = response.content_length();

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(dest)?;

        let mut downloaded: u64 = 0;
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = response.read(&mut buf).map_err(|e| fail(e.to_string()))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            downloaded += n as u64;
            on_progress(downloaded, total);
        }

        tracing::debug!(url, bytes = downloaded, dest = %dest.display(), "download complete");
        Ok(())
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Supported archive formats for portable dist bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from a filename or URL.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

/// Unpack `archive` into `dest_dir`, creating it as needed.
pub fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    let fail = |message: String| BasecampError::ExtractFailed {
        archive: archive.to_path_buf(),
        message,
    };

    let format = archive
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(ArchiveFormat::from_name)
        .ok_or_else(|| fail("unrecognized archive format".to_string()))?;

    std::fs::create_dir_all(dest_dir)?;

    match format {
        ArchiveFormat::Zip => {
            let file = File::open(archive)?;
            let mut zip = zip::ZipArchive::new(file).map_err(|e| fail(e.to_string()))?;
            zip.extract(dest_dir).map_err(|e| fail(e.to_string()))?;
        }
        ArchiveFormat::TarGz => {
            let file = File::open(archive)?;
            let decompressor = flate2::read::GzDecoder::new(file);
            let mut tarball = tar::Archive::new(decompressor);
            tarball.unpack(dest_dir).map_err(|e| fail(e.to_string()))?;
        }
    }

    tracing::debug!(archive = %archive.display(), dest = %dest_dir.display(), "archive extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn format_detection_by_extension() {
        assert_eq!(
            ArchiveFormat::from_name("node-v22.13.0-win-x64.zip"),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            ArchiveFormat::from_name("node-v22.13.0-linux-x64.tar.gz"),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(ArchiveFormat::from_name("bundle.tgz"), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::from_name("node.pkg"), None);
    }

    #[test]
    fn extracts_gzipped_tarball() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("bundle.tar.gz");

        // Build a small tar.gz containing dir/hello.txt.
        let file = File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let content = b"hello from the archive";
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "dir/hello.txt", content.as_slice())
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let dest = temp.path().join("out");
        extract_archive(&archive_path, &dest).unwrap();

        let extracted = fs::read_to_string(dest.join("dir/hello.txt")).unwrap();
        assert_eq!(extracted, "hello from the archive");
    }

    #[test]
    fn extracts_zip_archive() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("bundle.zip");

        let file = File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("nested/file.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"zipped content").unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        extract_archive(&archive_path, &dest).unwrap();

        let extracted = fs::read_to_string(dest.join("nested/file.txt")).unwrap();
        assert_eq!(extracted, "zipped content");
    }

    #[test]
    fn unknown_format_is_an_extract_error() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("bundle.rar");
        fs::write(&archive_path, "junk").unwrap();

        let err = extract_archive(&archive_path, &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, BasecampError::ExtractFailed { .. }));
    }

    #[test]
    fn corrupt_archive_is_an_extract_error_not_a_panic() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("bundle.tar.gz");
        fs::write(&archive_path, "this is not gzip data").unwrap();

        let result = extract_archive(&archive_path, &temp.path().join("out"));
        assert!(result.is_err());
    }

    #[test]
    fn download_to_unreachable_url_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let downloader = Downloader::with_timeout(Duration::from_millis(200));
        let result = downloader.download(
            "http://127.0.0.1:1/never",
            &temp.path().join("out.bin"),
            &|_, _| {},
        );
        assert!(matches!(
            result,
            Err(BasecampError::DownloadFailed { .. })
        ));
    }
}
