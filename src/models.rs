//! Pretrained model artifacts.
//!
//! Both models are files on local disk, each pinned by a fixed checksum that
//! is verified before the file is handed to an inference backend. With the
//! `fetch` feature a missing file is downloaded from its URL first. Any
//! failure here is fatal: a broken model means a broken deployment.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};

/// Expected digest of a model file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Checksum {
    Md5([u8; 16]),
    Sha256([u8; 32]),
}

impl Checksum {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Checksum::Md5(_) => "md5",
            Checksum::Sha256(_) => "sha256",
        }
    }

    pub fn hex(&self) -> String {
        match self {
            Checksum::Md5(d) => hex::encode(d),
            Checksum::Sha256(d) => hex::encode(d),
        }
    }

    fn digest_hex<R: Read>(&self, reader: R) -> Result<String> {
        let digest = match self {
            Checksum::Md5(_) => digest_reader::<Md5, _>(reader)?,
            Checksum::Sha256(_) => digest_reader::<Sha256, _>(reader)?,
        };
        Ok(hex::encode(digest))
    }

    /// Hash `reader` with this checksum's algorithm and compare.
    pub fn matches<R: Read>(&self, reader: R) -> Result<bool> {
        Ok(self.digest_hex(reader)? == self.hex())
    }

    /// Verify a file on disk, failing with both digests on mismatch.
    pub fn verify_file(&self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("failed to open model file {}", path.display()))?;
        let actual = self.digest_hex(file)?;
        if actual != self.hex() {
            return Err(anyhow!(
                "{} checksum mismatch for {}: expected {}, got {}",
                self.algorithm(),
                path.display(),
                self.hex(),
                actual
            ));
        }
        Ok(())
    }
}

impl FromStr for Checksum {
    type Err = anyhow::Error;

    /// Accepts `md5:<hex>`, `sha256:<hex>`, or bare hex whose length picks the algorithm.
    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        let (algorithm, digest) = match value.split_once(':') {
            Some((algorithm, digest)) => (algorithm.to_ascii_lowercase(), digest),
            None => match value.len() {
                32 => ("md5".to_string(), value),
                64 => ("sha256".to_string(), value),
                n => return Err(anyhow!("cannot infer checksum algorithm from {} hex digits", n)),
            },
        };
        let bytes = hex::decode(digest).map_err(|e| anyhow!("invalid checksum hex: {}", e))?;
        match algorithm.as_str() {
            "md5" => bytes
                .try_into()
                .map(Checksum::Md5)
                .map_err(|b: Vec<u8>| anyhow!("md5 checksum must be 16 bytes, got {}", b.len())),
            "sha256" => bytes.try_into().map(Checksum::Sha256).map_err(|b: Vec<u8>| {
                anyhow!("sha256 checksum must be 32 bytes, got {}", b.len())
            }),
            other => Err(anyhow!("unsupported checksum algorithm '{}'", other)),
        }
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm(), self.hex())
    }
}

fn digest_reader<D: Digest + io::Write, R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut hasher = D::new();
    io::copy(&mut reader, &mut hasher).context("failed to read model data")?;
    Ok(hasher.finalize().to_vec())
}

/// Stream `reader` into `partial`, removing the file again if the copy fails.
#[cfg(any(feature = "fetch", test))]
fn write_partial<R: Read>(mut reader: R, partial: &Path) -> Result<()> {
    let mut file = File::create(partial)
        .with_context(|| format!("failed to create {}", partial.display()))?;
    let copied = io::copy(&mut reader, &mut file);
    drop(file);
    if let Err(e) = copied {
        let _ = std::fs::remove_file(partial);
        return Err(anyhow::Error::new(e)
            .context(format!("failed to write {}", partial.display())));
    }
    Ok(())
}

/// A model file pinned by checksum, optionally fetchable from a URL.
#[derive(Clone, Debug)]
pub struct ModelArtifact {
    pub name: String,
    pub path: PathBuf,
    pub url: Option<String>,
    pub checksum: Checksum,
}

impl ModelArtifact {
    /// Make sure the file exists locally and matches its checksum.
    ///
    /// A present file with the wrong checksum is an error; it is never replaced.
    pub fn ensure(&self) -> Result<&Path> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create model directory {}", parent.display())
                })?;
            }
        }

        if !self.path.exists() {
            self.fetch()?;
        }

        self.checksum
            .verify_file(&self.path)
            .with_context(|| format!("{} model failed verification", self.name))?;
        log::info!(
            "{} model verified: {} ({})",
            self.name,
            self.path.display(),
            self.checksum
        );
        Ok(&self.path)
    }

    #[cfg(feature = "fetch")]
    fn fetch(&self) -> Result<()> {
        let url = self.url.as_deref().ok_or_else(|| {
            anyhow!(
                "{} model missing at {} and no download url configured",
                self.name,
                self.path.display()
            )
        })?;
        log::info!("fetching {} model from {}", self.name, url);
        let response = ureq::get(url)
            .call()
            .with_context(|| format!("failed to fetch {} model from {}", self.name, url))?;

        let partial = self.path.with_extension("part");
        write_partial(response.into_reader(), &partial)
            .with_context(|| format!("failed to download {} model", self.name))?;

        if let Err(e) = self.checksum.verify_file(&partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.context(format!("downloaded {} model is corrupt", self.name)));
        }
        std::fs::rename(&partial, &self.path)
            .with_context(|| format!("failed to move model into {}", self.path.display()))?;
        Ok(())
    }

    #[cfg(not(feature = "fetch"))]
    fn fetch(&self) -> Result<()> {
        match &self.url {
            Some(url) => Err(anyhow!(
                "{} model missing at {}; download it from {} (or build with the `fetch` feature)",
                self.name,
                self.path.display(),
                url
            )),
            None => Err(anyhow!(
                "{} model missing at {}",
                self.name,
                self.path.display()
            )),
        }
    }
}
