use std::path::{Path, PathBuf};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

use crate::generator::document::Document;

/// Memory-maps an OpenAPI JSON document for parsing.
pub struct SpecLoader {
  path: PathBuf,
  file: AsyncMmapFile,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self {
      path: path.to_path_buf(),
      file,
    })
  }

  pub fn parse_value(&self) -> anyhow::Result<Value> {
    serde_json::from_slice(self.file.as_slice()).with_context(|| format!("{} is not valid JSON", self.path.display()))
  }

  pub fn parse(&self) -> anyhow::Result<Document> {
    let root = self.parse_value()?;
    Document::from_value(root).with_context(|| format!("cannot generate types from {}", self.path.display()))
  }
}
