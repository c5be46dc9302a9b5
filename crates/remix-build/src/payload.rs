//! Writing the `buildEnd` payload to disk

use std::path::PathBuf;

use async_trait::async_trait;
use remix_config::{BoxError, BuildEndArgs, BuildEndHook};

use crate::error::Error;

/// A `buildEnd` hook that writes `{ buildManifest, remixConfig }` as JSON
#[derive(Debug, Clone)]
pub struct WriteBuildEndPayload {
    path: PathBuf,
}

impl WriteBuildEndPayload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl BuildEndHook for WriteBuildEndPayload {
    async fn build_end(&self, args: &BuildEndArgs<'_>) -> Result<(), BoxError> {
        let write_error = |message: String| Error::PayloadWrite {
            path: self.path.clone(),
            message,
        };

        let content = serde_json::to_string_pretty(args).map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(e.to_string()))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| write_error(e.to_string()))?;

        tracing::info!(path = %self.path.display(), "Wrote build manifest");
        Ok(())
    }
}
