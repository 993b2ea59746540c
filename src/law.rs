// Tenancy law reference text supplied to the prompts
use anyhow::{Context, Error};
use log::info;
use std::path::Path;

/// Ontario rental law digest bundled with the binary.
pub const ONTARIO_TENANCY_LAW: &str = include_str!("../data/ontario_tenancy_law.md");

/// Law text inserted into every prompt as `{law_text}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LawText {
    text: String,
}

impl LawText {
    /// The bundled Ontario digest
    pub fn builtin() -> Self {
        Self {
            text: ONTARIO_TENANCY_LAW.to_string(),
        }
    }

    /// Load a replacement digest from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read law text from {}", path.display()))?;
        if text.trim().is_empty() {
            return Err(Error::msg(format!("Law text file {} is empty", path.display())));
        }
        info!("Loaded law text from {} ({} bytes)", path.display(), text.len());
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for LawText {
    fn default() -> Self {
        Self::builtin()
    }
}
