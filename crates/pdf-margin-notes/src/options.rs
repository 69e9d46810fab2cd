use crate::constants::*;
use crate::printable::printable_path;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Margin-note conversion configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintableOptions {
    // Input / output
    pub input_file: PathBuf,
    /// Explicit output path; defaults to `<stem>.printable.pdf` next to the input
    pub output_file: Option<PathBuf>,

    // Page expansion
    pub expand_ratio: f32,

    // Note boxes
    pub note_padding: f32,
    pub font_size: f32,

    // Connectors
    pub stub_length: f32,
    pub line_width: f32,
}

impl Default for PrintableOptions {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: None,
            expand_ratio: DEFAULT_EXPAND_RATIO,
            note_padding: DEFAULT_NOTE_PADDING,
            font_size: DEFAULT_FONT_SIZE,
            stub_length: DEFAULT_STUB_LENGTH,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl PrintableOptions {
    /// Options for converting `input_file` with default layout settings
    pub fn for_file(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            ..Default::default()
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PrintableError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PrintableError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Where the converted document is written
    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| printable_path(&self.input_file))
    }

    /// Validate the layout settings
    pub fn validate_layout(&self) -> Result<()> {
        if !(self.expand_ratio.is_finite() && self.expand_ratio > 0.0) {
            return Err(PrintableError::Config(format!(
                "Expand ratio must be positive, got {}",
                self.expand_ratio
            )));
        }

        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(PrintableError::Config(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }

        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(PrintableError::Config(format!(
                "Line width must be positive, got {}",
                self.line_width
            )));
        }

        for (name, value) in [
            ("Note padding", self.note_padding),
            ("Stub length", self.stub_length),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PrintableError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Validate the options for a file conversion
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(PrintableError::Config("No input file specified".to_string()));
        }

        if self.output_file.as_ref() == Some(&self.input_file) {
            return Err(PrintableError::Config(
                "Output file must differ from the input file".to_string(),
            ));
        }

        self.validate_layout()
    }
}
