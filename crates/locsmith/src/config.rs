//! Engine configuration.
//!
//! `EngineConfig::default()` is what a browser host gets without a config
//! file: the common test attributes, two class predicates and the outline
//! used while picking.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dialect::Dialect;
use crate::result::{LocsmithError, LocsmithResult};

/// Test attributes checked, in priority order, when looking for a test id
pub const DEFAULT_TEST_ID_ATTRIBUTES: &[&str] =
    &["data-testid", "data-test", "data-cy", "data-qa", "data-qaid"];

/// Class predicates appended to one path segment
pub const DEFAULT_MAX_CLASS_PREDICATES: usize = 2;

/// Classes kept in an element descriptor
pub const DEFAULT_MAX_DESCRIPTOR_CLASSES: usize = 6;

/// Characters of text content kept in an element descriptor
pub const DEFAULT_TEXT_LIMIT: usize = 120;

/// Characters of serialized markup kept in an element descriptor
pub const DEFAULT_MARKUP_LIMIT: usize = 240;

/// Outline painted on the element under the pointer while picking
pub const DEFAULT_OUTLINE_STYLE: &str = "2px solid #3b82f6";

/// Placeholder emitted where a second (drop/swipe) locator is needed
pub const DEFAULT_TARGET_PLACEHOLDER: &str = "TARGET_SELECTOR";

/// Placeholder emitted where a file path is needed
pub const DEFAULT_FILE_PLACEHOLDER: &str = "path/to/file";

/// Configuration shared by the synthesizer, extractor, formatter and
/// state machines of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Test attributes in priority order
    pub test_id_attributes: Vec<String>,
    /// Maximum class predicates per path segment
    pub max_class_predicates: usize,
    /// Maximum classes kept in a descriptor
    pub max_descriptor_classes: usize,
    /// Maximum characters of text content in a descriptor
    pub text_limit: usize,
    /// Maximum characters of outer markup in a descriptor
    pub markup_limit: usize,
    /// Inline outline applied to hovered elements while picking
    pub outline_style: String,
    /// Placeholder for the second locator of drag/swipe snippets
    pub target_placeholder: String,
    /// Placeholder for upload paths
    pub file_placeholder: String,
    /// Dialects rendered in every preview frame, in display order
    pub preview_dialects: Vec<Dialect>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            test_id_attributes: DEFAULT_TEST_ID_ATTRIBUTES
                .iter()
                .map(|attr| (*attr).to_string())
                .collect(),
            max_class_predicates: DEFAULT_MAX_CLASS_PREDICATES,
            max_descriptor_classes: DEFAULT_MAX_DESCRIPTOR_CLASSES,
            text_limit: DEFAULT_TEXT_LIMIT,
            markup_limit: DEFAULT_MARKUP_LIMIT,
            outline_style: DEFAULT_OUTLINE_STYLE.to_string(),
            target_placeholder: DEFAULT_TARGET_PLACEHOLDER.to_string(),
            file_placeholder: DEFAULT_FILE_PLACEHOLDER.to_string(),
            preview_dialects: Dialect::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the test attribute priority list
    #[must_use]
    pub fn with_test_id_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_id_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the class predicate limit per segment
    #[must_use]
    pub const fn with_max_class_predicates(mut self, max: usize) -> Self {
        self.max_class_predicates = max;
        self
    }

    /// Set the outline style used while picking
    #[must_use]
    pub fn with_outline_style(mut self, style: impl Into<String>) -> Self {
        self.outline_style = style.into();
        self
    }

    /// Set the drag/swipe target placeholder
    #[must_use]
    pub fn with_target_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.target_placeholder = placeholder.into();
        self
    }

    /// Restrict preview frames to these dialects
    #[must_use]
    pub fn with_preview_dialects(mut self, dialects: impl Into<Vec<Dialect>>) -> Self {
        self.preview_dialects = dialects.into();
        self
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> LocsmithResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> LocsmithResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> LocsmithResult<()> {
        if self.test_id_attributes.is_empty() {
            return Err(LocsmithError::config("test_id_attributes must not be empty"));
        }
        if let Some(bad) = self
            .test_id_attributes
            .iter()
            .find(|attr| attr.is_empty() || attr.chars().any(char::is_whitespace))
        {
            return Err(LocsmithError::config(format!(
                "invalid test attribute name '{bad}'"
            )));
        }
        if self.text_limit == 0 || self.markup_limit == 0 {
            return Err(LocsmithError::config(
                "text_limit and markup_limit must be positive",
            ));
        }
        if self.preview_dialects.is_empty() {
            return Err(LocsmithError::config("preview_dialects must not be empty"));
        }
        Ok(())
    }
}
