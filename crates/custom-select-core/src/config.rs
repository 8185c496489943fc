//! Markup configuration: the class and attribute names a widget is built from.
//!
//! Defaults match the markup contract:
//!
//! ```html
//! <div class="bm-custom-select" data-name="sortOrder">
//!   <div class="bm-custom-select-trigger">
//!     <span class="bm-custom-select-value">Ascending</span>
//!   </div>
//!   <div class="bm-custom-select-options">
//!     <div class="bm-custom-select-option selected" data-value="asc">Ascending</div>
//!     <div class="bm-custom-select-option" data-value="desc">Descending</div>
//!   </div>
//!   <select name="sortOrder">
//!     <option value="asc" selected>Ascending</option>
//!     <option value="desc">Descending</option>
//!   </select>
//! </div>
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Class and attribute names used to discover and drive widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Class carried by every widget container
    pub container_class: String,
    /// Class of the clickable region that toggles the widget
    pub trigger_class: String,
    /// Class of the element holding the option entries
    pub options_class: String,
    /// Class of each option entry
    pub option_class: String,
    /// Class of the element showing the current label
    pub value_class: String,
    /// Tag name of the paired native form control
    pub native_tag: String,
    /// Class toggled on the container while open
    pub open_class: String,
    /// Class marking the selected option entry
    pub selected_class: String,
    /// Container attribute holding the widget's name
    pub name_attribute: String,
    /// Option attribute holding the value token
    pub value_attribute: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            container_class: "bm-custom-select".to_string(),
            trigger_class: "bm-custom-select-trigger".to_string(),
            options_class: "bm-custom-select-options".to_string(),
            option_class: "bm-custom-select-option".to_string(),
            value_class: "bm-custom-select-value".to_string(),
            native_tag: "select".to_string(),
            open_class: "open".to_string(),
            selected_class: "selected".to_string(),
            name_attribute: "data-name".to_string(),
            value_attribute: "data-value".to_string(),
        }
    }
}

impl SelectConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml_ng::from_str(source).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON object, as passed in from JavaScript.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every name can be spliced into a CSS selector unescaped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, &str); 10] = [
            ("container_class", &self.container_class),
            ("trigger_class", &self.trigger_class),
            ("options_class", &self.options_class),
            ("option_class", &self.option_class),
            ("value_class", &self.value_class),
            ("native_tag", &self.native_tag),
            ("open_class", &self.open_class),
            ("selected_class", &self.selected_class),
            ("name_attribute", &self.name_attribute),
            ("value_attribute", &self.value_attribute),
        ];
        for (field, value) in fields {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidName {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
