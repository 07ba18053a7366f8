use serde::Deserialize;
use thiserror::Error;

/// A known provider export format, keyed by a stable id.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub id: String,
    /// Columns always removed for this template, unless protected.
    #[serde(default)]
    pub dropped_columns: Vec<String>,
    /// Set for the one provider whose document-ish field carries a street
    /// address: the synthetic document column is suppressed for it.
    #[serde(default)]
    pub suppress_document: bool,
}

/// A known spelling of a store name inside one template's files.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreAlias {
    pub template: String,
    /// Raw spelling as it appears in provider cells.
    pub text: String,
    pub name: String,
    pub code: i64,
}

/// Template and alias tables, loaded once per session and passed explicitly
/// into every pipeline call. Load order is meaningful: earlier aliases win
/// when more than one matches a cell.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub aliases: Vec<StoreAlias>,
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to parse registry TOML: {0}")]
    Parse(String),
    #[error("Duplicate template id: {0}")]
    DuplicateTemplate(String),
    #[error("Alias '{text}' references unknown template '{template}'")]
    UnknownTemplate { text: String, template: String },
}

impl Registry {
    pub fn from_toml(input: &str) -> Result<Self, RegistryError> {
        let registry: Registry =
            toml::from_str(input).map_err(|e| RegistryError::Parse(e.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        for (i, template) in self.templates.iter().enumerate() {
            if self.templates[..i].iter().any(|t| t.id == template.id) {
                return Err(RegistryError::DuplicateTemplate(template.id.clone()));
            }
        }
        for alias in &self.aliases {
            if !self.templates.iter().any(|t| t.id == alias.template) {
                return Err(RegistryError::UnknownTemplate {
                    text: alias.text.clone(),
                    template: alias.template.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Aliases scoped to one template, in load order.
    pub fn aliases_for(&self, template_id: &str) -> Vec<&StoreAlias> {
        self.aliases
            .iter()
            .filter(|a| a.template == template_id)
            .collect()
    }
}
