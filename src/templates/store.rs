use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::Size,
    error::{CollageError, CollageResult},
};

/// Named size/shape preset that tiles can reference by tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Tile width.
    pub width: u32,
    /// Tile height.
    pub height: u32,
    /// 0 when absent.
    #[serde(default)]
    pub corner_radius: u32,
}

impl Template {
    /// Build a template without validation.
    pub fn new(width: u32, height: u32, corner_radius: u32) -> Self {
        Self {
            width,
            height,
            corner_radius,
        }
    }

    /// Target size a tile takes from this template.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Reject empty names and zero sizes.
    pub fn validate(&self, name: &str) -> CollageResult<()> {
        if name.trim().is_empty() {
            return Err(CollageError::config("template", "name must not be empty"));
        }
        Size::positive(self.width, self.height, &format!("templates[{name}]"))?;
        Ok(())
    }
}

/// Template presets, persisted independently of any project.
///
/// On disk this is a JSON object mapping names to `{width, height, corner_radius}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TemplateStore {
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    /// Load a store; a missing file yields an empty store.
    pub fn load(path: &Path) -> CollageResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no template file, starting empty");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read templates '{}'", path.display()))?;
        let store: Self = serde_json::from_str(&text).map_err(|e| {
            CollageError::serde(format!("templates '{}': {e}", path.display()))
        })?;
        for (name, template) in &store.templates {
            template.validate(name)?;
        }
        Ok(store)
    }

    /// Write the store as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> CollageResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CollageError::serde(format!("templates: {e}")))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create template dir '{}'", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("write templates '{}'", path.display()))?;
        Ok(())
    }

    /// Insert or replace a template, returning the previous value.
    pub fn insert(&mut self, name: &str, template: Template) -> CollageResult<Option<Template>> {
        template.validate(name)?;
        Ok(self.templates.insert(name.to_owned(), template))
    }

    /// Remove a template, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    /// Template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Look up a template, failing with a configuration error naming it.
    pub fn resolve(&self, name: &str) -> CollageResult<&Template> {
        self.get(name)
            .ok_or_else(|| CollageError::config("template", format!("unknown template \"{name}\"")))
    }

    /// Templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when there are no tiles.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/store.rs"]
mod tests;
