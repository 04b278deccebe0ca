//! Standard base geometry and residue-name lookups.
//!
//! [`TemplateStore`] holds one idealized base per `(base letter, modified)` key. The six
//! standard bases ship embedded in the binary; a directory of TOML files can replace
//! them at runtime. [`registry::BaseRegistry`] resolves residue names to base letters.

mod error;
mod loader;
mod schema;

pub mod registry;

pub use error::Error;

use crate::model::atom::Atom;
use crate::model::types::{Element, Point};
use std::collections::HashMap;
use std::path::Path;

/// Lookup key of a base template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    /// Uppercase base letter.
    pub base: char,
    pub modified: bool,
}

/// Idealized base geometry in its own reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseTemplate {
    name: String,
    key: TemplateKey,
    atoms: Vec<Atom>,
}

impl BaseTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> TemplateKey {
        self.key
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn heavy_atoms(&self) -> impl Iterator<Item = (&str, Element, Point)> {
        self.atoms
            .iter()
            .filter(|a| !a.element.is_hydrogen())
            .map(|a| (a.name.as_str(), a.element, a.pos))
    }
}

/// Collection of base templates keyed by `(base, modified)`.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<TemplateKey, BaseTemplate>,
}

impl TemplateStore {
    /// Store holding the embedded A, C, G, T, U, and I templates.
    pub fn embedded() -> Self {
        Self {
            templates: loader::load_embedded_templates(),
        }
    }

    /// Loads every `*.toml` template from `dir`.
    ///
    /// # Errors
    ///
    /// Propagates I/O, parse, and duplicate-key failures as [`Error`].
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            templates: loader::load_templates_from_dir(dir.as_ref())?,
        })
    }

    /// Adds or replaces a template, returning the one it displaced.
    pub fn insert(&mut self, template: BaseTemplate) -> Option<BaseTemplate> {
        self.templates.insert(template.key, template)
    }

    /// Exact lookup. `base` is matched case-insensitively.
    pub fn get(&self, base: char, modified: bool) -> Option<&BaseTemplate> {
        self.templates.get(&TemplateKey {
            base: base.to_ascii_uppercase(),
            modified,
        })
    }

    /// Lookup that falls back to the unmodified template when no modified one exists.
    pub fn resolve(&self, base: char, modified: bool) -> Option<&BaseTemplate> {
        self.get(base, modified).or_else(|| {
            if modified {
                self.get(base, false)
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
