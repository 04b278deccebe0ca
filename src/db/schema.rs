use crate::model::types::Element;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BaseTemplateFile {
    pub info: TemplateInfo,
    #[serde(default)]
    pub atoms: Vec<TemplateAtom>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateInfo {
    pub name: String,
    /// Uppercase one-letter code of the parent base.
    pub base: String,
    #[serde(default)]
    pub modified: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateAtom {
    pub name: String,
    pub element: Element,
    pub pos: [f64; 3],
}

impl TemplateInfo {
    /// The base letter, if `base` holds exactly one of the standard codes.
    pub fn base_code(&self) -> Option<char> {
        let mut chars = self.base.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if matches!(c, 'A' | 'C' | 'G' | 'T' | 'U' | 'I' | 'P') => Some(c),
            _ => None,
        }
    }
}
