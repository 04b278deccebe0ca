use super::error::Error;
use super::schema::BaseTemplateFile;
use super::{BaseTemplate, TemplateKey};
use crate::model::atom::Atom;
use crate::model::types::Point;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub fn load_embedded_templates() -> HashMap<TemplateKey, BaseTemplate> {
    let mut templates = HashMap::new();

    macro_rules! load_template {
        ($path:literal) => {
            let content = include_str!(concat!("../../templates/", $path));
            let schema: BaseTemplateFile = toml::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse template file '{}': {}", $path, e));
            let template = build_template(schema, None)
                .unwrap_or_else(|e| panic!("Invalid template file '{}': {}", $path, e));

            let key = template.key();
            if templates.insert(key, template).is_some() {
                panic!("Duplicate template found for base '{}'", key.base);
            }
        };
    }

    load_template!("nucleic/A.toml");
    load_template!("nucleic/C.toml");
    load_template!("nucleic/G.toml");
    load_template!("nucleic/T.toml");
    load_template!("nucleic/U.toml");
    load_template!("nucleic/I.toml");

    templates
}

/// Reads every `*.toml` file in `dir` as a base template.
///
/// Files are visited in name order so that duplicate detection reports the later file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory or a file cannot be read, [`Error::Parse`] for
/// malformed documents, and [`Error::DuplicateTemplate`] when two files describe the same
/// `(base, modified)` key.
pub fn load_templates_from_dir(dir: &Path) -> Result<HashMap<TemplateKey, BaseTemplate>, Error> {
    let entries =
        fs::read_dir(dir).map_err(|e| Error::from_io(e, Some(dir.to_path_buf())))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::from_io(e, Some(dir.to_path_buf())))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = HashMap::new();
    for path in paths {
        let content =
            fs::read_to_string(&path).map_err(|e| Error::from_io(e, Some(path.clone())))?;
        let schema: BaseTemplateFile = toml::from_str(&content)
            .map_err(|e| Error::parse(Some(path.clone()), e.to_string()))?;
        let template = build_template(schema, Some(&path))?;

        let key = template.key();
        if templates.contains_key(&key) {
            return Err(Error::duplicate_template(key.base, key.modified, Some(path)));
        }
        log::debug!("loaded base template '{}' from {}", template.name(), path.display());
        templates.insert(key, template);
    }

    Ok(templates)
}

fn build_template(schema: BaseTemplateFile, path: Option<&Path>) -> Result<BaseTemplate, Error> {
    let base = schema.info.base_code().ok_or_else(|| {
        Error::parse(
            path.map(Path::to_path_buf),
            format!("'{}' is not a standard base letter", schema.info.base),
        )
    })?;

    let mut atoms: Vec<Atom> = Vec::with_capacity(schema.atoms.len());
    for atom in &schema.atoms {
        if atoms.iter().any(|a| a.name == atom.name.trim()) {
            return Err(Error::parse(
                path.map(Path::to_path_buf),
                format!("atom '{}' is listed twice", atom.name),
            ));
        }
        let [x, y, z] = atom.pos;
        atoms.push(Atom::new(&atom.name, atom.element, Point::new(x, y, z)));
    }

    Ok(BaseTemplate {
        name: schema.info.name,
        key: TemplateKey {
            base,
            modified: schema.info.modified,
        },
        atoms,
    })
}
