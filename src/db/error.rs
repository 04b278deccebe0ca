use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to parse base template {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    Parse {
        path: Option<PathBuf>,
        details: String,
    },

    #[error(
        "duplicate template for base '{base}' (modified: {modified}) in {path_desc}",
        path_desc = PathDisplay(path)
    )]
    DuplicateTemplate {
        base: char,
        modified: bool,
        path: Option<PathBuf>,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn parse(path: Option<PathBuf>, details: impl Into<String>) -> Self {
        Self::Parse {
            path,
            details: details.into(),
        }
    }

    pub fn duplicate_template(base: char, modified: bool, path: Option<PathBuf>) -> Self {
        Self::DuplicateTemplate {
            base,
            modified,
            path,
        }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "embedded source"),
        }
    }
}
