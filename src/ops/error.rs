use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid point sets for least-squares fit: {details}")]
    Input { details: String },

    #[error("cannot classify residue '{res_name}' ({res_id}): {reason}")]
    Classification {
        res_name: String,
        res_id: i32,
        reason: String,
    },

    #[error("no standard template for base '{base}' (modified: {modified})")]
    TemplateLoad { base: char, modified: bool },

    #[error("least-squares fit failed: {reason}")]
    Fit { reason: String },

    #[error("residue '{res_name}' ({res_id}) has no reference frame")]
    FrameUnset { res_name: String, res_id: i32 },

    #[error("invalid pairing configuration: {details}")]
    Config { details: String },
}

impl Error {
    pub fn input(details: impl Into<String>) -> Self {
        Self::Input {
            details: details.into(),
        }
    }

    pub fn classification(
        res_name: impl Into<String>,
        res_id: i32,
        reason: impl Into<String>,
    ) -> Self {
        Self::Classification {
            res_name: res_name.into(),
            res_id,
            reason: reason.into(),
        }
    }

    pub fn fit(reason: impl Into<String>) -> Self {
        Self::Fit {
            reason: reason.into(),
        }
    }

    pub fn frame_unset(res_name: impl Into<String>, res_id: i32) -> Self {
        Self::FrameUnset {
            res_name: res_name.into(),
            res_id,
        }
    }

    pub fn config(details: impl Into<String>) -> Self {
        Self::Config {
            details: details.into(),
        }
    }
}
