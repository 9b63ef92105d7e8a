use std::path::PathBuf;

use lsl_interp::model::LoadError;

/// Fatal errors from loading a script. Event injection never fails; see
/// [`crate::Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
