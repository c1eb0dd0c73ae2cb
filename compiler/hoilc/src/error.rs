use std::io;
use std::path::PathBuf;

use hoil_bridge::BridgeError;
use hoil_eval::RuntimeError;
use hoil_parse::BuildError;
use thiserror::Error;

/// Anything that stops `hoil` before the program finishes.
#[derive(Debug, Error)]
pub enum HoilError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
