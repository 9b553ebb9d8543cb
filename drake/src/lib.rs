use thiserror::Error;

use drv::DRVError;

pub mod report;
pub mod serialization;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("could not read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model '{0}' has no factors")]
    NoFactors(String),
    #[error("factor '{name}': {source}")]
    Factor {
        name: String,
        source: DRVError,
    },
    #[error(transparent)]
    Evaluation(#[from] DRVError),
}
