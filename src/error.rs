use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Street source failed and no cached result exists for {0}")]
    SourceUnavailable(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Solar computation error: {0}")]
    Solar(#[from] crate::solar::SolarError),
}
