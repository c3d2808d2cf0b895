use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access table file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<StoreError> for taller_types::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(e) => taller_types::Error::Io(e),
            StoreError::Csv(e) => taller_types::Error::Csv(e),
        }
    }
}
