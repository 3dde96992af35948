/// The trustprobe error type.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Internal error: [{0}]")]
    InternalError(String),

    #[error("I/O error")]
    IOError(#[from] std::io::Error),

    #[error("Hardware error: {0}")]
    HardwareError(String),

    #[error("Device query error: {0}")]
    DeviceQueryError(String),

    #[error("Random source error: {0}")]
    RandomSourceError(String),
}

impl From<getrandom::Error> for ProbeError {
    fn from(err: getrandom::Error) -> Self {
        ProbeError::RandomSourceError(err.to_string())
    }
}
