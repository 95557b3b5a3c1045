#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UfshcError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("feature not present in this controller instance")]
    Unsupported,
    #[error("controller not ready to accept the request")]
    NotReady,
    #[error("timed out waiting for the controller")]
    Timeout,
    #[error("UIC command failed with result code {0:#x}")]
    UicFailure(u8),
}
