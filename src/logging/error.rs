use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to open log file")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error(transparent)]
    TracingInit(#[from] tracing_subscriber::util::TryInitError),
}
