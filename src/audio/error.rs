use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio output is unavailable: {0}")]
    Unavailable(String),
    #[error("unsupported sample rate {0} Hz")]
    InvalidSampleRate(u32),
    #[error("the synthesizer has been closed")]
    Closed,
    #[error(transparent)]
    Wav(#[from] hound::Error),
}
