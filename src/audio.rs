pub mod engine;
pub mod error;
pub mod synth;
pub mod tone;

pub use engine::AudioEngine;
pub use error::AudioError;
pub use synth::{SoftwareSynth, SynthVoice, ToneSynth, Voice};
pub use tone::{CueSpec, ToneSpec, Waveform};
