//! The tone-synthesis capability and an in-process software implementation.

use crate::audio::error::AudioError;
use crate::audio::tone::{CueSpec, ToneSpec};
use crate::config::{AudioConfig, AudioOutput};
use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};

/// A running continuous tone. Dropping the voice stops it and releases its
/// resources.
pub trait Voice {
    fn set_gain(&mut self, gain: f32);
}

/// Something that can make sound.
pub trait ToneSynth {
    type Voice: Voice;

    /// Starts a continuous, modulated tone at `gain`.
    fn start_tone(&mut self, tone: &ToneSpec, gain: f32) -> Result<Self::Voice, AudioError>;

    /// Fires a short cue that ends on its own. The cue is layered over any
    /// running voice.
    fn play_cue(&mut self, cue: &CueSpec, gain: f32) -> Result<(), AudioError>;

    /// Releases the synthesizer. Later calls fail with `AudioError::Closed`.
    fn close(&mut self);
}

pub const MAX_SAMPLE_RATE: u32 = 192_000;

#[derive(Debug, Clone)]
struct ToneState {
    id: u64,
    spec: ToneSpec,
    gain: f32,
    phase: f64,
    lfo_phase: f64,
}

#[derive(Debug, Clone)]
struct CueState {
    spec: CueSpec,
    gain: f32,
    phase: f64,
    elapsed_frames: u64,
    total_frames: u64,
}

/// Oscillator bank shared between the synth and its voice handles.
#[derive(Debug, Clone)]
struct Mixer {
    sample_rate: u32,
    tones: Vec<ToneState>,
    cues: Vec<CueState>,
    next_id: u64,
}

impl Mixer {
    fn next_sample(&mut self) -> f32 {
        let rate = f64::from(self.sample_rate);
        let mut out = 0.0f64;

        for tone in &mut self.tones {
            let lfo = (std::f64::consts::TAU * tone.lfo_phase).sin();
            let freq = f64::from(tone.spec.frequency_hz) + f64::from(tone.spec.lfo_depth_hz) * lfo;
            out += tone.spec.waveform.sample(tone.phase) * f64::from(tone.gain);
            tone.phase = (tone.phase + freq / rate).rem_euclid(1.0);
            tone.lfo_phase = (tone.lfo_phase + f64::from(tone.spec.lfo_rate_hz) / rate).fract();
        }

        for cue in &mut self.cues {
            let secs = cue.elapsed_frames as f64 / rate;
            let freq = f64::from(cue.spec.frequency_at(secs as f32));
            out += cue.spec.waveform.sample(cue.phase) * f64::from(cue.gain);
            cue.phase = (cue.phase + freq / rate).fract();
            cue.elapsed_frames += 1;
        }
        self.cues.retain(|c| c.elapsed_frames < c.total_frames);

        out.clamp(-1.0, 1.0) as f32
    }

    fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// Pure-Rust oscillator bank. The host pulls samples with [`SoftwareSynth::render`].
#[derive(Debug)]
pub struct SoftwareSynth {
    mixer: Rc<RefCell<Mixer>>,
    closed: bool,
}

/// Handle to a tone playing on a [`SoftwareSynth`].
#[derive(Debug)]
pub struct SynthVoice {
    id: u64,
    mixer: Weak<RefCell<Mixer>>,
}

impl Voice for SynthVoice {
    fn set_gain(&mut self, gain: f32) {
        if let Some(mixer) = self.mixer.upgrade() {
            let mut mixer = mixer.borrow_mut();
            if let Some(tone) = mixer.tones.iter_mut().find(|t| t.id == self.id) {
                tone.gain = gain;
            }
        }
    }
}

impl Drop for SynthVoice {
    fn drop(&mut self) {
        if let Some(mixer) = self.mixer.upgrade() {
            mixer.borrow_mut().tones.retain(|t| t.id != self.id);
            tracing::trace!(voice = self.id, "Released voice");
        }
    }
}

impl SoftwareSynth {
    /// Acquires the synthesizer described by `config`.
    pub fn open(config: &AudioConfig) -> Result<Self, AudioError> {
        if config.output == AudioOutput::None {
            return Err(AudioError::Unavailable(
                "audio output is disabled in the configuration".into(),
            ));
        }
        Self::with_sample_rate(config.sample_rate)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        Ok(SoftwareSynth {
            mixer: Rc::new(RefCell::new(Mixer {
                sample_rate,
                tones: Vec::new(),
                cues: Vec::new(),
                next_id: 0,
            })),
            closed: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.mixer.borrow().sample_rate
    }

    /// Fills `out` with the next mono samples and advances every voice.
    pub fn render(&mut self, out: &mut [f32]) {
        self.mixer.borrow_mut().render(out);
    }

    pub fn active_tones(&self) -> Vec<(ToneSpec, f32)> {
        self.mixer
            .borrow()
            .tones
            .iter()
            .map(|t| (t.spec, t.gain))
            .collect()
    }

    pub fn active_cues(&self) -> usize {
        self.mixer.borrow().cues.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Renders `secs` of the current soundscape into a 16-bit mono WAV file.
    /// Works on a snapshot, so live playback is not advanced.
    pub fn bounce_to_wav(&self, path: &Path, secs: f32) -> Result<(), AudioError> {
        let mut snapshot = self.mixer.borrow().clone();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: snapshot.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;

        let frames = (secs.max(0.0) * snapshot.sample_rate as f32) as usize;
        let mut block = vec![0.0f32; 1024];
        let mut written = 0;
        while written < frames {
            let len = block.len().min(frames - written);
            snapshot.render(&mut block[..len]);
            for sample in &block[..len] {
                writer.write_sample((sample * f32::from(i16::MAX)) as i16)?;
            }
            written += len;
        }
        writer.finalize()?;
        tracing::info!(path = ?path, frames, "Bounced soundscape");
        Ok(())
    }
}

impl ToneSynth for SoftwareSynth {
    type Voice = SynthVoice;

    fn start_tone(&mut self, tone: &ToneSpec, gain: f32) -> Result<SynthVoice, AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        let mut mixer = self.mixer.borrow_mut();
        let id = mixer.next_id;
        mixer.next_id += 1;
        mixer.tones.push(ToneState {
            id,
            spec: *tone,
            gain,
            phase: 0.0,
            lfo_phase: 0.0,
        });
        tracing::trace!(voice = id, hz = tone.frequency_hz, "Started voice");
        Ok(SynthVoice {
            id,
            mixer: Rc::downgrade(&self.mixer),
        })
    }

    fn play_cue(&mut self, cue: &CueSpec, gain: f32) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        let mut mixer = self.mixer.borrow_mut();
        let total_frames = (cue.duration_secs * mixer.sample_rate as f32).round() as u64;
        mixer.cues.push(CueState {
            spec: *cue,
            gain,
            phase: 0.0,
            elapsed_frames: 0,
            total_frames,
        });
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        let mut mixer = self.mixer.borrow_mut();
        mixer.tones.clear();
        mixer.cues.clear();
        self.closed = true;
        tracing::debug!("Closed synthesizer");
    }
}
