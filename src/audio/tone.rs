//! Fixed timbre presets for every sound the engine knows.

use crate::mood::{Mood, Sound};

/// Every voice is scaled by this factor on top of the user volume.
pub const GAIN_HEADROOM: f32 = 0.2;
pub const LFO_RATE_HZ: f32 = 0.5;
pub const LFO_DEPTH_HZ: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// One sample of the waveform at `phase`, a fraction of a cycle in `[0, 1)`.
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (std::f64::consts::TAU * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

/// A sustained tone with slow vibrato.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub lfo_rate_hz: f32,
    pub lfo_depth_hz: f32,
}

impl ToneSpec {
    const fn modulated(waveform: Waveform, frequency_hz: f32) -> Self {
        ToneSpec {
            waveform,
            frequency_hz,
            lfo_rate_hz: LFO_RATE_HZ,
            lfo_depth_hz: LFO_DEPTH_HZ,
        }
    }

    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Ambient => Self::modulated(Waveform::Sine, 220.0),
            Mood::Rain => Self::modulated(Waveform::Triangle, 100.0),
            Mood::Dreamy => Self::modulated(Waveform::Sine, 330.0),
            Mood::Dark => Self::modulated(Waveform::Triangle, 55.0),
            Mood::Calm => Self::modulated(Waveform::Sine, 174.0),
        }
    }

    /// The continuous tone for `sound`. Unrecognized ids get the ambient
    /// preset.
    pub fn for_sound(sound: &Sound) -> Self {
        match sound {
            Sound::Mood(mood) => Self::for_mood(*mood),
            Sound::Success | Sound::Other(_) => Self::modulated(Waveform::Sine, 220.0),
        }
    }
}

/// A short self-terminating pitch sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueSpec {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Length of the exponential ramp from `start_hz` to `end_hz`.
    pub ramp_secs: f32,
    /// The voice stops after this long.
    pub duration_secs: f32,
}

impl CueSpec {
    pub const SUCCESS: CueSpec = CueSpec {
        waveform: Waveform::Sine,
        start_hz: 880.0,
        end_hz: 440.0,
        ramp_secs: 0.1,
        duration_secs: 0.15,
    };

    pub fn frequency_at(&self, secs: f32) -> f32 {
        if secs >= self.ramp_secs {
            return self.end_hz;
        }
        let progress = (secs / self.ramp_secs).max(0.0);
        self.start_hz * (self.end_hz / self.start_hz).powf(progress)
    }
}

pub fn gain_for_volume(volume: f32) -> f32 {
    volume * GAIN_HEADROOM
}
