use crate::audio::error::AudioError;
use crate::audio::synth::{ToneSynth, Voice};
use crate::audio::tone::{gain_for_volume, CueSpec, ToneSpec};
use crate::mood::{Mood, Sound};
use crate::storage::{KeyValueStore, CURRENT_SOUND_KEY, SOUND_ENABLED_KEY, SOUND_VOLUME_KEY};

pub const DEFAULT_VOLUME: f32 = 0.3;
pub const DEFAULT_SOUND: Sound = Sound::Mood(Mood::Ambient);

struct ActiveTone<V> {
    sound: Sound,
    voice: V,
}

/// Plays at most one continuous ambient tone, plus one-shot cues layered on
/// top, and persists the sound settings.
///
/// When the synthesizer cannot be acquired at startup, or fails later, the
/// engine becomes unavailable for good: playback calls turn into no-ops and
/// [`AudioEngine::audio_error`] reports `true`. Settings keep persisting.
pub struct AudioEngine<K: KeyValueStore, S: ToneSynth> {
    storage: K,
    synth: Option<S>,
    active: Option<ActiveTone<S::Voice>>,
    sound_enabled: bool,
    current_sound: Sound,
    volume: f32,
    audio_error: bool,
}

impl<K: KeyValueStore, S: ToneSynth> AudioEngine<K, S> {
    /// Loads the persisted settings and acquires the synthesizer once.
    pub fn new(storage: K, acquire: impl FnOnce() -> Result<S, AudioError>) -> Self {
        let sound_enabled = match storage.get(SOUND_ENABLED_KEY) {
            Ok(Some(value)) => value == "true",
            Ok(None) => true,
            Err(err) => {
                tracing::warn!(%err, "Could not read sound toggle");
                true
            }
        };
        let current_sound = match storage.get(CURRENT_SOUND_KEY) {
            Ok(Some(value)) if !value.is_empty() => Sound::parse(&value),
            Ok(_) => DEFAULT_SOUND,
            Err(err) => {
                tracing::warn!(%err, "Could not read current sound");
                DEFAULT_SOUND
            }
        };
        let volume = match storage.get(SOUND_VOLUME_KEY) {
            Ok(Some(value)) => match value.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => v.clamp(0.0, 1.0),
                _ => {
                    tracing::warn!(%value, "Stored volume is malformed, using default");
                    DEFAULT_VOLUME
                }
            },
            Ok(None) => DEFAULT_VOLUME,
            Err(err) => {
                tracing::warn!(%err, "Could not read volume");
                DEFAULT_VOLUME
            }
        };

        let (synth, audio_error) = match acquire() {
            Ok(synth) => (Some(synth), false),
            Err(err) => {
                tracing::error!(%err, "Audio unavailable, continuing without sound");
                (None, true)
            }
        };

        tracing::debug!(sound_enabled, %current_sound, volume, audio_error, "Audio engine ready");
        AudioEngine {
            storage,
            synth,
            active: None,
            sound_enabled,
            current_sound,
            volume,
            audio_error,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn current_sound(&self) -> &Sound {
        &self.current_sound
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn audio_error(&self) -> bool {
        self.audio_error
    }

    pub fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    /// The continuous tone currently playing, if any.
    pub fn playing(&self) -> Option<&Sound> {
        self.active.as_ref().map(|a| &a.sound)
    }

    pub fn synth(&self) -> Option<&S> {
        self.synth.as_ref()
    }

    pub fn synth_mut(&mut self) -> Option<&mut S> {
        self.synth.as_mut()
    }

    /// Starts playing the current sound if sound is enabled. Called once after
    /// startup.
    pub fn resume(&mut self) {
        if self.sound_enabled && !self.current_sound.is_success() {
            let sound = self.current_sound.clone();
            self.play_sound(&sound);
        }
    }

    /// Plays `sound`, replacing the running tone. The same sound restarts.
    /// `Success` fires the cue on top of the running tone instead.
    pub fn play_sound(&mut self, sound: &Sound) {
        if !self.sound_enabled {
            return;
        }
        let gain = gain_for_volume(self.volume);
        let Some(synth) = self.synth.as_mut() else {
            return;
        };

        if sound.is_success() {
            if let Err(err) = synth.play_cue(&CueSpec::SUCCESS, gain) {
                self.fail(err);
            }
            return;
        }

        // Release the old voice before the new one exists.
        self.active = None;
        match synth.start_tone(&ToneSpec::for_sound(sound), gain) {
            Ok(voice) => {
                tracing::debug!(%sound, "Playing");
                self.active = Some(ActiveTone {
                    sound: sound.clone(),
                    voice,
                });
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn stop_all_sounds(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::debug!(sound = %active.sound, "Stopped");
        }
    }

    /// Turns sound on and starts the current sound.
    pub fn enable(&mut self) {
        self.sound_enabled = true;
        self.persist(SOUND_ENABLED_KEY, "true");
        self.resume();
    }

    /// Turns sound off and stops the running tone.
    pub fn disable(&mut self) {
        self.sound_enabled = false;
        self.persist(SOUND_ENABLED_KEY, "false");
        self.stop_all_sounds();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Selects the persisted ambient sound and plays it when enabled.
    /// The success cue can never become the current sound.
    pub fn set_current_sound(&mut self, sound: Sound) {
        if sound.is_success() {
            tracing::warn!("Refusing to select the success cue as ambient sound");
            return;
        }
        self.persist(CURRENT_SOUND_KEY, sound.id());
        self.current_sound = sound;
        if self.sound_enabled {
            let sound = self.current_sound.clone();
            self.play_sound(&sound);
        }
    }

    /// Sets the volume, clamped to `[0, 1]`, and rescales the running tone.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            tracing::warn!(volume, "Ignoring non-finite volume");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.persist(SOUND_VOLUME_KEY, &self.volume.to_string());

        let gain = gain_for_volume(self.volume);
        if let Some(active) = self.active.as_mut() {
            active.voice.set_gain(gain);
        }
    }

    /// A failed synthesis call disables audio for the rest of the process.
    fn fail(&mut self, err: AudioError) {
        tracing::error!(%err, "Error creating audio, disabling playback");
        self.active = None;
        if let Some(mut synth) = self.synth.take() {
            synth.close();
        }
        self.audio_error = true;
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            tracing::error!(%err, key, "Failed to save audio setting");
        }
    }
}

impl<K: KeyValueStore, S: ToneSynth> Drop for AudioEngine<K, S> {
    fn drop(&mut self) {
        self.stop_all_sounds();
        if let Some(synth) = self.synth.as_mut() {
            synth.close();
        }
    }
}
