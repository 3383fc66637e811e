/// Procedural sound cues.
///
/// Each cue is synthesised into a mono `f32` buffer and handed to an
/// [`AudioBackend`], which plays it without blocking the caller. With no
/// backend every cue is a silent no-op.

use std::f32::consts::TAU;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Gain that exponential envelopes decay towards (exponential ramps cannot
/// reach zero).
const ENVELOPE_FLOOR: f32 = 0.001;

/// C4, E4, G4, C5.
pub const WAVE_CLEAR_NOTES: [f32; 4] = [261.63, 329.63, 392.00, 523.25];
pub const WAVE_CLEAR_STAGGER: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// One sample at `phase` in cycles, range [-1, 1].
    fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// A single oscillator with an exponential pitch sweep and gain decay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub gain: f32,
    pub duration: Duration,
}

impl Tone {
    pub const SHOOT: Tone = Tone {
        waveform: Waveform::Sawtooth,
        start_hz: 800.0,
        end_hz: 400.0,
        gain: 0.1,
        duration: Duration::from_millis(100),
    };

    pub const DESTROY: Tone = Tone {
        waveform: Waveform::Square,
        start_hz: 200.0,
        end_hz: 100.0,
        gain: 0.15,
        duration: Duration::from_millis(200),
    };

    pub fn note(hz: f32) -> Tone {
        Tone {
            waveform: Waveform::Sine,
            start_hz: hz,
            end_hz: hz,
            gain: 0.1,
            duration: Duration::from_millis(300),
        }
    }

    /// Render the tone at `sample_rate`.
    pub fn synthesize(&self, sample_rate: u32) -> Vec<f32> {
        let len = (self.duration.as_secs_f32() * sample_rate as f32).round() as usize;
        let dt = 1.0 / sample_rate as f32;
        let span = len.max(1) as f32;
        let pitch_ratio = self.end_hz / self.start_hz;
        let gain_ratio = ENVELOPE_FLOOR / self.gain;

        let mut phase = 0.0f32;
        (0..len)
            .map(|i| {
                let t = i as f32 / span;
                let freq = self.start_hz * pitch_ratio.powf(t);
                let gain = self.gain * gain_ratio.powf(t);
                let s = self.waveform.sample(phase) * gain;
                phase = (phase + freq * dt).fract();
                s
            })
            .collect()
    }
}

// ── Backends ──────────────────────────────────────────────────────────────────

/// Somewhere to send finished sample buffers.
pub trait AudioBackend {
    /// Queue `samples` to start after `delay`. Must not block.
    fn play(&self, samples: Vec<f32>, sample_rate: u32, delay: Duration);
}

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "audio")]
mod device {
    use std::time::Duration;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Source};
    use tracing::debug;

    use super::{AudioBackend, AudioError};

    /// Plays cues on the default output device through rodio's mixer.
    pub struct RodioBackend {
        /// Dropping the stream stops all output.
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioBackend {
        pub fn try_default() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
            Ok(Self { _stream: stream, handle })
        }
    }

    impl AudioBackend for RodioBackend {
        fn play(&self, samples: Vec<f32>, sample_rate: u32, delay: Duration) {
            let source = SamplesBuffer::new(1, sample_rate, samples).delay(delay);
            if let Err(err) = self.handle.play_raw(source) {
                debug!(error = %err, "dropped audio cue");
            }
        }
    }
}

#[cfg(feature = "audio")]
pub use device::RodioBackend;

/// Open the default output device if this build can play sound.
pub fn default_backend() -> Result<Box<dyn AudioBackend>, AudioError> {
    #[cfg(feature = "audio")]
    {
        Ok(Box::new(RodioBackend::try_default()?))
    }
    #[cfg(not(feature = "audio"))]
    {
        Err(AudioError::Unavailable("built without the `audio` feature".into()))
    }
}

// ── Cue player ────────────────────────────────────────────────────────────────

pub struct CuePlayer {
    backend: Option<Box<dyn AudioBackend>>,
    sample_rate: u32,
}

impl CuePlayer {
    pub fn new(backend: Option<Box<dyn AudioBackend>>, sample_rate: u32) -> Self {
        Self { backend, sample_rate }
    }

    /// A player that never makes a sound.
    pub fn silent() -> Self {
        Self::new(None, DEFAULT_SAMPLE_RATE)
    }

    /// Use the default device, degrading to silence if it cannot be opened.
    pub fn open_default(sample_rate: u32) -> Self {
        match default_backend() {
            Ok(backend) => Self::new(Some(backend), sample_rate),
            Err(err) => {
                warn!(error = %err, "continuing without sound");
                Self::new(None, sample_rate)
            }
        }
    }

    pub fn is_silent(&self) -> bool {
        self.backend.is_none()
    }

    fn play_tone(&self, tone: Tone, delay: Duration) {
        if let Some(backend) = &self.backend {
            backend.play(tone.synthesize(self.sample_rate), self.sample_rate, delay);
        }
    }

    pub fn play_shoot_cue(&self) {
        self.play_tone(Tone::SHOOT, Duration::ZERO);
    }

    pub fn play_destroy_cue(&self) {
        self.play_tone(Tone::DESTROY, Duration::ZERO);
    }

    /// The rising C-E-G-C arpeggio. Every note is queued up front with its
    /// own start delay.
    pub fn play_wave_clear_cue(&self) {
        for (i, &hz) in WAVE_CLEAR_NOTES.iter().enumerate() {
            self.play_tone(Tone::note(hz), WAVE_CLEAR_STAGGER * i as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_wave_is_bipolar() {
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
    }

    #[test]
    fn sawtooth_ramps_through_zero() {
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.5), 0.0);
    }

    #[test]
    fn silent_player_does_nothing() {
        let cues = CuePlayer::silent();
        assert!(cues.is_silent());
        cues.play_shoot_cue();
        cues.play_destroy_cue();
        cues.play_wave_clear_cue();
    }
}
