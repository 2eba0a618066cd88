//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of oscillator tones; the tables are plain
//! data so the mapping from game events can be checked natively.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    DoubleJump,
    CollectBonus,
    /// Obstacle crash or pit fall
    Hit,
    ComboComplete,
    LevelUp,
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One scheduled oscillator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Exponential glide target over the tone
    pub glide_to: Option<f32>,
    /// Offset from the effect start (s)
    pub delay: f64,
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain before volume
    pub gain: f32,
    /// Abrupt frequency jumps `(offset s, Hz)` for a noisy crackle
    pub steps: &'static [(f64, f32)],
}

impl Tone {
    const fn new(freq: f32, delay: f64, duration: f64, waveform: Waveform, gain: f32) -> Self {
        Self {
            freq,
            glide_to: None,
            delay,
            duration,
            waveform,
            gain,
            steps: &[],
        }
    }

    const fn glide(mut self, to: f32) -> Self {
        self.glide_to = Some(to);
        self
    }

    /// Start-to-stop span including the delay
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

const CRACKLE: &[(f64, f32)] = &[
    (0.02, 900.0),
    (0.04, 120.0),
    (0.06, 1400.0),
    (0.09, 90.0),
    (0.12, 1100.0),
    (0.16, 70.0),
    (0.2, 800.0),
];

/// Evenly spaced notes of one shape
fn arpeggio(freqs: &[f32], spacing: f64, duration: f64, waveform: Waveform, gain: f32) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &f)| Tone::new(f, i as f64 * spacing, duration, waveform, gain))
        .collect()
}

impl SoundEffect {
    /// Sound for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::DoubleJumped => Some(SoundEffect::DoubleJump),
            GameEvent::BonusCollected { .. } => Some(SoundEffect::CollectBonus),
            GameEvent::ObstacleHit { .. } | GameEvent::PitFall => Some(SoundEffect::Hit),
            GameEvent::Combo { .. } => Some(SoundEffect::ComboComplete),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }

    /// Oscillators making up the effect
    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;

        match self {
            SoundEffect::Jump => vec![Tone::new(400.0, 0.0, 0.1, Sine, 0.3).glide(600.0)],
            SoundEffect::DoubleJump => vec![Tone::new(500.0, 0.0, 0.1, Sine, 0.3).glide(750.0)],
            SoundEffect::CollectBonus => arpeggio(&[523.0, 659.0, 784.0], 0.06, 0.2, Sine, 0.25),
            SoundEffect::Hit => vec![
                Tone::new(150.0, 0.0, 0.3, Sawtooth, 0.4).glide(60.0),
                Tone {
                    steps: CRACKLE,
                    ..Tone::new(200.0, 0.0, 0.25, Square, 0.15)
                },
            ],
            SoundEffect::ComboComplete => {
                arpeggio(&[392.0, 440.0, 494.0, 523.0, 587.0], 0.08, 0.15, Sine, 0.25)
            }
            SoundEffect::LevelUp => {
                arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.1, 0.25, Triangle, 0.3)
            }
            SoundEffect::GameOver => {
                arpeggio(&[523.0, 466.0, 415.0, 370.0, 330.0], 0.3, 0.5, Sine, 0.3)
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use manager::AudioManager;

#[cfg(target_arch = "wasm32")]
mod manager {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Waveform};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up a changed volume or mute toggle
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play every sound the frame's events call for
        pub fn play_events(&self, events: &[GameEvent]) {
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.play(effect);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let start = ctx.current_time();
            for tone in effect.tones() {
                self.schedule(ctx, &tone, start);
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn schedule(&self, ctx: &AudioContext, tone: &Tone, start: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.waveform.into()) else {
                return;
            };
            let t = start + tone.delay;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
                .ok();
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            if let Some(to) = tone.glide_to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + tone.duration)
                    .ok();
            }
            for &(offset, freq) in tone.steps {
                osc.frequency().set_value_at_time(freq, t + offset).ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }
}
