//! Audio cues
//!
//! The simulation only says *when* something should sound; an [`AudioSink`]
//! decides how. The browser build synthesises everything with Web Audio
//! oscillators, so no sound files are needed.

use crate::sim::GameEvent;

/// Things the audio collaborator is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Begin the looping ambient track
    StartAmbient,
    /// Pause the ambient track
    StopAmbient,
    /// One-shot game-over sting
    GameOverSting,
}

/// Cues triggered by a game event
pub fn cues_for(event: &GameEvent) -> &'static [AudioCue] {
    match event {
        GameEvent::SessionStarted { .. } => &[AudioCue::StartAmbient],
        GameEvent::GameOver { .. } => &[AudioCue::StopAmbient, AudioCue::GameOverSting],
        GameEvent::Hopped { .. } | GameEvent::LaneSpawned { .. } => &[],
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Forward every cue raised by `events` to `sink`
pub fn dispatch<'a, S: AudioSink + ?Sized>(
    sink: &mut S,
    events: impl IntoIterator<Item = &'a GameEvent>,
) {
    for event in events {
        for cue in cues_for(event) {
            sink.play(*cue);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// Ambient drone partials (Hz)
    const AMBIENT_PARTIALS: [f32; 2] = [110.0, 164.8];
    /// Descending game-over notes (Hz)
    const STING_NOTES: [f32; 4] = [400.0, 350.0, 300.0, 200.0];

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music_volume: f32,
        sfx_volume: f32,
        ambient: Vec<OscillatorNode>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let (music_volume, sfx_volume) = settings.effective_volumes();
            Self {
                ctx,
                music_volume,
                sfx_volume,
                ambient: Vec::new(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Re-read volumes, e.g. after a mute toggle
        pub fn apply_settings(&mut self, settings: &Settings) {
            let (music, sfx) = settings.effective_volumes();
            self.music_volume = music;
            self.sfx_volume = sfx;
            if self.music_volume <= 0.0 {
                self.stop_ambient();
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

        fn start_ambient(&mut self) {
            self.stop_ambient();
            if self.music_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let mut voices = Vec::with_capacity(AMBIENT_PARTIALS.len());
            for freq in AMBIENT_PARTIALS {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) {
                    gain.gain().set_value(self.music_volume);
                    if osc.start().is_ok() {
                        voices.push(osc);
                    }
                }
            }
            self.ambient = voices;
        }

        fn stop_ambient(&mut self) {
            for osc in self.ambient.drain(..) {
                osc.stop().ok();
            }
        }

        /// Game over - descending tones
        fn play_sting(&self) {
            if self.sfx_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            for (i, freq) in STING_NOTES.iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(self.sfx_volume, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.0001, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: AudioCue) {
            match cue {
                AudioCue::StartAmbient => self.start_ambient(),
                AudioCue::StopAmbient => self.stop_ambient(),
                AudioCue::GameOverSting => self.play_sting(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, LaneCategory};

    #[derive(Default)]
    struct Recorder(Vec<AudioCue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn test_gameplay_events_are_silent() {
        assert!(cues_for(&GameEvent::Hopped { score: 1 }).is_empty());
        assert!(
            cues_for(&GameEvent::LaneSpawned {
                y: 0.0,
                category: LaneCategory::River
            })
            .is_empty()
        );
    }

    #[test]
    fn test_session_lifecycle_cues() {
        let mut state = GameState::new(11);
        let mut sink = Recorder::default();
        dispatch(&mut sink, &state.drain_events());
        assert_eq!(sink.0, vec![AudioCue::StartAmbient]);

        state.end_run();
        state.end_run();
        dispatch(&mut sink, &state.drain_events());
        assert_eq!(
            sink.0,
            vec![
                AudioCue::StartAmbient,
                AudioCue::StopAmbient,
                AudioCue::GameOverSting
            ]
        );

        state.restart();
        dispatch(&mut sink, &state.drain_events());
        assert_eq!(sink.0.last(), Some(&AudioCue::StartAmbient));
    }
}
