//! Audio system using Web Audio API
//!
//! Procedurally generated engine drone and crash - no external files needed.
//! If the browser refuses an AudioContext the game simply runs silent.

use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::racing::RaceEvent;

/// Engine drone base pitch (Hz)
const ENGINE_BASE_FREQ: f32 = 55.0;
/// Extra pitch per unit of speed above the starting speed
const ENGINE_FREQ_PER_SPEED: f32 = 9.0;
const ENGINE_LEVEL: f32 = 0.5;
const CRASH_LEVEL: f32 = 0.7;

/// A running engine drone
struct EngineVoice {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the racing game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    engine: Option<EngineVoice>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            engine: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_engine();
        }
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// React to a race event
    pub fn handle(&mut self, event: RaceEvent) {
        match event {
            RaceEvent::Started => self.start_engine(),
            RaceEvent::SpeedUp { speed } => self.set_engine_speed(speed),
            RaceEvent::Crashed { .. } => {
                self.stop_engine();
                self.play_crash();
            }
            RaceEvent::Stopped => self.stop_engine(),
        }
    }

    /// Resume context if suspended (browsers require user gesture)
    fn resume(&self, ctx: &AudioContext) {
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
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

    /// Engine - low sawtooth through a lowpass, loops until stopped
    fn start_engine(&mut self) {
        self.stop_engine();
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume(ctx);

        let Some(osc) = ctx.create_oscillator().ok() else { return };
        let Some(filter) = ctx.create_biquad_filter().ok() else { return };
        let Some(gain) = ctx.create_gain().ok() else { return };

        osc.set_type(OscillatorType::Sawtooth);
        osc.frequency().set_value(ENGINE_BASE_FREQ);
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(400.0);

        let wired = osc.connect_with_audio_node(&filter).is_ok()
            && filter.connect_with_audio_node(&gain).is_ok()
            && gain.connect_with_audio_node(&ctx.destination()).is_ok();
        if !wired {
            log::warn!("Failed to wire engine sound");
            return;
        }

        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * ENGINE_LEVEL * 0.3, t + 0.3)
            .ok();
        osc.start().ok();

        self.engine = Some(EngineVoice { osc, gain });
    }

    /// Raise engine pitch with speed
    fn set_engine_speed(&self, speed: f32) {
        let (Some(ctx), Some(engine)) = (&self.ctx, &self.engine) else {
            return;
        };
        let freq = ENGINE_BASE_FREQ
            + (speed - crate::consts::INITIAL_SPEED).max(0.0) * ENGINE_FREQ_PER_SPEED;
        engine
            .osc
            .frequency()
            .linear_ramp_to_value_at_time(freq, ctx.current_time() + 0.2)
            .ok();
    }

    /// Fade the drone out and release it
    fn stop_engine(&mut self) {
        let Some(engine) = self.engine.take() else { return };
        let Some(ctx) = &self.ctx else { return };
        let t = ctx.current_time();
        engine.gain.gain().set_target_at_time(0.0, t, 0.05).ok();
        engine.osc.stop_with_when(t + 0.3).ok();
    }

    /// Crash - noisy downward sweep plus a heavy thump
    fn play_crash(&self) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume(ctx);
        let t = ctx.current_time();

        // Crunch: square wave jumping around as it falls
        if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * CRASH_LEVEL * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(1200.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.07).ok();
            osc.frequency().set_value_at_time(700.0, t + 0.1).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }

        // Impact thump
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * CRASH_LEVEL, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }
}
