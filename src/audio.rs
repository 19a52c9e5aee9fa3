//! Audio cues for simulation events
//!
//! `SoundEffect::for_event` is the platform-neutral mapping. On the web,
//! `AudioManager` synthesises every cue with the Web Audio API - no external
//! files needed.

use crate::sim::{GameEvent, PowerupKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Block takes a hit but survives
    BlockCrack,
    /// Block destroyed
    BlockBreak,
    GotBlasters,
    PaddleShrink,
    PaddleGrow,
    /// One blaster shot, also the body of the laser loop
    LaserShoot,
    GameStart,
    GameOver,
    LifeLost,
    LevelWon,
}

impl SoundEffect {
    /// Discrete cue for an event. Loop control events have none; they are
    /// handled by the player directly.
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BlockCracked { .. } => Some(SoundEffect::BlockCrack),
            GameEvent::BlockDestroyed { .. } => Some(SoundEffect::BlockBreak),
            GameEvent::PowerupCollected { kind } => Some(match kind {
                PowerupKind::Blasters => SoundEffect::GotBlasters,
                PowerupKind::Small => SoundEffect::PaddleShrink,
                PowerupKind::Big => SoundEffect::PaddleGrow,
            }),
            GameEvent::LasersFired { .. } => Some(SoundEffect::LaserShoot),
            GameEvent::GameStarted => Some(SoundEffect::GameStart),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::LifeLost { .. } => Some(SoundEffect::LifeLost),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelWon),
            _ => None,
        }
    }
}

/// Re-trigger cadence of the continuous laser sound
pub const LASER_LOOP_INTERVAL_MS: f64 = 100.0;

/// Laser loop bookkeeping, kept apart from the Web Audio plumbing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaserLoop {
    active: bool,
    last_trigger_ms: Option<f64>,
}

impl LaserLoop {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if the cue should play right away
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.last_trigger_ms = Some(now_ms);
        true
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.last_trigger_ms = None;
    }

    /// Returns true when the loop is due for another cue. A clock that ran
    /// backwards resynchronises on the spot.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.active {
            return false;
        }
        let due = self
            .last_trigger_ms
            .is_none_or(|last| now_ms < last || now_ms - last >= LASER_LOOP_INTERVAL_MS);
        if due {
            self.last_trigger_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{LaserLoop, SoundEffect};
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        laser_loop: LaserLoop,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                laser_loop: LaserLoop::default(),
            }
        }

        /// Effective gain; zero mutes everything including the laser loop
        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
            if self.volume <= 0.0 {
                self.laser_loop.stop();
            }
        }

        /// Play the cues for a batch of simulation events
        pub fn handle_events(&mut self, events: &[GameEvent], now_ms: f64) {
            for event in events {
                match event {
                    GameEvent::LaserLoopStart => {
                        if self.volume > 0.0 && self.laser_loop.start(now_ms) {
                            self.play(SoundEffect::LaserShoot);
                        }
                    }
                    GameEvent::LaserLoopStop => self.laser_loop.stop(),
                    // Volleys are covered by the loop while it runs
                    GameEvent::LasersFired { .. } if self.laser_loop.is_active() => {}
                    _ => {
                        if let Some(effect) = SoundEffect::for_event(event) {
                            self.play(effect);
                        }
                    }
                }
            }
        }

        /// Called every animation frame to keep the laser loop going
        pub fn update(&mut self, now_ms: f64) {
            if self.laser_loop.poll(now_ms) {
                self.play(SoundEffect::LaserShoot);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
                SoundEffect::BlockCrack => self.play_block_crack(ctx, vol),
                SoundEffect::BlockBreak => self.play_block_break(ctx, vol),
                SoundEffect::GotBlasters => self.play_arpeggio(ctx, vol, &[500.0, 750.0, 1000.0, 1500.0], 0.06),
                SoundEffect::PaddleShrink => self.play_sweep(ctx, vol, 700.0, 200.0),
                SoundEffect::PaddleGrow => self.play_sweep(ctx, vol, 200.0, 700.0),
                SoundEffect::LaserShoot => self.play_laser(ctx, vol),
                SoundEffect::GameStart => self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0], 0.08),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::LifeLost => self.play_life_lost(ctx, vol),
                SoundEffect::LevelWon => self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1),
            }
        }

        // === Sound generators ===

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

        /// Paddle hit - solid thump
        fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Block crack - short tap
        fn play_block_crack(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Block break - crunch with a bass thump
        fn play_block_break(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.frequency().set_value_at_time(900.0, t).ok();
                osc.frequency().set_value_at_time(400.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(700.0, t + 0.06).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Laser - fast downward zap
        fn play_laser(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.09)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.09)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Paddle resize - pitch glide between two frequencies
        fn play_sweep(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Rising note sequence
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], step: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.35).ok();
                }
            }
        }

        /// Life lost - short falling tone
        fn play_life_lost(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }

        /// Game over - sad descending
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BlockCracked { index: 3 }),
            Some(SoundEffect::BlockCrack)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerupCollected {
                kind: PowerupKind::Small
            }),
            Some(SoundEffect::PaddleShrink)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerupCollected {
                kind: PowerupKind::Big
            }),
            Some(SoundEffect::PaddleGrow)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::WallBounce), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::LaserLoopStart), None);
    }

    #[test]
    fn test_final_life_plays_both_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LifeLost { lives_left: 2 }),
            Some(SoundEffect::LifeLost)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LifeLost { lives_left: 0 }),
            Some(SoundEffect::LifeLost)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { score: 10 }),
            Some(SoundEffect::GameOver)
        );
    }

    #[test]
    fn test_laser_loop_cadence() {
        let mut laser_loop = LaserLoop::default();
        assert!(!laser_loop.poll(0.0));

        assert!(laser_loop.start(1000.0));
        assert!(!laser_loop.start(1010.0));
        assert!(!laser_loop.poll(1050.0));
        assert!(laser_loop.poll(1100.0));
        assert!(!laser_loop.poll(1150.0));
        assert!(laser_loop.poll(1200.0));

        laser_loop.stop();
        assert!(!laser_loop.is_active());
        assert!(!laser_loop.poll(5000.0));
    }

    #[test]
    fn test_laser_loop_recovers_from_clock_switch() {
        let mut laser_loop = LaserLoop::default();
        // Started from a wall-clock timestamp, then polled with frame times
        assert!(laser_loop.start(1_760_000_000_000.0));

        let mut retriggers = 0;
        let mut now = 5000.0;
        for _ in 0..600 {
            if laser_loop.poll(now) {
                retriggers += 1;
            }
            now += 16.7;
        }
        assert!(laser_loop.is_active());
        // Ten seconds at a 100 ms cadence
        assert!(retriggers >= 90, "only {} re-triggers", retriggers);
    }
}
