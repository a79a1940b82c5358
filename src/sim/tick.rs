//! Fixed-step simulation tick
//!
//! One call per display frame. Steps run in a fixed order and later steps see
//! what earlier ones did within the same tick.

use rand::Rng;

use super::collision::{attract_particles, body_contacts, merge_overlapping};
use super::geometry::{SweepArc, direction_to};
use super::input::{InputEvent, TickInput};
use super::snapshot::Snapshot;
use super::state::{FxParticle, GameEvent, GameMode, GameState};
use super::upgrade::{apply_selected_upgrade, generate_upgrade_choices};
use crate::audio::{AudioSink, SoundEvent};
use crate::consts::{MAX_TRAIL_PARTICLES, TRAIL_SPAWN_CHANCE};

/// Result of resolving the active sword swing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepOutcome {
    Continue,
    /// A kill crossed the level threshold; the rest of the tick is skipped
    LevelUp,
}

/// Advance the game by one frame and publish the resulting snapshot
pub fn tick(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) -> Snapshot {
    step(state, input, audio);
    state.snapshot()
}

fn step(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    state.events.clear();
    if let Some(aim) = input.aim_point() {
        state.last_aim = Some(aim);
    }

    for event in &input.events {
        handle_event(state, *event, audio);
    }

    match state.mode {
        GameMode::Paused | GameMode::UpgradeSelect => return,
        GameMode::GameOver => {
            state.restart_timer = state.restart_timer.saturating_sub(1);
            if state.restart_timer == 0 {
                state.reset();
                state.emit(GameEvent::Restarted);
            }
            return;
        }
        GameMode::Running => {}
    }

    state.time_ticks += 1;

    move_player(state, input);
    maintain_population(state);

    let center = state.player.center();
    attract_particles(&mut state.particles, center);
    merge_overlapping(state);

    if update_attack(state, audio) == SweepOutcome::LevelUp {
        return;
    }

    state.player.tick_level_up_pulse();
    state.screen_shake.decay();
    age_fx(state);

    resolve_body_contacts(state, audio);

    let max_health = state.player.max_health;
    state.player.health = state.player.health.clamp(0, max_health);
}

/// Apply one discrete input event to the mode machine
fn handle_event(state: &mut GameState, event: InputEvent, audio: &mut dyn AudioSink) {
    match (event, state.mode) {
        (InputEvent::TogglePause, GameMode::Running) => {
            state.mode = GameMode::Paused;
            log::info!("Game paused");
        }
        (InputEvent::TogglePause | InputEvent::Accept, GameMode::Paused) => {
            state.mode = GameMode::Running;
            log::info!("Game resumed");
        }
        (InputEvent::SelectUpgrade(index), GameMode::UpgradeSelect) => {
            apply_selected_upgrade(state, index, audio);
        }
        (InputEvent::ToggleMusic, mode) if mode != GameMode::UpgradeSelect => {
            let enabled = state.settings.toggle_music();
            audio.set_music_enabled(enabled);
        }
        _ => {}
    }
}

/// Resolve movement intent, integrate, and keep the player in the arena
fn move_player(state: &mut GameState, input: &TickInput) {
    let intent = input.move_intent(state.tuning.touch_move_threshold);
    state.player.current_move = intent;

    if intent.is_moving() {
        let dir = intent.as_vec2();
        let mut delta = dir * state.player.speed;
        if intent.is_diagonal() {
            delta /= std::f32::consts::SQRT_2;
        }
        let trail_origin = state.player.center();
        state.player.pos += delta;
        // Facing follows the intent, not the (possibly clamped) motion
        state.player.facing = dir.normalize();

        if state.settings.trails && state.rng().random_bool(TRAIL_SPAWN_CHANCE) {
            let body = state.player.size;
            let puff = FxParticle::trail(trail_origin, body, state.rng());
            state.trail_fx.push(puff);
        }
        if state.trail_fx.len() > MAX_TRAIL_PARTICLES {
            let excess = state.trail_fx.len() - MAX_TRAIL_PARTICLES;
            state.trail_fx.drain(..excess);
        }
    }

    let arena = state.arena;
    state.player.clamp_to_arena(arena);
}

/// Maybe spawn one sludge while under the level's cap
fn maintain_population(state: &mut GameState) {
    if state.particles.len() >= state.particle_cap() {
        return;
    }
    let rate = state.tuning.particle_spawn_rate;
    if state.rng().random_bool(rate) {
        state.spawn_particle_random();
    }
}

/// Count down the cooldown, start swings, and cut down sludge in the sweep
fn update_attack(state: &mut GameState, audio: &mut dyn AudioSink) -> SweepOutcome {
    let last_aim = state.last_aim;
    let player = &mut state.player;
    player.attack_cooldown_timer = player.attack_cooldown_timer.saturating_sub(1);

    if !player.is_attacking && player.attack_cooldown_timer == 0 {
        player.is_attacking = true;
        player.attack_timer = player.attack_duration;
        player.attack_cooldown_timer = player.attack_cooldown_max;

        let center = player.center();
        let aim = last_aim
            .and_then(|p| direction_to(center, p))
            .map(|(dir, _)| dir)
            .unwrap_or(player.facing);
        player.attack_angle_start = aim.y.atan2(aim.x) - player.sword_sweep_angle / 2.0;
        audio.play(SoundEvent::PlayerAttack);
    }

    if !player.is_attacking {
        return SweepOutcome::Continue;
    }

    player.attack_timer = player.attack_timer.saturating_sub(1);
    let duration = player.attack_duration.max(1) as f32;
    let progress = 1.0 - player.attack_timer as f32 / duration;
    let arc = SweepArc::partial(player.attack_angle_start, player.sword_sweep_angle, progress);
    let center = player.center();
    let inner = player.body_radius();
    let outer = player.sword_length;
    let growth = state.tuning.xp_growth;

    let mut i = state.particles.len();
    while i > 0 {
        i -= 1;
        if !arc.contains_point(center, state.particles[i].pos, inner, outer) {
            continue;
        }

        let sludge = state.particles.remove(i);
        let leveled = state.player.award_xp(sludge.xp_value, growth);
        let sparks = FxParticle::sparks(sludge.pos, sludge.color, state.rng());
        state.spark_fx.extend(sparks);
        state.emit(GameEvent::ParticleKilled {
            pos: sludge.pos,
            size: sludge.size,
        });
        audio.play(SoundEvent::ParticleHitSword);

        if leveled {
            let level = state.player.level;
            log::info!("Level up! Now level {level}");
            state.mode = GameMode::UpgradeSelect;
            generate_upgrade_choices(state);
            state.emit(GameEvent::LevelUp { level });
            return SweepOutcome::LevelUp;
        }
    }

    if state.player.attack_timer == 0 {
        state.player.is_attacking = false;
    }
    SweepOutcome::Continue
}

/// Move, fade and prune trail puffs and sparks
fn age_fx(state: &mut GameState) {
    state.trail_fx.retain_mut(FxParticle::age_trail);
    state.spark_fx.retain_mut(FxParticle::age_spark);
}

/// Sludge touching the player body deal damage and are consumed
///
/// Every contact is consumed even after health runs out; the switch to
/// game over happens once, on the first hit that empties the bar.
fn resolve_body_contacts(state: &mut GameState, audio: &mut dyn AudioSink) {
    let center = state.player.center();
    let radius = state.player.body_radius();

    for i in body_contacts(&state.particles, center, radius) {
        let sludge = state.particles.remove(i);
        state.player.health = (state.player.health - sludge.damage).max(0);
        state.screen_shake.trigger();
        state.emit(GameEvent::DamageTaken {
            damage: sludge.damage,
            health: state.player.health,
        });
        audio.play(SoundEvent::PlayerTakeDamage);
        log::debug!(
            "Player hit by sludge! Damage: {}, Health: {}",
            sludge.damage,
            state.player.health
        );

        if state.player.health == 0 && state.mode != GameMode::GameOver {
            state.mode = GameMode::GameOver;
            state.restart_timer = state.tuning.restart_delay;
            state.emit(GameEvent::GameOver);
            audio.play(SoundEvent::GameOver);
            log::info!("Game over at level {}", state.player.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, RecordingAudio};
    use crate::sim::input::{DirectionKeys, TouchDrag};
    use crate::sim::upgrade::UpgradeId;
    use crate::{Settings, Tuning};
    use glam::Vec2;

    /// Empty arena with no random spawns
    fn quiet_state() -> GameState {
        let tuning = Tuning {
            initial_particles: 0,
            particle_spawn_rate: 0.0,
            ..Default::default()
        };
        GameState::with_config(42, tuning, Settings::default(), Vec2::new(800.0, 600.0))
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(state, input, &mut NullAudio);
        }
    }

    fn pointer_at(p: Vec2) -> TickInput {
        TickInput {
            pointer: Some(p),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_in_tick() {
        let mut state = quiet_state();
        // Far from the player and the sword
        state.spawn_particle_at(Vec2::new(50.0, 50.0), 1);
        state.spawn_particle_at(Vec2::new(53.0, 53.0), 1);

        let snap = tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert_eq!(snap.particles.len(), 1);
        let merged = &snap.particles[0];
        assert_eq!((merged.size, merged.radius, merged.damage, merged.xp_value), (2, 7.0, 2, 2));
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut state = quiet_state();
        let start = state.player.pos;
        let mut input = TickInput::default();
        input.keys = DirectionKeys {
            s: true,
            d: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut NullAudio);
        let moved = state.player.pos - start;
        assert!((moved.length() - 5.0).abs() < 1e-4);
        assert!((state.player.facing - Vec2::new(1.0, 1.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_facing_persists_when_idle() {
        let mut state = quiet_state();
        let input = TickInput {
            keys: DirectionKeys {
                a: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, &mut NullAudio);
        run(&mut state, &TickInput::default(), 3);
        assert_eq!(state.player.facing, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_movement_clamped_to_arena() {
        let mut state = quiet_state();
        state.player.pos = Vec2::new(2.0, 300.0);
        let input = TickInput {
            keys: DirectionKeys {
                arrow_left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, &mut NullAudio);
        assert_eq!(state.player.pos.x, 0.0);
        // Facing still follows the intent even though the wall stopped us
        assert_eq!(state.player.facing, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_attack_cycle_timing() {
        let mut state = quiet_state();
        let mut audio = RecordingAudio::default();
        tick(&mut state, &TickInput::default(), &mut audio);
        assert!(state.player.is_attacking);
        assert_eq!(state.player.attack_timer, 19);
        assert_eq!(audio.count(SoundEvent::PlayerAttack), 1);

        for _ in 0..19 {
            tick(&mut state, &TickInput::default(), &mut audio);
        }
        assert!(!state.player.is_attacking);

        // Next swing starts once the 45-frame cooldown runs out (tick 46)
        for _ in 0..25 {
            tick(&mut state, &TickInput::default(), &mut audio);
        }
        assert_eq!(audio.count(SoundEvent::PlayerAttack), 1);
        tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(audio.count(SoundEvent::PlayerAttack), 2);
    }

    #[test]
    fn test_attack_aims_at_pointer() {
        let mut state = quiet_state();
        let center = state.player.center();
        tick(&mut state, &pointer_at(center + Vec2::new(0.0, 50.0)), &mut NullAudio);
        let expected = std::f32::consts::FRAC_PI_2 - state.player.sword_sweep_angle / 2.0;
        assert!((state.player.attack_angle_start - expected).abs() < 1e-5);
    }

    #[test]
    fn test_attack_falls_back_to_facing() {
        let mut state = quiet_state();
        let center = state.player.center();
        // Pointer exactly on the player centre gives no direction
        tick(&mut state, &pointer_at(center), &mut NullAudio);
        let expected = -state.player.sword_sweep_angle / 2.0;
        assert!((state.player.attack_angle_start - expected).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_kills_and_awards_xp() {
        let mut state = quiet_state();
        let center = state.player.center();
        state.spawn_particle_at(center + Vec2::new(50.0, 0.0), 2);
        state.particles[0].speed = 0.0;
        let mut audio = RecordingAudio::default();

        // Straight ahead is reached halfway through the 20-frame swing
        for _ in 0..12 {
            tick(&mut state, &TickInput::default(), &mut audio);
        }
        assert!(state.particles.is_empty());
        assert_eq!(state.player.xp, 2);
        assert!(!state.spark_fx.is_empty());
        assert_eq!(audio.count(SoundEvent::ParticleHitSword), 1);
    }

    #[test]
    fn test_sweep_ignores_out_of_range() {
        let mut state = quiet_state();
        let center = state.player.center();
        // Past the sword tip, and behind the player
        state.spawn_particle_at(center + Vec2::new(120.0, 0.0), 1);
        state.spawn_particle_at(center + Vec2::new(-50.0, 0.0), 1);
        for p in &mut state.particles {
            p.speed = 0.0;
        }
        run(&mut state, &TickInput::default(), 20);
        assert_eq!(state.particles.len(), 2);
        assert_eq!(state.player.xp, 0);
    }

    #[test]
    fn test_level_up_carry_and_early_return() {
        let mut state = quiet_state();
        let center = state.player.center();
        state.player.xp = state.player.xp_to_next_level - 1;
        let threshold = state.player.xp_to_next_level;
        // Same ray, far enough apart not to merge; the later one is processed first
        let behind = state.spawn_particle_at(center + Vec2::new(70.0, 0.0), 1);
        state.spawn_particle_at(center + Vec2::new(40.0, 0.0), 3);
        for p in &mut state.particles {
            p.speed = 0.0;
        }

        let mut ticks = 0;
        while state.mode == GameMode::Running && ticks < 20 {
            tick(&mut state, &TickInput::default(), &mut NullAudio);
            ticks += 1;
        }

        assert_eq!(state.mode, GameMode::UpgradeSelect);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.xp, (threshold - 1 + 3) - threshold);
        assert_eq!(state.player.xp_to_next_level, 15);
        assert_eq!(state.upgrade_choices.len(), 3);
        // The level up stopped the sweep before it reached the other sludge
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.particles[0].id, behind);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_upgrade_select_freezes_simulation() {
        let mut state = quiet_state();
        state.mode = GameMode::UpgradeSelect;
        state.upgrade_choices = vec![UpgradeId::MoveSpeed, UpgradeId::AttackSpeed];
        state.spawn_particle_at(Vec2::new(100.0, 100.0), 1);
        let before = state.particles[0].pos;
        let input = TickInput::default().with_event(InputEvent::TogglePause);
        run(&mut state, &input, 5);
        assert_eq!(state.mode, GameMode::UpgradeSelect);
        assert_eq!(state.particles[0].pos, before);
        assert_eq!(state.time_ticks, 0);

        let choose = TickInput::default().with_event(InputEvent::SelectUpgrade(0));
        let mut audio = RecordingAudio::default();
        tick(&mut state, &choose, &mut audio);
        assert_eq!(state.mode, GameMode::Running);
        assert_eq!(state.player.speed, 5.5);
        assert_eq!(audio.count(SoundEvent::LevelUp), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_damage_scenarios() {
        let mut state = quiet_state();
        let center = state.player.center();
        state.spawn_particle_at(center, 1);
        let mut audio = RecordingAudio::default();
        let snap = tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(snap.health, 9);
        assert!(snap.particles.is_empty());
        assert!(snap.screen_shake > 0.0);
        assert_eq!(audio.count(SoundEvent::PlayerTakeDamage), 1);

        state.spawn_particle_at(state.player.center(), 2);
        tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(state.player.health, 7);
    }

    #[test]
    fn test_game_over_and_restart() {
        let tuning = Tuning {
            initial_particles: 0,
            particle_spawn_rate: 0.0,
            ..Default::default()
        };
        let mut state = GameState::with_config(8, tuning, Settings::default(), Vec2::new(800.0, 600.0));
        state.player.health = 2;
        state.player.level = 3;
        state.player.xp = 5;
        state.player.speed = 9.0;
        let center = state.player.center();
        state.spawn_particle_at(center, 4);
        state.spawn_particle_at(Vec2::new(30.0, 30.0), 1);

        let mut audio = RecordingAudio::default();
        tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.restart_timer, 180);
        assert_eq!(audio.count(SoundEvent::GameOver), 1);

        // Pause is ignored while dead
        let pause = TickInput::default().with_event(InputEvent::TogglePause);
        tick(&mut state, &pause, &mut audio);
        assert_eq!(state.mode, GameMode::GameOver);

        run(&mut state, &TickInput::default(), 178);
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.restart_timer, 1);

        tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(state.mode, GameMode::Running);
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.player.level, 1);
        assert_eq!(state.player.xp, 0);
        assert_eq!(state.player.speed, 5.0);
        assert!(state.particles.is_empty());
        assert!(state.trail_fx.is_empty());
        assert!(state.spark_fx.is_empty());
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_killing_blow_consumes_every_contact() {
        let mut state = quiet_state();
        state.player.health = 1;
        state.player.attack_cooldown_timer = 30;
        let center = state.player.center();
        // Both touch the body but sit 20 apart, so they never merge
        state.spawn_particle_at(center + Vec2::new(10.0, 0.0), 1);
        state.spawn_particle_at(center - Vec2::new(10.0, 0.0), 1);
        for p in &mut state.particles {
            p.speed = 0.0;
        }

        let mut audio = RecordingAudio::default();
        let snap = tick(&mut state, &TickInput::default(), &mut audio);
        assert_eq!(snap.mode, GameMode::GameOver);
        assert_eq!(snap.health, 0);
        assert!(snap.particles.is_empty());
        assert_eq!(audio.count(SoundEvent::PlayerTakeDamage), 2);
        assert_eq!(audio.count(SoundEvent::GameOver), 1);
        let game_overs = snap.events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(game_overs, 1);
        assert_eq!(state.restart_timer, 180);
    }

    #[test]
    fn test_aim_remembers_lifted_touch() {
        let mut state = quiet_state();
        let center = state.player.center();
        state.player.attack_cooldown_timer = 3;
        let touch = TickInput {
            touch: Some(TouchDrag {
                start: center,
                current: center + Vec2::new(0.0, -50.0),
            }),
            ..Default::default()
        };
        tick(&mut state, &touch, &mut NullAudio);
        assert!(!state.player.is_attacking);

        // Finger lifted; the swing still heads for where it was
        run(&mut state, &TickInput::default(), 2);
        assert!(state.player.is_attacking);
        let expected = 1.5 * std::f32::consts::PI - state.player.sword_sweep_angle / 2.0;
        assert!((crate::normalize_angle(state.player.attack_angle_start) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_restart_reseeds_sludge() {
        let mut state = GameState::new(77);
        state.particles.clear();
        state.mode = GameMode::GameOver;
        state.restart_timer = 1;
        tick(&mut state, &TickInput::default(), &mut NullAudio);
        assert_eq!(state.mode, GameMode::Running);
        assert_eq!(state.particles.len(), 15);
        assert!(state.particles.iter().all(|p| p.size == 1));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = quiet_state();
        let pause = TickInput::default().with_event(InputEvent::TogglePause);
        tick(&mut state, &pause, &mut NullAudio);
        assert_eq!(state.mode, GameMode::Paused);
        let frozen_ticks = state.time_ticks;

        run(&mut state, &TickInput::default(), 10);
        assert_eq!(state.time_ticks, frozen_ticks);

        let accept = TickInput::default().with_event(InputEvent::Accept);
        tick(&mut state, &accept, &mut NullAudio);
        assert_eq!(state.mode, GameMode::Running);

        tick(&mut state, &pause, &mut NullAudio);
        tick(&mut state, &pause, &mut NullAudio);
        assert_eq!(state.mode, GameMode::Running);
    }

    #[test]
    fn test_toggle_music_reaches_sink() {
        let mut state = quiet_state();
        let mut audio = RecordingAudio::default();
        let toggle = TickInput::default().with_event(InputEvent::ToggleMusic);
        tick(&mut state, &toggle, &mut audio);
        assert_eq!(audio.music_enabled, Some(false));
        assert!(!state.settings.music_enabled);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let tuning = Tuning {
            initial_particles: 0,
            particle_spawn_rate: 1.0,
            base_max_particles: 3,
            ..Default::default()
        };
        let mut state = GameState::with_config(5, tuning, Settings::default(), Vec2::new(800.0, 600.0));
        let mut max_seen = 0;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &mut NullAudio);
            max_seen = max_seen.max(state.particles.len());
        }
        assert!(max_seen <= 3);
        assert!(max_seen > 0);
    }

    #[test]
    fn test_trail_capped() {
        let mut state = quiet_state();
        let input = TickInput {
            keys: DirectionKeys {
                d: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, &mut NullAudio);
            assert!(state.trail_fx.len() <= MAX_TRAIL_PARTICLES);
        }
        assert!(!state.trail_fx.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            keys: DirectionKeys {
                w: true,
                d: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state1, &input, &mut NullAudio);
            tick(&mut state2, &input, &mut NullAudio);
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.particles.len(), state2.particles.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.health, state2.player.health);
    }
}
