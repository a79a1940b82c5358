//! Sludge movement and contact resolution
//!
//! Everything here is circle geometry: sludge are circles, the player body is
//! a circle inscribed in its box.

use glam::Vec2;

use super::geometry::{circles_overlap, direction_to};
use super::state::{GameEvent, GameState, Sludge};
use crate::consts::MAX_PARTICLE_SIZE;

/// Move every sludge one step toward `target`
///
/// Sludge already within its own radius of the target stays put, so it
/// doesn't jitter back and forth across the point.
pub fn attract_particles(particles: &mut [Sludge], target: Vec2) {
    for sludge in particles.iter_mut() {
        if let Some((dir, dist)) = direction_to(sludge.pos, target) {
            if dist > sludge.radius {
                sludge.pos += dir * sludge.speed;
            }
        }
    }
}

/// First overlapping pair `(i, j)` with `i < j`, scanning in list order
pub fn find_overlapping_pair(particles: &[Sludge]) -> Option<(usize, usize)> {
    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate().skip(i + 1) {
            if circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Combine overlapping sludge until none overlap; returns the merge count
///
/// Each merge replaces the pair with one sludge at their midpoint whose tier
/// is the sum of theirs (capped). The scan restarts after every merge, so a
/// freshly merged sludge can merge again in the same tick.
pub fn merge_overlapping(state: &mut GameState) -> usize {
    let mut merges = 0;
    while let Some((i, j)) = find_overlapping_pair(&state.particles) {
        // j > i, so removing j first keeps i valid
        let b = state.particles.remove(j);
        let a = state.particles.remove(i);
        let size = (a.size + b.size).min(MAX_PARTICLE_SIZE);
        let pos = (a.pos + b.pos) / 2.0;
        state.spawn_particle_at(pos, size);
        state.emit(GameEvent::ParticlesMerged { pos, size });
        merges += 1;
    }
    if merges > 0 {
        log::debug!("{merges} sludge merges, {} remaining", state.particles.len());
    }
    merges
}

/// Indices of sludge touching the player body, highest index first
pub fn body_contacts(particles: &[Sludge], center: Vec2, body_radius: f32) -> Vec<usize> {
    particles
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, p)| circles_overlap(p.pos, p.radius, center, body_radius))
        .map(|(i, _)| i)
        .collect()
}
