//! Per-frame simulation tick
//!
//! Order within a tick: requests, due continuations, round clock, spawner,
//! block motion, weapon contact, slicing, debris.

use glam::Vec3;

use super::block::BlockOutcome;
use super::collision::{BodyTag, Blade, Collider, blade_overlaps, linecast};
use super::mesh::ConvexMesh;
use super::session::SessionPhase;
use super::state::{Deferred, GameEvent, GameState};
use crate::hud::Hud;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start button pressed
    pub start: bool,
    /// Exit button pressed
    pub exit: bool,
    /// Player head position (blocks home in on it)
    pub player: Vec3,
    /// Tracked blade, `None` while the sword is not held
    pub blade: Option<Blade>,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, hud: &mut dyn Hud) {
    state.events.clear();
    state.world_time += dt as f64;

    handle_requests(state, input);
    run_deferred(state, hud);

    let was_active = state.session.is_active();
    state.session.update(dt, hud);
    if was_active && state.session.phase == SessionPhase::Ended {
        state.events.push(GameEvent::RoundEnded {
            score: state.session.score,
        });
    }

    if state.session.is_active() {
        update_spawner(state, dt);
        update_blocks(state, input.player, dt, hud);
    }

    match input.blade {
        Some(blade) => {
            state.slicer.track(&blade, dt);
            update_blade(state, &blade, hud);
        }
        None => {
            state.slicer.estimator.clear();
            for block in state.blocks.iter_mut() {
                block.touching_weapon = false;
            }
        }
    }

    for piece in &mut state.debris {
        piece.integrate(dt);
    }
}

fn handle_requests(state: &mut GameState, input: &TickInput) {
    if input.start && state.session.request_start() {
        let delay = state.session.start_delay();
        state
            .scheduler
            .schedule(state.world_time, delay, Deferred::BeginRound);
        state.events.push(GameEvent::StartScheduled);
    }
    if input.exit && !state.quit {
        log::info!("Exit Game");
        state.quit = true;
        state.events.push(GameEvent::ExitRequested);
    }
}

fn run_deferred(state: &mut GameState, hud: &mut dyn Hud) {
    for event in state.scheduler.drain_due(state.world_time) {
        match event {
            Deferred::BeginRound => {
                state.spawner.reset();
                state.session.begin_round(hud);
                state.events.push(GameEvent::RoundStarted);
            }
            Deferred::RemoveDebris { id } => {
                if let Some(index) = state.debris.iter().position(|d| d.id == id) {
                    let piece = state.debris.remove(index);
                    log::debug!("Debris {} removed", piece.id);
                    state.events.push(GameEvent::DebrisRemoved {
                        id,
                        side: piece.side,
                    });
                }
            }
        }
    }
}

fn update_spawner(state: &mut GameState, dt: f32) {
    let before = state.spawner.skipped;
    let spawned = state.spawner.update(
        state.session.elapsed(),
        dt,
        &mut state.blocks,
        &state.settings.spawner,
        &state.settings.block,
    );
    if let Some(slot) = spawned {
        state.events.push(GameEvent::BlockSpawned { slot });
    } else if state.spawner.skipped > before {
        state.events.push(GameEvent::SpawnSkipped);
    }
}

fn update_blocks(state: &mut GameState, player: Vec3, dt: f32, hud: &mut dyn Hud) {
    let elapsed = state.session.elapsed();
    for block in state.blocks.iter_mut().filter(|b| b.active) {
        if let BlockOutcome::Missed { penalty } = block.advance(elapsed, player, dt, &state.settings.block) {
            state.session.update_score(penalty, hud);
            state.events.push(GameEvent::BlockMissed {
                slot: block.slot,
                penalty,
            });
        }
    }
}

fn update_blade(state: &mut GameState, blade: &Blade, hud: &mut dyn Hud) {
    let hulls: Vec<(usize, ConvexMesh)> = state
        .blocks
        .active()
        .map(|b| (b.slot, b.world_hull()))
        .collect();

    // Weapon contact
    for block in state.blocks.iter_mut() {
        let touching = block.active
            && hulls
                .iter()
                .find(|(slot, _)| *slot == block.slot)
                .is_some_and(|(_, hull)| blade_overlaps(blade, hull));
        let Some(reward) = block.contact(BodyTag::Weapon, touching, &state.settings.block) else {
            continue;
        };
        // Hits after the timer ran out do not count
        if state.session.is_active() {
            state.session.update_score(reward, hud);
            state.events.push(GameEvent::BlockHit {
                slot: block.slot,
                reward,
            });
        }
    }

    // Slicing
    let colliders = hulls.iter().map(|(slot, hull)| Collider {
        key: *slot,
        tag: BodyTag::Sliceable,
        hull,
    });
    let Some(hit) = linecast(blade, BodyTag::Sliceable, colliders) else {
        return;
    };
    let Some((_, hull)) = hulls.iter().find(|(slot, _)| *slot == hit.key) else {
        return;
    };
    let Some(origin) = state.blocks.get(hit.key).map(|b| b.position) else {
        return;
    };

    let result = state.slicer.slice(hull, origin, blade, &state.settings.slicer, || {
        let id = state.next_id;
        state.next_id += 1;
        id
    });

    match result {
        Ok(outcome) => {
            if let Some(block) = state.blocks.get_mut(hit.key) {
                block.deactivate();
            }
            let lifetime = state.settings.slicer.debris_lifetime;
            for piece in [&outcome.upper, &outcome.lower] {
                state
                    .scheduler
                    .schedule(state.world_time, lifetime, Deferred::RemoveDebris { id: piece.id });
            }
            state.events.push(GameEvent::BlockSliced {
                slot: hit.key,
                upper: outcome.upper.id,
                lower: outcome.lower.id,
            });
            state.debris.push(outcome.upper);
            state.debris.push(outcome.lower);
        }
        Err(error) => {
            log::debug!("Slice of block {} skipped: {error}", hit.key);
            state.events.push(GameEvent::SliceFailed {
                slot: hit.key,
                error,
            });
        }
    }
}
