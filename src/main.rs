//! Blade Rush entry point
//!
//! Runs one headless round with a scripted sword so the simulation can be
//! exercised without a headset. Pass a settings JSON path as the first
//! argument to override the defaults.

use blade_rush::consts::*;
use blade_rush::sim::{Blade, GameEvent, GameState, SessionPhase, TickInput, tick};
use blade_rush::{Settings, TextHud};
use glam::Vec3;

/// Player head height
const HEAD: Vec3 = Vec3::new(0.0, 1.3, 0.0);
/// Frame time reported by the fake host (seconds)
const FRAME_DT: f32 = 1.0 / 72.0;

/// Scripted swing: a horizontal blade sweeping up and down in front of the player
fn scripted_blade(time: f32) -> Blade {
    let y = 1.3 + 0.6 * (time * 5.0).sin();
    let z = 1.5;
    Blade::new(Vec3::new(-0.9, y, z), Vec3::new(0.9, y, z))
}

fn main() {
    env_logger::init();
    log::info!("Blade Rush (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start: {e}");
            std::process::exit(1);
        }
    };
    let mut hud = TextHud::new();
    let mut accumulator = 0.0_f32;
    let mut time = 0.0_f32;
    let mut start_pressed = false;
    let (mut sliced, mut missed, mut hits) = (0u32, 0u32, 0u32);

    while !state.quit {
        // Fixed-step substeps per host frame
        accumulator += FRAME_DT.min(0.1);
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            time += SIM_DT;
            let input = TickInput {
                start: !start_pressed,
                exit: state.phase() == SessionPhase::Ended,
                player: HEAD,
                blade: Some(scripted_blade(time)),
            };
            start_pressed = true;
            tick(&mut state, &input, SIM_DT, &mut hud);
            accumulator -= SIM_DT;
            substeps += 1;

            for event in &state.events {
                match event {
                    GameEvent::BlockSliced { .. } => sliced += 1,
                    GameEvent::BlockMissed { .. } => missed += 1,
                    GameEvent::BlockHit { .. } => hits += 1,
                    _ => {}
                }
            }
        }
    }

    println!("{}", hud.final_score_text);
    println!(
        "hits: {hits}, slices: {sliced}, misses: {missed}, skipped spawns: {}",
        state.spawner.skipped
    );
}
