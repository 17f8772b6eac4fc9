//! Ball Bounce headless runner
//!
//! Plays one autopilot round at a simulated 60 fps and prints the final
//! frame as JSON. Usage: `ball-bounce [settings.json]`

/// Ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use ball_bounce::Settings;
    use ball_bounce::consts::SIM_DT_MS;
    use ball_bounce::sim::{Game, GameEvent};

    env_logger::init();
    log::info!("Ball Bounce (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let mut game = Game::new(settings);
    game.set_autopilot(true);
    game.start();

    let mut finished = false;
    for frame in 1..=MAX_FRAMES {
        if let Some(GameEvent::GameOver { score }) = game.advance(SIM_DT_MS) {
            log::info!("Round ended after {} frames with score {}", frame, score);
            finished = true;
            break;
        }
    }
    if !finished {
        log::info!("Frame limit reached, score {}", game.score());
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
