// ==================== Imports ====================
use wasm_bindgen::prelude::*;

#[macro_use]
mod browser;
pub mod config;
pub mod engine;
pub mod entity;
mod game;
pub mod level;
pub mod state;

pub use game::Crossing;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - loads config + sprites
/// - starts the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // game loop runs as a local task, wasm has no threads to block
    browser::spawn_local(async move {
        if let Err(err) = engine::GameLoop::start(Crossing::new()).await {
            log!("Could not start game : {:#}", err);
        }
    });

    Ok(())
}
