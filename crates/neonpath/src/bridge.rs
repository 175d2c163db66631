use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use crate::state::{Command, GameState};

thread_local! {
    static GAME: RefCell<Option<GameState>> = RefCell::new(None);
}

fn with_game<R>(f: impl FnOnce(&mut GameState) -> R) -> R {
    GAME.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let state = borrow.as_mut().expect("Game not initialized. Call init_game() first.");
        f(state)
    })
}

#[wasm_bindgen]
pub fn init_game(seed: f64) {
    let state = GameState::new(seed as u64);
    GAME.with(|cell| {
        *cell.borrow_mut() = Some(state);
    });
    log::info!("neonpath-sim: game initialized with seed {}", seed as u64);
}

/// Initialize with a seed drawn from `Math.random()`.
#[wasm_bindgen]
pub fn init_game_random() {
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64 + 1;
    init_game(seed as f64);
}

#[wasm_bindgen]
pub fn tick_game() {
    with_game(|g| g.tick());
}

/// Drag started on a cell. Returns false for cells outside the board.
#[wasm_bindgen]
pub fn pick_cell(index: u32) -> bool {
    with_game(|g| g.queue(Command::Pick(index as usize)))
}

/// Drag released: swap two cells on the next tick. Returns false for cells outside the board.
#[wasm_bindgen]
pub fn swap_cells(a: u32, b: u32) -> bool {
    with_game(|g| g.queue(Command::Swap(a as usize, b as usize)))
}

#[wasm_bindgen]
pub fn request_hint() {
    with_game(|g| g.queue(Command::Hint));
}

#[wasm_bindgen]
pub fn restart_level() {
    with_game(|g| g.queue(Command::Restart));
}

#[wasm_bindgen]
pub fn next_level() {
    with_game(|g| g.queue(Command::NextLevel));
}

/// Returns the current game phase (0=Playing, 1=Won).
#[wasm_bindgen]
pub fn get_game_phase() -> u8 {
    with_game(|g| g.phase as u8)
}

/// Returns true while a start-to-goal path exists.
#[wasm_bindgen]
pub fn is_path_active() -> bool {
    with_game(|g| g.path_active())
}

#[wasm_bindgen]
pub fn get_moves() -> u32 {
    with_game(|g| g.moves)
}

/// Returns the 1-based level id.
#[wasm_bindgen]
pub fn get_level_id() -> u32 {
    with_game(|g| g.level_config().id)
}

#[wasm_bindgen]
pub fn get_board_size() -> u32 {
    with_game(|g| g.board.size() as u32)
}

#[wasm_bindgen]
pub fn get_start_cell() -> u32 {
    with_game(|g| g.board.start as u32)
}

#[wasm_bindgen]
pub fn get_goal_cell() -> u32 {
    with_game(|g| g.board.goal as u32)
}

/// Current path as cell indices from start to goal; empty when there is none.
#[wasm_bindgen]
pub fn get_path() -> Vec<u32> {
    with_game(|g| {
        g.current_path
            .as_ref()
            .map(|p| p.cells().iter().map(|&c| c as u32).collect())
            .unwrap_or_default()
    })
}

/// Returns a pointer to the cell buffer (4 u32 per cell: connectors, flags, path order, tile id).
#[wasm_bindgen]
pub fn get_cell_buffer_ptr() -> *const u32 {
    with_game(|g| g.cell_buffer_ptr() as *const u32)
}

/// Returns the number of cells in the buffer.
#[wasm_bindgen]
pub fn get_cell_buffer_len() -> u32 {
    with_game(|g| g.cell_buffer_len() as u32)
}

/// Returns a pointer to the sound events buffer (u8 per event).
#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_game(|g| g.sound_events_ptr() as *const u8)
}

/// Returns the number of sound events emitted this tick.
#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_game(|g| g.sound_events_len() as u32)
}
