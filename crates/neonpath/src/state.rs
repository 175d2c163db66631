use bytemuck::{Pod, Zeroable};

use crate::components::{GamePhase, LevelConfig, SoundEvent, LEVELS};
use crate::grid::Board;
use crate::systems::board::BoardGenerator;
use crate::systems::path::Path;

/// Per-cell data written to a flat buffer for the host renderer.
/// 4 x u32 = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct CellInstance {
    pub connectors: u32, // bit 0 = up, 1 = right, 2 = down, 3 = left
    pub flags: u32,
    pub path_order: i32, // position along the active path, -1 when off-path
    pub tile_id: u32,
}

pub const FLAG_START: u32 = 1 << 0;
pub const FLAG_GOAL: u32 = 1 << 1;
pub const FLAG_ON_PATH: u32 = 1 << 2;

/// Host actions, applied in order on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drag started on a cell.
    Pick(usize),
    /// Drag released over another cell. Equal cells mean a cancelled drag.
    Swap(usize, usize),
    Hint,
    Restart,
    NextLevel,
}

/// The top-level session: current level, board, moves and path status.
pub struct GameState {
    pub board: Board,
    pub phase: GamePhase,
    pub level: usize,
    pub moves: u32,
    pub current_path: Option<Path>,

    generator: BoardGenerator,

    // Written after every board change, read by the host renderer.
    pub cell_buffer: Vec<CellInstance>,

    // Sound events emitted this tick
    pub sound_events: Vec<SoundEvent>,

    // Input queue from the host
    pending: Vec<Command>,

    // Set while sound events from building the first board are still unreported.
    startup_sounds: bool,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        let mut generator = BoardGenerator::new(seed);
        let board = generator.generate_level(&LEVELS[0]);
        let cells = board.len();
        let mut state = GameState {
            board,
            phase: GamePhase::Playing,
            level: 0,
            moves: 0,
            current_path: None,
            generator,
            cell_buffer: Vec::with_capacity(cells),
            sound_events: Vec::with_capacity(8),
            pending: Vec::new(),
            startup_sounds: false,
        };
        state.refresh_path();
        state.startup_sounds = !state.sound_events.is_empty();
        state
    }

    pub fn level_config(&self) -> &LevelConfig {
        &LEVELS[self.level]
    }

    /// Queue a host command. Returns false (and queues nothing) if it names a cell outside the board.
    pub fn queue(&mut self, cmd: Command) -> bool {
        let n = self.board.len();
        let in_range = match cmd {
            Command::Pick(c) => c < n,
            Command::Swap(a, b) => a < n && b < n,
            Command::Hint | Command::Restart | Command::NextLevel => true,
        };
        if !in_range {
            log::warn!("ignoring {:?} on a board of {} cells", cmd, n);
            return false;
        }
        self.pending.push(cmd);
        true
    }

    /// Called each frame from the host. Applies queued commands in order.
    ///
    /// Sound events from the previous tick are dropped, except on the first
    /// tick, which also reports what the initial board raised (a scramble
    /// can leave the level already solved).
    pub fn tick(&mut self) {
        if !std::mem::take(&mut self.startup_sounds) {
            self.sound_events.clear();
        }

        let pending = std::mem::take(&mut self.pending);
        for cmd in pending {
            self.apply(cmd);
        }
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Pick(_) => {
                if self.phase == GamePhase::Playing {
                    self.sound_events.push(SoundEvent::Pick);
                }
            }
            Command::Swap(a, b) => {
                // Board is frozen once won, until the host restarts or advances.
                if self.phase == GamePhase::Won {
                    return;
                }
                self.sound_events.push(SoundEvent::Drop);
                if a != b {
                    self.swap_cells(a, b);
                }
            }
            Command::Hint => {
                self.hint();
            }
            Command::Restart => self.reset_level(self.level),
            Command::NextLevel => self.next_level(),
        }
    }

    /// Swap two cells, count the move and re-query the path.
    pub fn swap_cells(&mut self, a: usize, b: usize) {
        self.board.swap(a, b);
        self.moves += 1;
        self.refresh_path();
    }

    /// Re-query the path after a board change and update phase, sounds and the host buffer.
    fn refresh_path(&mut self) {
        self.current_path = self.board.find_path();

        if let Some(path) = &self.current_path {
            self.sound_events.push(SoundEvent::Ping);
            // A path always ends at the goal, so finding one wins the level.
            if path.goal() == self.board.goal && self.phase != GamePhase::Won {
                self.phase = GamePhase::Won;
                self.sound_events.push(SoundEvent::WinChime);
                log::info!(
                    "level {} solved in {} moves ({} hops)",
                    self.level_config().id,
                    self.moves,
                    path.len_hops()
                );
            }
        }

        self.rebuild_cell_buffer();
    }

    /// Whether a path currently exists; pings if so.
    pub fn hint(&mut self) -> bool {
        let active = self.board.find_path().is_some();
        if active {
            self.sound_events.push(SoundEvent::Ping);
        }
        active
    }

    pub fn path_active(&self) -> bool {
        self.current_path.is_some()
    }

    /// Start level `idx` over with a fresh board. Out-of-range indices clamp to the last level.
    pub fn reset_level(&mut self, idx: usize) {
        self.level = idx.min(LEVELS.len() - 1);
        self.moves = 0;
        self.phase = GamePhase::Playing;
        self.board = self.generator.generate_level(&LEVELS[self.level]);
        log::info!("level {} started", self.level_config().id);
        self.refresh_path();
    }

    /// Advance to the next level, staying on the last one once reached.
    pub fn next_level(&mut self) {
        self.reset_level(self.level + 1);
    }

    fn rebuild_cell_buffer(&mut self) {
        self.cell_buffer.clear();
        for (cell, tile) in self.board.tiles().iter().enumerate() {
            let mut flags = 0;
            if cell == self.board.start {
                flags |= FLAG_START;
            }
            if cell == self.board.goal {
                flags |= FLAG_GOAL;
            }
            let order = self.current_path.as_ref().and_then(|p| p.position(cell));
            if order.is_some() {
                flags |= FLAG_ON_PATH;
            }
            self.cell_buffer.push(CellInstance {
                connectors: tile.mask() as u32,
                flags,
                path_order: order.map_or(-1, |o| o as i32),
                tile_id: tile.id.0,
            });
        }
    }

    /// Pointer to the cell buffer data for SharedArrayBuffer access.
    pub fn cell_buffer_ptr(&self) -> *const CellInstance {
        self.cell_buffer.as_ptr()
    }

    /// Number of cells in the buffer.
    pub fn cell_buffer_len(&self) -> usize {
        self.cell_buffer.len()
    }

    /// The buffer as raw words, 4 per cell.
    pub fn cell_words(&self) -> &[u32] {
        bytemuck::cast_slice(&self.cell_buffer)
    }

    /// Pointer to the sound events buffer.
    pub fn sound_events_ptr(&self) -> *const SoundEvent {
        self.sound_events.as_ptr()
    }

    /// Number of sound events this tick.
    pub fn sound_events_len(&self) -> usize {
        self.sound_events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Direction, DEFAULT_SIZE};

    const H: u8 = 0b1010;
    const V: u8 = 0b0101;

    /// 5x5 board with a straight row 2 except a vertical tile at column 2.
    fn nearly_solved() -> GameState {
        let mut state = GameState::new(42);
        let mut masks = [V; 25];
        for col in 0..5 {
            masks[10 + col] = H;
        }
        masks[12] = V;
        masks[0] = H;
        state.board = Board::from_masks(DEFAULT_SIZE, &masks, 10, 14);
        state.phase = GamePhase::Playing;
        state.moves = 0;
        state.refresh_path();
        state.sound_events.clear();
        state.startup_sounds = false;
        state
    }

    #[test]
    fn game_state_initializes() {
        let state = GameState::new(42);
        assert_eq!(state.level, 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.board.len(), DEFAULT_SIZE * DEFAULT_SIZE);
        assert_eq!(state.cell_buffer_len(), DEFAULT_SIZE * DEFAULT_SIZE);
        // a scramble can leave a path in place, which wins straight away
        assert_eq!(state.phase == GamePhase::Won, state.path_active());
    }

    #[test]
    fn first_tick_reports_board_solved_at_start() {
        let mut state = (1..500)
            .map(GameState::new)
            .find(|s| s.phase == GamePhase::Won)
            .expect("some seed scrambles into a solved board");

        state.tick();
        assert_eq!(state.sound_events, vec![SoundEvent::Ping, SoundEvent::WinChime]);

        state.tick();
        assert!(state.sound_events.is_empty());
    }

    #[test]
    fn first_tick_on_unsolved_start_is_quiet() {
        let mut state = (1..500)
            .map(GameState::new)
            .find(|s| s.phase == GamePhase::Playing)
            .expect("some seed scrambles into an unsolved board");

        state.queue(Command::Pick(0));
        state.tick();
        assert_eq!(state.sound_events, vec![SoundEvent::Pick]);
    }

    #[test]
    fn swap_completing_path_wins() {
        let mut state = nearly_solved();
        assert!(!state.path_active());

        // bring the horizontal tile from cell 0 into the gap
        assert!(state.queue(Command::Swap(0, 12)));
        state.tick();

        assert_eq!(state.moves, 1);
        assert_eq!(state.phase, GamePhase::Won);
        let path = state.current_path.as_ref().unwrap();
        assert_eq!(path.cells(), &[10, 11, 12, 13, 14]);
        assert_eq!(
            state.sound_events,
            vec![SoundEvent::Drop, SoundEvent::Ping, SoundEvent::WinChime]
        );
    }

    #[test]
    fn swap_without_path_only_drops() {
        let mut state = nearly_solved();
        state.queue(Command::Swap(1, 2));
        state.tick();
        assert_eq!(state.moves, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.sound_events, vec![SoundEvent::Drop]);
    }

    #[test]
    fn self_swap_is_cancelled_drag() {
        let mut state = nearly_solved();
        state.queue(Command::Pick(4));
        state.queue(Command::Swap(4, 4));
        state.tick();
        assert_eq!(state.moves, 0);
        assert_eq!(state.sound_events, vec![SoundEvent::Pick, SoundEvent::Drop]);
    }

    #[test]
    fn out_of_range_commands_rejected() {
        let mut state = nearly_solved();
        assert!(!state.queue(Command::Swap(0, 25)));
        assert!(!state.queue(Command::Pick(25)));
        let before = state.board.clone();
        state.tick();
        assert_eq!(state.board, before);
        assert!(state.sound_events.is_empty());
    }

    #[test]
    fn won_board_ignores_swaps() {
        let mut state = nearly_solved();
        state.queue(Command::Swap(0, 12));
        state.tick();
        let solved = state.board.clone();

        state.queue(Command::Swap(10, 11));
        state.tick();
        assert_eq!(state.board, solved);
        assert_eq!(state.moves, 1);
        assert!(state.sound_events.is_empty());
    }

    #[test]
    fn sounds_only_last_one_tick() {
        let mut state = nearly_solved();
        state.queue(Command::Swap(1, 2));
        state.tick();
        assert_eq!(state.sound_events_len(), 1);
        state.tick();
        assert_eq!(state.sound_events_len(), 0);
    }

    #[test]
    fn cell_buffer_marks_endpoints_and_path() {
        let mut state = nearly_solved();
        state.queue(Command::Swap(0, 12));
        state.tick();

        let buf = &state.cell_buffer;
        assert_eq!(buf[10].flags, FLAG_START | FLAG_ON_PATH);
        assert_eq!(buf[14].flags, FLAG_GOAL | FLAG_ON_PATH);
        assert_eq!(buf[12].path_order, 2);
        assert_eq!(buf[0].path_order, -1);
        assert_eq!(buf[0].flags, 0);
        assert_eq!(buf[12].connectors, H as u32);
        assert_eq!(buf[12].tile_id, 0, "tile from cell 0 moved into the gap");

        let words = state.cell_words();
        assert_eq!(words.len(), 4 * buf.len());
        assert_eq!(words[12 * 4], H as u32);
    }

    #[test]
    fn hint_pings_only_with_path() {
        let mut state = nearly_solved();
        state.queue(Command::Hint);
        state.tick();
        assert!(state.sound_events.is_empty());

        state.board.swap(0, 12);
        assert!(state.hint());
        assert_eq!(state.sound_events, vec![SoundEvent::Ping]);
    }

    #[test]
    fn restart_and_next_level() {
        let mut state = nearly_solved();
        state.queue(Command::Swap(1, 2));
        state.tick();

        state.queue(Command::Restart);
        state.tick();
        assert_eq!(state.moves, 0);
        assert_eq!(state.level, 0);
        assert!(state.board.tile(state.board.start).has_connector(Direction::Right));
        assert!(state.board.tile(state.board.goal).has_connector(Direction::Left));

        state.queue(Command::NextLevel);
        state.tick();
        assert_eq!(state.level_config().id, 2);
        state.next_level();
        assert_eq!(state.level, LEVELS.len() - 1, "stays on the last level");
    }
}
