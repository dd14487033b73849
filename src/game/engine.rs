//! The rules state machine: legality, move application/undo and scoring.
//!
//! One engine covers all rule variants. The asymmetric-rack and
//! anti-symmetry behaviors of the game are selected through [`RulesConfig`]
//! rather than separate engine types.
//!
//! The chain-length constraint implemented here is the whole-board
//! formulation: after a hypothetical placement, the longest occupied run
//! anywhere may exceed the second-longest by at most one.

use crate::game::board::{
    geometry, Board, CellState, Owner, Player, CELL_COUNT,
};
use crate::game::chains::{self, Scores};
use crate::game::racks::Rack;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Moves in a complete game: 18 placements fill every non-center cell.
pub const FINAL_MOVE: u8 = 18;

/// A tile placement: which cell, which tile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub cell: usize,
    pub tile: u8,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}h{}", self.tile, self.cell)
    }
}

/// Why a placement was rejected. State is unchanged on rejection, so
/// callers can probe legality by attempting moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell index out of range")]
    InvalidCell,
    #[error("cell is already occupied")]
    Occupied,
    #[error("cell has no occupied neighbor")]
    NotAdjacent,
    #[error("placement violates the chain length constraint")]
    ChainConstraint,
    #[error("tile is not in the mover's rack")]
    TileUnavailable,
    #[error("placement would mirror the board with equal racks")]
    SymmetryViolation,
}

/// Rule variant switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Reject placements that leave the board vertically mirrored while
    /// both racks hold identical multisets. Checked from the second move
    /// onward; the final placement is exempt (a symmetric finish draws).
    pub anti_symmetry: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig { anti_symmetry: true }
    }
}

/// Everything a single [`GameEngine::apply_move`] touched, so the solver
/// can backtrack without cloning. The symmetry latch is captured too:
/// undoing the move that broke symmetry must re-arm the check.
#[derive(Debug, Clone, Copy)]
pub struct UndoRecord {
    cell: usize,
    tile: u8,
    rack_index: usize,
    player: Player,
    prev_game_over: bool,
    prev_symmetry_possible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MirrorStatus {
    /// Every non-axis pair is either both empty or equal-valued.
    Mirrored,
    /// Some pair has exactly one side occupied; symmetry may still form.
    NotMirrored,
    /// Some pair holds two different occupied values; symmetry can never
    /// return at that pair.
    Broken,
}

fn mirror_status(board: &Board) -> MirrorStatus {
    let geo = geometry();
    let mut mirrored = true;

    for cell in 0..CELL_COUNT {
        if geo.on_mirror_axis[cell] {
            continue;
        }
        let pair = geo.mirror[cell];
        match (board.cells[cell].value, board.cells[pair].value) {
            (Some(a), Some(b)) if a != b => return MirrorStatus::Broken,
            (Some(_), None) | (None, Some(_)) => mirrored = false,
            _ => {}
        }
    }

    if mirrored {
        MirrorStatus::Mirrored
    } else {
        MirrorStatus::NotMirrored
    }
}

/// The Hexuki rules state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    config: RulesConfig,
    board: Board,
    racks: [Rack; 2],
    initial_racks: [Rack; 2],
    current: Player,
    move_count: u8,
    game_over: bool,
    symmetry_possible: bool,
}

impl GameEngine {
    /// Standard game: both racks 1-9, anti-symmetry rule on.
    pub fn new() -> GameEngine {
        GameEngine::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> GameEngine {
        GameEngine::with_racks(config, Rack::standard(), Rack::standard())
    }

    /// Asymmetric variant: each player draws 9 random tile values.
    pub fn with_random_racks<R: Rng + ?Sized>(config: RulesConfig, rng: &mut R) -> GameEngine {
        GameEngine::with_racks(config, Rack::random(rng), Rack::random(rng))
    }

    pub fn with_racks(config: RulesConfig, player1: Rack, player2: Rack) -> GameEngine {
        GameEngine {
            config,
            board: Board::starting(),
            initial_racks: [player1.clone(), player2.clone()],
            racks: [player1, player2],
            current: Player::One,
            move_count: 0,
            game_over: false,
            symmetry_possible: true,
        }
    }

    /// Back to the initial position: cleared board, pre-filled center,
    /// the starting racks, player 1 to move.
    pub fn reset(&mut self) {
        self.board = Board::starting();
        self.racks = self.initial_racks.clone();
        self.current = Player::One;
        self.move_count = 0;
        self.game_over = false;
        self.symmetry_possible = true;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn rack(&self, player: Player) -> &Rack {
        &self.racks[player.index()]
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    pub fn empty_count(&self) -> usize {
        self.board.empty_count()
    }

    pub fn scores(&self) -> Scores {
        chains::scores(&self.board)
    }

    /// Neighboring cell indices of `cell`.
    pub fn adjacent_cells(&self, cell: usize) -> &[usize] {
        &geometry().adjacency[cell]
    }

    /// Terminal when all 18 placements are made or the side to move has
    /// no legal move left.
    pub fn is_terminal(&self) -> bool {
        self.game_over || !self.has_legal_move()
    }

    /// Cell-level legality: empty, adjacent to an occupied cell, and the
    /// chain-length constraint holds after a hypothetical placement.
    pub fn is_legal(&self, cell: usize) -> bool {
        self.check_cell(cell).is_ok()
    }

    fn check_cell(&self, cell: usize) -> Result<(), MoveError> {
        if cell >= CELL_COUNT {
            return Err(MoveError::InvalidCell);
        }
        if self.board.cells[cell].is_occupied() {
            return Err(MoveError::Occupied);
        }
        let adjacent_occupied = geometry().adjacency[cell]
            .iter()
            .any(|&n| self.board.cells[n].is_occupied());
        if !adjacent_occupied {
            return Err(MoveError::NotAdjacent);
        }

        // Hypothetical occupation; the dummy value is irrelevant, run
        // scanning only looks at occupancy.
        let mut probe = self.board;
        probe.cells[cell] = CellState {
            value: Some(1),
            owner: Some(Owner::Placed(self.current)),
        };
        let (first, second) = chains::longest_two(&probe);
        if first > second + 1 {
            return Err(MoveError::ChainConstraint);
        }
        Ok(())
    }

    fn symmetry_check_live(&self) -> bool {
        self.config.anti_symmetry
            && self.symmetry_possible
            && self.move_count >= 1
            && self.move_count < FINAL_MOVE - 1
    }

    /// Would placing `tile` on `cell` mirror the board with equal racks?
    /// Pure probe: never updates the latch.
    fn symmetry_rejects(&self, cell: usize, tile: u8) -> bool {
        let mut probe = self.board;
        probe.cells[cell] = CellState {
            value: Some(tile),
            owner: Some(Owner::Placed(self.current)),
        };
        if mirror_status(&probe) != MirrorStatus::Mirrored {
            return false;
        }

        let mover = &self.racks[self.current.index()];
        let opponent = &self.racks[self.current.opponent().index()];
        let mut remaining = mover.sorted();
        if let Some(at) = remaining.iter().position(|&t| t == tile) {
            remaining.remove(at);
        }
        remaining == opponent.sorted()
    }

    /// Applies a move, returning the record needed to undo it. On any
    /// rejection the state is unchanged.
    pub fn apply_move(&mut self, mv: Move) -> Result<UndoRecord, MoveError> {
        self.check_cell(mv.cell)?;

        let mover = self.current;
        let rack_index = self.racks[mover.index()]
            .take(mv.tile)
            .ok_or(MoveError::TileUnavailable)?;

        self.board.cells[mv.cell] = CellState {
            value: Some(mv.tile),
            owner: Some(Owner::Placed(mover)),
        };

        let prev_symmetry_possible = self.symmetry_possible;
        if self.symmetry_check_live() {
            match mirror_status(&self.board) {
                MirrorStatus::Broken => {
                    // One-way latch: a mismatched occupied pair exists, so
                    // the board can never mirror again this game.
                    self.symmetry_possible = false;
                }
                MirrorStatus::Mirrored => {
                    if self.racks[mover.index()].matches(&self.racks[mover.opponent().index()]) {
                        self.board.cells[mv.cell] = CellState::default();
                        self.racks[mover.index()].put_back(rack_index, mv.tile);
                        return Err(MoveError::SymmetryViolation);
                    }
                }
                MirrorStatus::NotMirrored => {}
            }
        }

        let prev_game_over = self.game_over;
        self.move_count += 1;
        if self.move_count >= FINAL_MOVE {
            self.game_over = true;
        }
        self.current = mover.opponent();

        Ok(UndoRecord {
            cell: mv.cell,
            tile: mv.tile,
            rack_index,
            player: mover,
            prev_game_over,
            prev_symmetry_possible,
        })
    }

    /// Restores exactly the fields the recorded move touched.
    pub fn undo_move(&mut self, undo: UndoRecord) {
        self.board.cells[undo.cell] = CellState::default();
        self.racks[undo.player.index()].put_back(undo.rack_index, undo.tile);
        self.move_count -= 1;
        self.current = undo.player;
        self.game_over = undo.prev_game_over;
        self.symmetry_possible = undo.prev_symmetry_possible;
    }

    /// All (cell, tile) placements the side to move may make. Duplicate
    /// rack values yield one entry per distinct tile value.
    pub fn legal_moves(&self) -> Vec<Move> {
        let check_symmetry = self.symmetry_check_live();
        let rack = &self.racks[self.current.index()];
        let mut moves = Vec::new();

        for cell in 0..CELL_COUNT {
            if self.check_cell(cell).is_err() {
                continue;
            }
            let mut seen = [false; 10];
            for &tile in rack.tiles() {
                if seen[tile as usize] {
                    continue;
                }
                seen[tile as usize] = true;
                if check_symmetry && self.symmetry_rejects(cell, tile) {
                    continue;
                }
                moves.push(Move { cell, tile });
            }
        }

        moves
    }

    fn has_legal_move(&self) -> bool {
        if self.racks[self.current.index()].is_empty() {
            return false;
        }
        let check_symmetry = self.symmetry_check_live();
        for cell in 0..CELL_COUNT {
            if self.check_cell(cell).is_err() {
                continue;
            }
            if !check_symmetry {
                return true;
            }
            let mut seen = [false; 10];
            for &tile in self.racks[self.current.index()].tiles() {
                if seen[tile as usize] {
                    continue;
                }
                seen[tile as usize] = true;
                if !self.symmetry_rejects(cell, tile) {
                    return true;
                }
            }
        }
        false
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}
