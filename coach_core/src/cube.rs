//! Facelet-level 3x3 simulator. The cube is six 3x3 color matrices in a
//! fixed world frame; turns permute stickers by table.

use log::debug;

use crate::moves::{invert_moves, Move, Primitive};

/// Sticker colors. Opposite faces pair White/Yellow, Green/Blue, Red/Orange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Red,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Orange,
    ];

    #[must_use]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Yellow,
            Color::Yellow => Color::White,
            Color::Green => Color::Blue,
            Color::Blue => Color::Green,
            Color::Red => Color::Orange,
            Color::Orange => Color::Red,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Orange => "orange",
        }
    }

    /// Stable small integer used by exact grid encodings.
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Yellow => 1,
            Color::Green => 2,
            Color::Blue => 3,
            Color::Red => 4,
            Color::Orange => 5,
        }
    }
}

/// Face identifiers in `CubeState` array order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceId {
    Up,
    Down,
    Front,
    Right,
    Back,
    Left,
}

impl FaceId {
    pub const ALL: [FaceId; 6] = [
        FaceId::Up,
        FaceId::Down,
        FaceId::Front,
        FaceId::Right,
        FaceId::Back,
        FaceId::Left,
    ];

    #[must_use]
    pub fn solved_color(self) -> Color {
        match self {
            FaceId::Up => Color::White,
            FaceId::Down => Color::Yellow,
            FaceId::Front => Color::Green,
            FaceId::Right => Color::Red,
            FaceId::Back => Color::Blue,
            FaceId::Left => Color::Orange,
        }
    }
}

pub type FaceMatrix = [[Color; 3]; 3];

/// Full sticker state. Row/column conventions per face: Up row 0 touches
/// Back; Down row 0 touches Front; Front/Right/Left/Back row 0 touches Up,
/// with Front column 0 at Left, Right column 0 at Front, Back column 0 at
/// Right, Left column 0 at Back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState {
    pub faces: [FaceMatrix; 6],
}

impl CubeState {
    #[must_use]
    pub fn solved() -> CubeState {
        CubeState {
            faces: FaceId::ALL.map(|f| [[f.solved_color(); 3]; 3]),
        }
    }

    #[must_use]
    pub fn face(&self, id: FaceId) -> &FaceMatrix {
        &self.faces[id as usize]
    }

    #[must_use]
    pub fn sticker(&self, id: FaceId, row: usize, col: usize) -> Color {
        self.faces[id as usize][row][col]
    }

    pub fn apply(&mut self, mv: Move) {
        for &(primitive, sign) in mv.base.expansion() {
            let quarters = (i16::from(sign) * i16::from(mv.modifier.quarter_turns()))
                .rem_euclid(4) as u8;
            for _ in 0..quarters {
                self.turn_primitive(primitive);
            }
        }
    }

    fn turn_primitive(&mut self, primitive: Primitive) {
        use FaceId::{Back, Down, Front, Left, Right, Up};
        match primitive {
            Primitive::U => {
                for c in 0..3 {
                    self.cycle([(Front, 0, c), (Left, 0, c), (Back, 0, c), (Right, 0, c)]);
                }
                self.rotate_face(Up);
            }
            Primitive::D => {
                for c in 0..3 {
                    self.cycle([(Front, 2, c), (Right, 2, c), (Back, 2, c), (Left, 2, c)]);
                }
                self.rotate_face(Down);
            }
            Primitive::F => {
                self.cycle([(Up, 2, 0), (Right, 0, 0), (Down, 0, 2), (Left, 2, 2)]);
                self.cycle([(Up, 2, 1), (Right, 1, 0), (Down, 0, 1), (Left, 1, 2)]);
                self.cycle([(Up, 2, 2), (Right, 2, 0), (Down, 0, 0), (Left, 0, 2)]);
                self.rotate_face(Front);
            }
            Primitive::B => {
                self.cycle([(Up, 0, 0), (Left, 2, 0), (Down, 2, 2), (Right, 0, 2)]);
                self.cycle([(Up, 0, 1), (Left, 1, 0), (Down, 2, 1), (Right, 1, 2)]);
                self.cycle([(Up, 0, 2), (Left, 0, 0), (Down, 2, 0), (Right, 2, 2)]);
                self.rotate_face(Back);
            }
            Primitive::R => {
                self.cycle([(Front, 0, 2), (Up, 0, 2), (Back, 2, 0), (Down, 0, 2)]);
                self.cycle([(Front, 1, 2), (Up, 1, 2), (Back, 1, 0), (Down, 1, 2)]);
                self.cycle([(Front, 2, 2), (Up, 2, 2), (Back, 0, 0), (Down, 2, 2)]);
                self.rotate_face(Right);
            }
            Primitive::L => {
                self.cycle([(Up, 0, 0), (Front, 0, 0), (Down, 0, 0), (Back, 2, 2)]);
                self.cycle([(Up, 1, 0), (Front, 1, 0), (Down, 1, 0), (Back, 1, 2)]);
                self.cycle([(Up, 2, 0), (Front, 2, 0), (Down, 2, 0), (Back, 0, 2)]);
                self.rotate_face(Left);
            }
            Primitive::M => {
                self.cycle([(Up, 0, 1), (Front, 0, 1), (Down, 0, 1), (Back, 2, 1)]);
                self.cycle([(Up, 1, 1), (Front, 1, 1), (Down, 1, 1), (Back, 1, 1)]);
                self.cycle([(Up, 2, 1), (Front, 2, 1), (Down, 2, 1), (Back, 0, 1)]);
            }
            Primitive::E => {
                for c in 0..3 {
                    self.cycle([(Front, 1, c), (Right, 1, c), (Back, 1, c), (Left, 1, c)]);
                }
            }
            Primitive::S => {
                self.cycle([(Up, 1, 0), (Right, 0, 1), (Down, 1, 2), (Left, 2, 1)]);
                self.cycle([(Up, 1, 1), (Right, 1, 1), (Down, 1, 1), (Left, 1, 1)]);
                self.cycle([(Up, 1, 2), (Right, 2, 1), (Down, 1, 0), (Left, 0, 1)]);
            }
        }
    }

    /// Send sticker a to b, b to c, c to d, d to a.
    fn cycle(&mut self, cells: [(FaceId, usize, usize); 4]) {
        let [(fa, ra, ca), (fb, rb, cb), (fc, rc, cc), (fd, rd, cd)] = cells;
        let tmp = self.faces[fd as usize][rd][cd];
        self.faces[fd as usize][rd][cd] = self.faces[fc as usize][rc][cc];
        self.faces[fc as usize][rc][cc] = self.faces[fb as usize][rb][cb];
        self.faces[fb as usize][rb][cb] = self.faces[fa as usize][ra][ca];
        self.faces[fa as usize][ra][ca] = tmp;
    }

    fn rotate_face(&mut self, id: FaceId) {
        let old = self.faces[id as usize];
        let new = &mut self.faces[id as usize];
        for (r, row) in old.iter().enumerate() {
            for (c, &color) in row.iter().enumerate() {
                new[c][2 - r] = color;
            }
        }
    }
}

/// How `Simulator::apply_moves` reconciled the new move list with history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStrategy {
    /// The new list extends history; only the suffix was applied.
    Add,
    /// The new list is a prefix of history; the removed tail was undone.
    Undo,
    /// Histories diverged; the cube was reset and fully replayed.
    StartOver,
}

/// A cube plus the cumulative move list that produced it. Re-submitting an
/// edited list picks the cheapest reconciliation; the resulting state is
/// identical to a fresh replay either way.
#[derive(Debug, Clone)]
pub struct Simulator {
    state: CubeState,
    history: Vec<Move>,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::new()
    }
}

impl Simulator {
    #[must_use]
    pub fn new() -> Simulator {
        Simulator {
            state: CubeState::solved(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &CubeState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn apply_moves(&mut self, moves: &[Move]) -> ReplayStrategy {
        let common = self
            .history
            .iter()
            .zip(moves)
            .take_while(|(a, b)| a == b)
            .count();

        let strategy = if common == self.history.len() {
            for &mv in &moves[common..] {
                self.state.apply(mv);
            }
            ReplayStrategy::Add
        } else if common == moves.len() && self.history.len() - common <= moves.len() {
            for mv in invert_moves(&self.history[common..]) {
                self.state.apply(mv);
            }
            ReplayStrategy::Undo
        } else {
            self.state = CubeState::solved();
            for &mv in moves {
                self.state.apply(mv);
            }
            ReplayStrategy::StartOver
        };
        debug!(
            "replayed {} moves via {strategy:?} (history {})",
            moves.len(),
            self.history.len()
        );
        self.history = moves.to_vec();
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_moves;

    fn applied(notation: &str) -> CubeState {
        let mut sim = Simulator::new();
        sim.apply_moves(&parse_moves(notation).unwrap());
        sim.state().clone()
    }

    #[test]
    fn solved_cube_is_uniform() {
        let cube = CubeState::solved();
        for face in FaceId::ALL {
            for row in cube.face(face) {
                assert!(row.iter().all(|&c| c == face.solved_color()));
            }
        }
    }

    #[test]
    fn face_turn_has_order_four() {
        assert_eq!(applied("R R R R"), CubeState::solved());
        assert_eq!(applied("R2 R2"), CubeState::solved());
        assert_eq!(applied("R R'"), CubeState::solved());
        assert_eq!(applied("M M M M"), CubeState::solved());
        assert_eq!(applied("u u'"), CubeState::solved());
    }

    #[test]
    fn sexy_move_has_order_six() {
        let mut sim = Simulator::new();
        let sexy = parse_moves("R U R' U'").unwrap();
        let mut all = Vec::new();
        for _ in 0..6 {
            all.extend_from_slice(&sexy);
        }
        sim.apply_moves(&all);
        assert_eq!(sim.state(), &CubeState::solved());
    }

    #[test]
    fn rotation_matches_composed_layers() {
        assert_eq!(applied("x"), applied("R M' L'"));
        assert_eq!(applied("y"), applied("U E' D'"));
        assert_eq!(applied("z"), applied("F S B'"));
    }

    #[test]
    fn wide_turn_matches_face_plus_slice() {
        assert_eq!(applied("r"), applied("R M'"));
        assert_eq!(applied("l'"), applied("L' M'"));
        assert_eq!(applied("d2"), applied("D2 E2"));
    }

    #[test]
    fn u_turn_moves_front_row_to_left() {
        let cube = applied("U");
        assert_eq!(cube.sticker(FaceId::Left, 0, 1), Color::Green);
        assert_eq!(cube.sticker(FaceId::Back, 0, 1), Color::Orange);
        assert_eq!(cube.sticker(FaceId::Right, 0, 1), Color::Blue);
        assert_eq!(cube.sticker(FaceId::Front, 0, 1), Color::Red);
        // Up face itself only rotates in place.
        assert_eq!(cube.sticker(FaceId::Up, 1, 1), Color::White);
    }

    #[test]
    fn replay_strategies_agree_on_final_state() {
        let scramble = parse_moves("R U2 F' L D B2 r M S'").unwrap();
        let shorter = parse_moves("R U2 F'").unwrap();
        let diverged = parse_moves("R U2 B").unwrap();

        let mut fresh = Simulator::new();
        fresh.apply_moves(&diverged);

        let mut sim = Simulator::new();
        assert_eq!(sim.apply_moves(&scramble), ReplayStrategy::Add);
        assert_eq!(sim.apply_moves(&shorter), ReplayStrategy::StartOver);
        assert_eq!(sim.apply_moves(&scramble), ReplayStrategy::Add);
        let mut undo_target = scramble.clone();
        undo_target.truncate(6);
        assert_eq!(sim.apply_moves(&undo_target), ReplayStrategy::Undo);
        assert_eq!(sim.apply_moves(&diverged), ReplayStrategy::StartOver);
        assert_eq!(sim.state(), fresh.state());
        assert_eq!(sim.history(), &diverged[..]);
    }

    #[test]
    fn undo_requires_removed_tail_shorter_than_replay() {
        let long = parse_moves("R U R' U' R U R' U' R U R' U'").unwrap();
        let short = parse_moves("R U").unwrap();
        let mut sim = Simulator::new();
        sim.apply_moves(&long);
        // Ten moves to undo versus two to replay: start over wins.
        assert_eq!(sim.apply_moves(&short), ReplayStrategy::StartOver);
        let mut fresh = Simulator::new();
        fresh.apply_moves(&short);
        assert_eq!(sim.state(), fresh.state());
    }
}
