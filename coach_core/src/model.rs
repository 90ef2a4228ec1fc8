//! Piece-level view of the cube: physical slots, the viewer orientation
//! derived from reference centers, and the 26-byte state signature that the
//! progress interpreter and index operate on.

use std::fmt;

use thiserror::Error;

use crate::cube::{Color, CubeState, FaceId};

/// Physical sticker directions in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up = 0,
    Front = 1,
    Right = 2,
    Back = 3,
    Left = 4,
    Down = 5,
}

impl Dir {
    pub const ALL: [Dir; 6] = [
        Dir::Up,
        Dir::Front,
        Dir::Right,
        Dir::Back,
        Dir::Left,
        Dir::Down,
    ];

    #[must_use]
    pub fn vector(self) -> [i8; 3] {
        match self {
            Dir::Up => [0, 1, 0],
            Dir::Down => [0, -1, 0],
            Dir::Front => [0, 0, 1],
            Dir::Back => [0, 0, -1],
            Dir::Right => [1, 0, 0],
            Dir::Left => [-1, 0, 0],
        }
    }

    #[must_use]
    pub fn from_vector(v: [i8; 3]) -> Option<Dir> {
        Dir::ALL.into_iter().find(|d| d.vector() == v)
    }

    #[must_use]
    pub fn from_index(i: u8) -> Option<Dir> {
        Dir::ALL.into_iter().find(|d| *d as u8 == i)
    }

    #[must_use]
    pub fn opposite(self) -> Dir {
        let [x, y, z] = self.vector();
        match Dir::from_vector([-x, -y, -z]) {
            Some(d) => d,
            None => unreachable!(),
        }
    }

    /// 0 for the up/down axis, 1 for front/back, 2 for right/left.
    #[must_use]
    pub fn axis(self) -> u8 {
        match self {
            Dir::Up | Dir::Down => 0,
            Dir::Front | Dir::Back => 1,
            Dir::Right | Dir::Left => 2,
        }
    }

    /// The color whose center sits in this direction on a solved cube.
    #[must_use]
    pub fn home_color(self) -> Color {
        match self {
            Dir::Up => Color::White,
            Dir::Down => Color::Yellow,
            Dir::Front => Color::Green,
            Dir::Back => Color::Blue,
            Dir::Right => Color::Red,
            Dir::Left => Color::Orange,
        }
    }

    #[must_use]
    pub fn of_face(face: FaceId) -> Dir {
        match face {
            FaceId::Up => Dir::Up,
            FaceId::Down => Dir::Down,
            FaceId::Front => Dir::Front,
            FaceId::Right => Dir::Right,
            FaceId::Back => Dir::Back,
            FaceId::Left => Dir::Left,
        }
    }
}

/// The direction a color's center occupies on a solved cube.
#[must_use]
pub fn home_dir(color: Color) -> Dir {
    match color {
        Color::White => Dir::Up,
        Color::Yellow => Dir::Down,
        Color::Green => Dir::Front,
        Color::Blue => Dir::Back,
        Color::Red => Dir::Right,
        Color::Orange => Dir::Left,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Edge,
    Corner,
    Center,
}

/// A physical piece slot: its kind and the facelet coordinates of its
/// stickers, primary sticker first.
pub struct Slot {
    pub kind: PieceKind,
    pub name: &'static str,
    pub facelets: &'static [(FaceId, usize, usize)],
}

pub const EDGE_SLOTS: std::ops::Range<usize> = 0..12;
pub const CORNER_SLOTS: std::ops::Range<usize> = 12..20;
pub const CENTER_SLOTS: std::ops::Range<usize> = 20..26;

/// All 26 slots in signature order: 12 edges, 8 corners, 6 centers.
pub const SLOTS: [Slot; 26] = {
    use FaceId::{Back as B, Down as D, Front as F, Left as L, Right as R, Up as U};
    macro_rules! slot {
        ($kind:ident, $name:literal, $($f:expr),+) => {
            Slot {
                kind: PieceKind::$kind,
                name: $name,
                facelets: &[$($f),+],
            }
        };
    }
    [
        slot!(Edge, "UF", (U, 2, 1), (F, 0, 1)),
        slot!(Edge, "UR", (U, 1, 2), (R, 0, 1)),
        slot!(Edge, "UB", (U, 0, 1), (B, 0, 1)),
        slot!(Edge, "UL", (U, 1, 0), (L, 0, 1)),
        slot!(Edge, "DF", (D, 0, 1), (F, 2, 1)),
        slot!(Edge, "DR", (D, 1, 2), (R, 2, 1)),
        slot!(Edge, "DB", (D, 2, 1), (B, 2, 1)),
        slot!(Edge, "DL", (D, 1, 0), (L, 2, 1)),
        slot!(Edge, "FR", (F, 1, 2), (R, 1, 0)),
        slot!(Edge, "FL", (F, 1, 0), (L, 1, 2)),
        slot!(Edge, "BR", (B, 1, 0), (R, 1, 2)),
        slot!(Edge, "BL", (B, 1, 2), (L, 1, 0)),
        slot!(Corner, "UFR", (U, 2, 2), (F, 0, 2), (R, 0, 0)),
        slot!(Corner, "URB", (U, 0, 2), (R, 0, 2), (B, 0, 0)),
        slot!(Corner, "UBL", (U, 0, 0), (B, 0, 2), (L, 0, 0)),
        slot!(Corner, "ULF", (U, 2, 0), (L, 0, 2), (F, 0, 0)),
        slot!(Corner, "DRF", (D, 0, 2), (R, 2, 0), (F, 2, 2)),
        slot!(Corner, "DFL", (D, 0, 0), (F, 2, 0), (L, 2, 2)),
        slot!(Corner, "DLB", (D, 2, 0), (L, 2, 0), (B, 2, 2)),
        slot!(Corner, "DBR", (D, 2, 2), (B, 2, 0), (R, 2, 2)),
        slot!(Center, "U", (U, 1, 1)),
        slot!(Center, "D", (D, 1, 1)),
        slot!(Center, "F", (F, 1, 1)),
        slot!(Center, "R", (R, 1, 1)),
        slot!(Center, "B", (B, 1, 1)),
        slot!(Center, "L", (L, 1, 1)),
    ]
};

/// Ordered direction pairs an edge can occupy; the signature stores the
/// index of (lead sticker direction, other sticker direction).
pub const EDGE_DIR_PAIRS: [(Dir, Dir); 24] = {
    use Dir::{Back as B, Down as D, Front as F, Left as L, Right as R, Up as U};
    [
        (U, F),
        (F, U),
        (U, R),
        (R, U),
        (U, B),
        (B, U),
        (U, L),
        (L, U),
        (D, F),
        (F, D),
        (D, R),
        (R, D),
        (D, B),
        (B, D),
        (D, L),
        (L, D),
        (F, R),
        (R, F),
        (F, L),
        (L, F),
        (B, R),
        (R, B),
        (B, L),
        (L, B),
    ]
};

pub const SOLVED_SIGNATURE: [u8; 26] = [
    0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, // edges
    0, 3, 6, 9, 12, 15, 18, 21, // corners
    0, 5, 1, 2, 3, 4, // centers
];

/// One physical piece: the colors observed on it, each with the world
/// direction the sticker currently faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPiece {
    pub stickers: Vec<(Color, Dir)>,
}

impl RawPiece {
    fn sorted_colors(&self) -> Vec<Color> {
        let mut colors: Vec<Color> = self.stickers.iter().map(|&(c, _)| c).collect();
        colors.sort_unstable();
        colors
    }

    fn sticker_with(&self, color: Color) -> Option<(Color, Dir)> {
        self.stickers.iter().copied().find(|&(c, _)| c == color)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StructuralError {
    #[error("expected {expected} pieces, found {found}")]
    WrongChildCount { expected: usize, found: usize },
    #[error("piece is missing a facelet color")]
    MissingFacelet,
    #[error("sticker color {0:#08x} is not in the palette")]
    UnknownStickerColor(u32),
    #[error("facelet normal does not align with a face axis")]
    AmbiguousDirection,
    #[error("reference centers do not span two distinct axes")]
    AmbiguousReference,
    #[error("no {0} center piece present")]
    MissingReferenceCenter(&'static str),
    #[error("no piece carries the colors expected at slot {0}")]
    PieceNotFound(&'static str),
    #[error("piece stickers at slot {0} do not sit on adjacent faces")]
    NonAdjacentStickers(&'static str),
}

/// Where the viewer holds the cube: for each solved-frame direction, the
/// world direction that color's center currently faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    phys: [Dir; 6],
}

impl Orientation {
    /// Build from the white center's direction and the orange center's
    /// direction.
    ///
    /// # Errors
    ///
    /// [`StructuralError::AmbiguousReference`] if the two directions share
    /// an axis.
    pub fn from_references(up: Dir, left: Dir) -> Result<Orientation, StructuralError> {
        if up.axis() == left.axis() {
            return Err(StructuralError::AmbiguousReference);
        }
        let [ux, uy, uz] = up.vector().map(i32::from);
        let [lx, ly, lz] = left.vector().map(i32::from);
        let cross = [
            (uy * lz - uz * ly) as i8,
            (uz * lx - ux * lz) as i8,
            (ux * ly - uy * lx) as i8,
        ];
        let front = match Dir::from_vector(cross) {
            Some(d) => d,
            // Non-parallel unit axis vectors always cross to a unit axis.
            None => return Err(StructuralError::AmbiguousReference),
        };
        let mut phys = [Dir::Up; 6];
        phys[Dir::Up as usize] = up;
        phys[Dir::Down as usize] = up.opposite();
        phys[Dir::Left as usize] = left;
        phys[Dir::Right as usize] = left.opposite();
        phys[Dir::Front as usize] = front;
        phys[Dir::Back as usize] = front.opposite();
        Ok(Orientation { phys })
    }

    #[must_use]
    pub fn identity() -> Orientation {
        Orientation {
            phys: [Dir::Up, Dir::Front, Dir::Right, Dir::Back, Dir::Left, Dir::Down],
        }
    }

    /// The world direction the given solved-frame direction maps to.
    #[must_use]
    pub fn physical_dir(&self, canonical: Dir) -> Dir {
        self.phys[canonical as usize]
    }

    /// The color currently playing the role of `canonical` in the viewer's
    /// frame: the color whose center occupies `canonical`'s home direction.
    /// On an unrotated cube this is the identity.
    #[must_use]
    pub fn effective_color(&self, canonical: Color) -> Color {
        let target = home_dir(canonical);
        match Dir::ALL
            .into_iter()
            .find(|&d| self.phys[d as usize] == target)
        {
            Some(d) => d.home_color(),
            // phys permutes the six directions.
            None => canonical,
        }
    }

    /// Inverse of [`Orientation::effective_color`]: the role the given
    /// actual color currently plays.
    #[must_use]
    pub fn true_color(&self, effective: Color) -> Color {
        self.phys[home_dir(effective) as usize].home_color()
    }
}

/// 26-byte state signature: edge direction-pair indices, corner
/// location-and-axis codes, center directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 26]);

impl Signature {
    #[must_use]
    pub fn solved() -> Signature {
        Signature(SOLVED_SIGNATURE)
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.0 == SOLVED_SIGNATURE
    }

    #[must_use]
    pub fn is_solved_at(&self, slot: usize) -> bool {
        self.0[slot] == SOLVED_SIGNATURE[slot]
    }

    /// Decode an edge byte into (lead sticker direction, other direction).
    #[must_use]
    pub fn edge_dirs(&self, slot: usize) -> (Dir, Dir) {
        EDGE_DIR_PAIRS[self.0[slot] as usize]
    }

    /// Decode a corner byte into (physical corner location 0..8, lead
    /// sticker axis 0..3).
    #[must_use]
    pub fn corner_loc_axis(&self, slot: usize) -> (u8, u8) {
        (self.0[slot] / 3, self.0[slot] % 3)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", (b'A' + b) as char)?;
        }
        Ok(())
    }
}

/// Source of raw piece observations, one per physical slot.
pub trait CubeReader {
    /// Read the 26 physical pieces in slot order plus the viewer
    /// orientation.
    ///
    /// # Errors
    ///
    /// [`StructuralError`] when the underlying data is malformed.
    fn read(&self) -> Result<(Vec<RawPiece>, Orientation), StructuralError>;
}

/// Reads a [`CubeState`] directly; the world frame is the array frame.
pub struct ArrayStateReader<'a>(pub &'a CubeState);

impl CubeReader for ArrayStateReader<'_> {
    fn read(&self) -> Result<(Vec<RawPiece>, Orientation), StructuralError> {
        let pieces: Vec<RawPiece> = SLOTS
            .iter()
            .map(|slot| RawPiece {
                stickers: slot
                    .facelets
                    .iter()
                    .map(|&(face, row, col)| (self.0.sticker(face, row, col), Dir::of_face(face)))
                    .collect(),
            })
            .collect();

        let center_dir = |color: Color| {
            pieces[CENTER_SLOTS]
                .iter()
                .find_map(|p| p.sticker_with(color).map(|(_, d)| d))
        };
        let up = center_dir(Color::White)
            .ok_or(StructuralError::MissingReferenceCenter("white"))?;
        let left = center_dir(Color::Orange)
            .ok_or(StructuralError::MissingReferenceCenter("orange"))?;
        let orientation = Orientation::from_references(up, left)?;
        Ok((pieces, orientation))
    }
}

/// External scene snapshot: 26 piece nodes, each carrying stickers with an
/// RGB color and an outward normal.
#[derive(Debug, Clone)]
pub struct SceneCube {
    pub pieces: Vec<ScenePiece>,
}

#[derive(Debug, Clone)]
pub struct ScenePiece {
    pub facelets: Vec<SceneFacelet>,
}

#[derive(Debug, Clone)]
pub struct SceneFacelet {
    pub rgb: Option<u32>,
    pub normal: [f32; 3],
}

fn palette_color(rgb: u32) -> Option<Color> {
    Some(match rgb {
        0x00ff_ffff => Color::White,
        0x00ff_d500 => Color::Yellow,
        0x0000_9b48 => Color::Green,
        0x0000_46ad => Color::Blue,
        0x00b7_1234 => Color::Red,
        0x00ff_5800 => Color::Orange,
        _ => return None,
    })
}

fn dominant_dir(normal: [f32; 3]) -> Option<Dir> {
    let mut vector = [0i8; 3];
    let mut strong = 0;
    for (slot, &component) in vector.iter_mut().zip(&normal) {
        if component.abs() > 0.5 {
            *slot = if component > 0.0 { 1 } else { -1 };
            strong += 1;
        }
    }
    if strong == 1 { Dir::from_vector(vector) } else { None }
}

/// Reads a [`SceneCube`], validating its structure. Malformed scenes fail
/// loudly rather than producing a plausible wrong state.
pub struct SceneReader<'a>(pub &'a SceneCube);

impl CubeReader for SceneReader<'_> {
    fn read(&self) -> Result<(Vec<RawPiece>, Orientation), StructuralError> {
        if self.0.pieces.len() != SLOTS.len() {
            return Err(StructuralError::WrongChildCount {
                expected: SLOTS.len(),
                found: self.0.pieces.len(),
            });
        }

        // A slot is identified by the set of directions its stickers face.
        let slot_dirs: Vec<Vec<Dir>> = SLOTS
            .iter()
            .map(|slot| {
                let mut dirs: Vec<Dir> = slot
                    .facelets
                    .iter()
                    .map(|&(face, _, _)| Dir::of_face(face))
                    .collect();
                dirs.sort_unstable_by_key(|&d| d as u8);
                dirs
            })
            .collect();

        let mut pieces: Vec<Option<RawPiece>> = vec![None; SLOTS.len()];
        for scene_piece in &self.0.pieces {
            let mut stickers = Vec::with_capacity(scene_piece.facelets.len());
            for facelet in &scene_piece.facelets {
                let rgb = facelet.rgb.ok_or(StructuralError::MissingFacelet)?;
                let color =
                    palette_color(rgb).ok_or(StructuralError::UnknownStickerColor(rgb))?;
                let dir =
                    dominant_dir(facelet.normal).ok_or(StructuralError::AmbiguousDirection)?;
                stickers.push((color, dir));
            }
            let mut dirs: Vec<Dir> = stickers.iter().map(|&(_, d)| d).collect();
            dirs.sort_unstable_by_key(|&d| d as u8);
            let slot = slot_dirs
                .iter()
                .position(|candidate| *candidate == dirs)
                .ok_or(StructuralError::AmbiguousDirection)?;
            if pieces[slot].is_some() {
                return Err(StructuralError::AmbiguousDirection);
            }
            pieces[slot] = Some(RawPiece { stickers });
        }
        let pieces: Vec<RawPiece> = pieces
            .into_iter()
            .map(|p| p.ok_or(StructuralError::MissingFacelet))
            .collect::<Result<_, _>>()?;

        let center_dir = |color: Color| {
            pieces[CENTER_SLOTS]
                .iter()
                .find_map(|p| p.sticker_with(color).map(|(_, d)| d))
        };
        let up = center_dir(Color::White)
            .ok_or(StructuralError::MissingReferenceCenter("white"))?;
        let left = center_dir(Color::Orange)
            .ok_or(StructuralError::MissingReferenceCenter("orange"))?;
        let orientation = Orientation::from_references(up, left)?;
        Ok((pieces, orientation))
    }
}

/// Pieces, viewer orientation, and signature extracted from one reader pass.
#[derive(Debug, Clone)]
pub struct CubeModel {
    pub pieces: Vec<RawPiece>,
    pub orientation: Orientation,
    pub signature: Signature,
}

impl CubeModel {
    /// # Errors
    ///
    /// Propagates the reader's [`StructuralError`]s, plus
    /// [`StructuralError::PieceNotFound`] when no physical piece carries a
    /// home slot's expected colors.
    pub fn from_reader(reader: &impl CubeReader) -> Result<CubeModel, StructuralError> {
        let (pieces, orientation) = reader.read()?;
        let signature = compute_signature(&pieces, orientation)?;
        Ok(CubeModel {
            pieces,
            orientation,
            signature,
        })
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.signature.is_solved()
    }
}

fn kind_range(kind: PieceKind) -> std::ops::Range<usize> {
    match kind {
        PieceKind::Edge => EDGE_SLOTS,
        PieceKind::Corner => CORNER_SLOTS,
        PieceKind::Center => CENTER_SLOTS,
    }
}

/// Byte per home slot: where that slot's piece physically sits and how it
/// is twisted, expressed in the viewer's effective colors.
fn compute_signature(
    pieces: &[RawPiece],
    orientation: Orientation,
) -> Result<Signature, StructuralError> {
    let mut bytes = [0u8; 26];
    for (home, slot) in SLOTS.iter().enumerate() {
        // The colors this home slot's piece shows, in the viewer's frame.
        let mut expected: Vec<Color> = slot
            .facelets
            .iter()
            .map(|&(face, _, _)| orientation.effective_color(face.solved_color()))
            .collect();
        let primary = expected[0];
        expected.sort_unstable();

        let (phys, piece) = kind_range(slot.kind)
            .filter_map(|i| pieces.get(i).map(|p| (i, p)))
            .find(|(_, p)| p.sorted_colors() == expected)
            .ok_or(StructuralError::PieceNotFound(slot.name))?;

        bytes[home] = match slot.kind {
            PieceKind::Center => {
                let (_, dir) = piece
                    .sticker_with(primary)
                    .ok_or(StructuralError::PieceNotFound(slot.name))?;
                dir as u8
            }
            PieceKind::Edge => {
                let (_, lead) = piece
                    .sticker_with(primary)
                    .ok_or(StructuralError::PieceNotFound(slot.name))?;
                let (_, other) = piece
                    .stickers
                    .iter()
                    .copied()
                    .find(|&(_, d)| d != lead)
                    .ok_or(StructuralError::NonAdjacentStickers(slot.name))?;
                EDGE_DIR_PAIRS
                    .iter()
                    .position(|&pair| pair == (lead, other))
                    .ok_or(StructuralError::NonAdjacentStickers(slot.name))?
                    as u8
            }
            PieceKind::Corner => {
                let (_, lead) = piece
                    .sticker_with(primary)
                    .ok_or(StructuralError::PieceNotFound(slot.name))?;
                ((phys - CORNER_SLOTS.start) * 3) as u8 + lead.axis()
            }
        };
    }
    Ok(Signature(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Simulator;
    use crate::moves::parse_moves;

    fn model_after(notation: &str) -> CubeModel {
        let mut sim = Simulator::new();
        sim.apply_moves(&parse_moves(notation).unwrap());
        CubeModel::from_reader(&ArrayStateReader(sim.state())).unwrap()
    }

    #[test]
    fn solved_cube_has_solved_signature() {
        let model = model_after("");
        assert_eq!(model.signature, Signature::solved());
        assert!(model.is_solved());
        assert_eq!(model.orientation, Orientation::identity());
    }

    #[test]
    fn whole_cube_rotations_keep_the_solved_signature() {
        for notation in ["x", "y", "z2", "x y'", "z y2 x'"] {
            let model = model_after(notation);
            assert!(model.is_solved(), "rotation {notation} broke the signature");
        }
    }

    #[test]
    fn rotated_orientation_remaps_colors() {
        // After x the white center faces Back and the green center faces Up,
        // so green plays the up-color role and white plays the back role.
        let model = model_after("x");
        assert_eq!(model.orientation.physical_dir(Dir::Up), Dir::Back);
        assert_eq!(model.orientation.effective_color(Color::White), Color::Green);
        assert_eq!(model.orientation.true_color(Color::Green), Color::White);
        assert_eq!(model.orientation.effective_color(Color::Yellow), Color::Blue);
    }

    #[test]
    fn signature_displays_as_letters() {
        assert_eq!(
            Signature::solved().to_string(),
            "ACEGIKMOQSUWADGJMPSVAFBCDE"
        );
    }

    #[test]
    fn quarter_turn_changes_only_its_layer() {
        let model = model_after("U");
        // UF's piece went to UL: lead sticker still faces Up, other faces
        // Left.
        assert_eq!(model.signature.edge_dirs(0), (Dir::Up, Dir::Left));
        assert_eq!(model.signature.edge_dirs(1), (Dir::Up, Dir::Front));
        // UFR's piece moved to ULF with white still up.
        assert_eq!(model.signature.corner_loc_axis(12), (3, 0));
        for slot in 4..12 {
            assert!(model.signature.is_solved_at(slot));
        }
        for slot in 16..26 {
            assert!(model.signature.is_solved_at(slot));
        }
    }

    #[test]
    fn sune_twists_three_corners_in_place_of_permutation() {
        let model = model_after("R U R' U R U2 R'");
        // Sune keeps all last-layer edges oriented and leaves exactly one
        // corner with its white sticker facing up.
        for slot in 0..4 {
            let (lead, _) = model.signature.edge_dirs(slot);
            assert_eq!(lead, Dir::Up);
        }
        let up_facing = (12..16)
            .filter(|&slot| {
                let (loc, axis) = model.signature.corner_loc_axis(slot);
                loc < 4 && axis == 0
            })
            .count();
        assert_eq!(up_facing, 1);
    }

    fn solved_scene() -> SceneCube {
        let state = CubeState::solved();
        let pieces = SLOTS
            .iter()
            .map(|slot| ScenePiece {
                facelets: slot
                    .facelets
                    .iter()
                    .map(|&(face, row, col)| {
                        let color = state.sticker(face, row, col);
                        let rgb = match color {
                            Color::White => 0x00ff_ffff,
                            Color::Yellow => 0x00ff_d500,
                            Color::Green => 0x0000_9b48,
                            Color::Blue => 0x0000_46ad,
                            Color::Red => 0x00b7_1234,
                            Color::Orange => 0x00ff_5800,
                        };
                        let [x, y, z] = Dir::of_face(face).vector();
                        SceneFacelet {
                            rgb: Some(rgb),
                            normal: [f32::from(x), f32::from(y), f32::from(z)],
                        }
                    })
                    .collect(),
            })
            .collect();
        SceneCube { pieces }
    }

    #[test]
    fn scene_reader_reads_a_solved_scene() {
        let scene = solved_scene();
        let model = CubeModel::from_reader(&SceneReader(&scene)).unwrap();
        assert!(model.is_solved());
    }

    #[test]
    fn scene_reader_rejects_wrong_child_count() {
        let mut scene = solved_scene();
        scene.pieces.pop();
        assert_eq!(
            CubeModel::from_reader(&SceneReader(&scene)).unwrap_err(),
            StructuralError::WrongChildCount {
                expected: 26,
                found: 25
            }
        );
    }

    #[test]
    fn scene_reader_rejects_missing_and_unknown_colors() {
        let mut scene = solved_scene();
        scene.pieces[0].facelets[0].rgb = None;
        assert_eq!(
            CubeModel::from_reader(&SceneReader(&scene)).unwrap_err(),
            StructuralError::MissingFacelet
        );

        let mut scene = solved_scene();
        scene.pieces[0].facelets[0].rgb = Some(0x0012_3456);
        assert_eq!(
            CubeModel::from_reader(&SceneReader(&scene)).unwrap_err(),
            StructuralError::UnknownStickerColor(0x0012_3456)
        );
    }

    #[test]
    fn scene_reader_rejects_skewed_normals() {
        let mut scene = solved_scene();
        scene.pieces[3].facelets[0].normal = [0.7, 0.7, 0.0];
        assert_eq!(
            CubeModel::from_reader(&SceneReader(&scene)).unwrap_err(),
            StructuralError::AmbiguousDirection
        );
    }

    #[test]
    fn repainted_sticker_fails_piece_matching() {
        let mut state = CubeState::solved();
        state.faces[FaceId::Up as usize][2][1] = Color::Yellow;
        assert!(matches!(
            CubeModel::from_reader(&ArrayStateReader(&state)).unwrap_err(),
            StructuralError::PieceNotFound(_)
        ));
    }

    #[test]
    fn orientation_rejects_parallel_references() {
        assert_eq!(
            Orientation::from_references(Dir::Up, Dir::Down).unwrap_err(),
            StructuralError::AmbiguousReference
        );
        assert_eq!(
            Orientation::from_references(Dir::Left, Dir::Left).unwrap_err(),
            StructuralError::AmbiguousReference
        );
    }
}
