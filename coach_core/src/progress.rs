//! Stateless interpretation of a [`CubeModel`]: which crosses are done,
//! which F2L pairs sit home, and how far the last layer has progressed.
//!
//! Positions are viewer-frame (the last layer is whatever faces up); the
//! orientation only translates piece roles to the colors the viewer sees.

use crate::canonical::Grid;
use crate::cube::Color;
use crate::model::{CubeModel, Dir, RawPiece};

/// Edge slots per cross, in quad-color order white, yellow, green, red,
/// blue, orange. The paired center slot is `20 + quad index`.
const CROSS_QUADS: [(Color, [usize; 4]); 6] = [
    (Color::White, [0, 1, 2, 3]),
    (Color::Yellow, [4, 5, 6, 7]),
    (Color::Green, [0, 4, 8, 9]),
    (Color::Red, [1, 5, 8, 10]),
    (Color::Blue, [2, 6, 10, 11]),
    (Color::Orange, [3, 7, 9, 11]),
];

/// (corner slot, edge slot) per F2L pair: FR, FL, BR, BL.
pub(crate) const PAIR_SLOTS: [(usize, usize); 4] = [(16, 8), (17, 9), (19, 10), (18, 11)];

/// Canonical color pairs of the four F2L slots, front/back color first.
pub(crate) const PAIR_COLORS: [(Color, Color); 4] = [
    (Color::Green, Color::Red),
    (Color::Green, Color::Orange),
    (Color::Blue, Color::Red),
    (Color::Blue, Color::Orange),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTag {
    Solved,
    Cross,
    Pair,
    EdgesOriented,
    CornersOriented,
    EdgesPermuted,
    CornersPermuted,
}

/// One completed milestone, with the actual colors involved and, for
/// last-layer milestones, the exact top-layer grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    pub tag: StepTag,
    pub colors: Vec<Color>,
    pub grid: Option<Grid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEncoding {
    /// Colors renumbered by first appearance; rotations of one case agree.
    Pattern,
    /// Role-color index plus one; distinguishes every coloring.
    Exact,
}

/// Crosses currently solved, as the colors the viewer sees.
#[must_use]
pub fn cross_colors_solved(model: &CubeModel) -> Vec<Color> {
    CROSS_QUADS
        .iter()
        .enumerate()
        .filter(|&(quad, &(_, slots))| {
            model.signature.is_solved_at(20 + quad)
                && slots.iter().all(|&slot| model.signature.is_solved_at(slot))
        })
        .map(|(_, &(color, _))| model.orientation.effective_color(color))
        .collect()
}

/// Which of the four bottom-layer pairs are home, or `None` when
/// `cross_color` is not the solved bottom cross.
#[must_use]
pub fn pairs_solved(model: &CubeModel, cross_color: Color) -> Option<[bool; 4]> {
    let bottom = model.orientation.effective_color(Color::Yellow);
    if cross_color != bottom || !cross_colors_solved(model).contains(&bottom) {
        return None;
    }
    Some(PAIR_SLOTS.map(|(corner, edge)| {
        model.signature.is_solved_at(corner) && model.signature.is_solved_at(edge)
    }))
}

#[must_use]
pub fn f2l_complete(model: &CubeModel) -> bool {
    pairs_solved(model, model.orientation.effective_color(Color::Yellow))
        .is_some_and(|pairs| pairs.into_iter().all(|p| p))
}

/// All four last-layer edges show the top color upward.
#[must_use]
pub fn eo_solved(model: &CubeModel) -> bool {
    (0..4).all(|slot| model.signature.edge_dirs(slot).0 == Dir::Up)
}

/// All four last-layer corners show the top color upward.
#[must_use]
pub fn co_solved(model: &CubeModel) -> bool {
    (12..16).all(|slot| {
        let (loc, axis) = model.signature.corner_loc_axis(slot);
        loc < 4 && axis == 0
    })
}

/// The cyclic offset of the last-layer edges from home: `Some(k)` when the
/// piece from home position `i` sits at position `(i + k) % 4` for all
/// four, every lead sticker facing up. Positions run F=0, R=1, B=2, L=3.
#[must_use]
pub fn ep_offset(model: &CubeModel) -> Option<u8> {
    let mut positions = [0u8; 4];
    for (home, pos) in positions.iter_mut().enumerate() {
        let (lead, other) = model.signature.edge_dirs(home);
        if lead != Dir::Up {
            return None;
        }
        *pos = side_position(other)?;
    }
    cyclic_offset(positions)
}

/// Corner analogue of [`ep_offset`]; positions are UFR=0, URB=1, UBL=2,
/// ULF=3, matching the edge position one step clockwise of each.
#[must_use]
pub fn cp_offset(model: &CubeModel) -> Option<u8> {
    let mut positions = [0u8; 4];
    for (home, pos) in positions.iter_mut().enumerate() {
        let (loc, axis) = model.signature.corner_loc_axis(12 + home);
        if loc >= 4 || axis != 0 {
            return None;
        }
        *pos = loc;
    }
    cyclic_offset(positions)
}

#[must_use]
pub fn ep_solved(model: &CubeModel) -> bool {
    ep_offset(model).is_some()
}

#[must_use]
pub fn cp_solved(model: &CubeModel) -> bool {
    cp_offset(model).is_some()
}

/// Whether the permuted edge ring and corner ring line up with each other:
/// every edge shares its side color with the corner clockwise of it. Holds
/// exactly when both cyclic offsets are equal.
#[must_use]
pub fn permutation_aligned(model: &CubeModel) -> bool {
    match (ep_offset(model), cp_offset(model)) {
        (Some(edge_k), Some(corner_k)) => edge_k == corner_k,
        _ => false,
    }
}

fn side_position(dir: Dir) -> Option<u8> {
    match dir {
        Dir::Front => Some(0),
        Dir::Right => Some(1),
        Dir::Back => Some(2),
        Dir::Left => Some(3),
        Dir::Up | Dir::Down => None,
    }
}

fn cyclic_offset(positions: [u8; 4]) -> Option<u8> {
    let k = positions[0];
    positions
        .iter()
        .enumerate()
        .all(|(i, &p)| p == (i as u8 + k) % 4)
        .then_some(k)
}

/// Physical slots whose stickers fill the 5x5 top-layer grid. Inner nine
/// cells read the up-facing stickers; the twelve border cells read the
/// sideways stickers of the same pieces. The four grid corners stay zero.
const GRID_INNER: [[usize; 3]; 3] = [[14, 2, 13], [3, 20, 1], [15, 0, 12]];

pub fn last_layer_grid(model: &CubeModel, encoding: GridEncoding) -> Grid {
    let mut cells = [[0u8; 5]; 5];
    let mut raw = [[None::<Color>; 5]; 5];

    for (r, row) in GRID_INNER.iter().enumerate() {
        for (c, &slot) in row.iter().enumerate() {
            raw[r + 1][c + 1] = sticker_toward(&model.pieces[slot], Dir::Up);
        }
    }
    for i in 0..3 {
        raw[0][i + 1] = sticker_toward(&model.pieces[GRID_INNER[0][i]], Dir::Back);
        raw[4][i + 1] = sticker_toward(&model.pieces[GRID_INNER[2][i]], Dir::Front);
        raw[i + 1][0] = sticker_toward(&model.pieces[GRID_INNER[i][0]], Dir::Left);
        raw[i + 1][4] = sticker_toward(&model.pieces[GRID_INNER[i][2]], Dir::Right);
    }

    match encoding {
        GridEncoding::Exact => {
            for (r, row) in raw.iter().enumerate() {
                for (c, &cell) in row.iter().enumerate() {
                    if let Some(color) = cell {
                        cells[r][c] = model.orientation.true_color(color).index() + 1;
                    }
                }
            }
        }
        GridEncoding::Pattern => {
            // Stable renumbering: the top color is always 1 and opposite
            // colors take adjacent ids, so one case's rotations and
            // recolorings collapse together downstream.
            let mut ids = [0u8; 6];
            ids[Color::White.index() as usize] = 1;
            let mut next = 2;
            for (r, row) in raw.iter().enumerate() {
                for (c, &cell) in row.iter().enumerate() {
                    let Some(color) = cell else { continue };
                    let role = model.orientation.true_color(color);
                    if ids[role.index() as usize] == 0 {
                        if role == Color::Yellow {
                            ids[role.index() as usize] = next;
                            next += 1;
                        } else {
                            ids[role.index() as usize] = next;
                            ids[role.opposite().index() as usize] = next + 1;
                            next += 2;
                        }
                    }
                    cells[r][c] = ids[role.index() as usize];
                }
            }
        }
    }
    Grid(cells)
}

fn sticker_toward(piece: &RawPiece, dir: Dir) -> Option<Color> {
    piece.stickers.iter().copied().find_map(|(color, d)| (d == dir).then_some(color))
}

/// The ordered list of milestones the solve has reached.
#[must_use]
pub fn steps_completed(model: &CubeModel) -> Vec<StepInfo> {
    if model.is_solved() {
        return vec![StepInfo {
            tag: StepTag::Solved,
            colors: Vec::new(),
            grid: None,
        }];
    }

    let mut steps = Vec::new();
    let crosses = cross_colors_solved(model);
    if crosses.is_empty() {
        return steps;
    }
    steps.push(StepInfo {
        tag: StepTag::Cross,
        colors: crosses,
        grid: None,
    });

    let bottom = model.orientation.effective_color(Color::Yellow);
    let Some(pairs) = pairs_solved(model, bottom) else {
        return steps;
    };
    for (pair, &(front, side)) in pairs.iter().zip(&PAIR_COLORS) {
        if *pair {
            steps.push(StepInfo {
                tag: StepTag::Pair,
                colors: vec![
                    model.orientation.effective_color(front),
                    model.orientation.effective_color(side),
                ],
                grid: None,
            });
        }
    }
    if !pairs.into_iter().all(|p| p) {
        return steps;
    }

    let grid = last_layer_grid(model, GridEncoding::Exact);
    let top = model.orientation.effective_color(Color::White);
    let mut push = |tag| {
        steps.push(StepInfo {
            tag,
            colors: vec![top],
            grid: Some(grid.clone()),
        });
    };
    if eo_solved(model) {
        push(StepTag::EdgesOriented);
    }
    if co_solved(model) {
        push(StepTag::CornersOriented);
    }
    if ep_solved(model) {
        push(StepTag::EdgesPermuted);
    }
    if cp_solved(model) {
        push(StepTag::CornersPermuted);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Simulator;
    use crate::model::{ArrayStateReader, CubeModel};
    use crate::moves::parse_moves;

    fn model_after(notation: &str) -> CubeModel {
        let mut sim = Simulator::new();
        sim.apply_moves(&parse_moves(notation).unwrap());
        CubeModel::from_reader(&ArrayStateReader(sim.state())).unwrap()
    }

    #[test]
    fn solved_cube_reports_a_single_solved_step() {
        let steps = steps_completed(&model_after(""));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].tag, StepTag::Solved);
    }

    #[test]
    fn sexy_move_keeps_two_crosses_and_two_pairs() {
        // R carries the white-blue edge from UB down into FR, so only the
        // yellow and orange crosses survive.
        let model = model_after("R U R' U'");
        assert_eq!(
            cross_colors_solved(&model),
            vec![Color::Yellow, Color::Orange]
        );
        assert_eq!(
            pairs_solved(&model, Color::Yellow),
            Some([false, true, false, true])
        );
        assert_eq!(pairs_solved(&model, Color::White), None);
        assert!(!f2l_complete(&model));
    }

    #[test]
    fn bare_cross_reports_a_single_step() {
        // Four conjugates, one per slot, pull every pair into the top layer
        // while the yellow cross round-trips through the middle layer.
        let model = model_after("R U R' L' U L R' U R L U' L'");
        assert_eq!(pairs_solved(&model, Color::Yellow), Some([false; 4]));
        let steps = steps_completed(&model);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].tag, StepTag::Cross);
        assert_eq!(steps[0].colors, vec![Color::Yellow]);
        assert_eq!(steps[0].grid, None);
    }

    #[test]
    fn last_layer_scramble_leaves_f2l_complete() {
        let model = model_after("R U R' U R U2 R'");
        assert!(f2l_complete(&model));
        assert!(eo_solved(&model));
        assert!(!co_solved(&model));
    }

    #[test]
    fn auf_shifts_both_rings_by_the_same_offset() {
        let model = model_after("U");
        assert_eq!(ep_offset(&model), Some(3));
        assert_eq!(cp_offset(&model), Some(3));
        assert!(permutation_aligned(&model));
        let model = model_after("U2");
        assert_eq!(ep_offset(&model), Some(2));
        assert!(permutation_aligned(&model));
    }

    #[test]
    fn h_perm_permutes_both_rings_but_misaligns_them() {
        let model = model_after("M2 U M2 U2 M2 U M2");
        assert_eq!(ep_offset(&model), Some(2));
        assert_eq!(cp_offset(&model), Some(0));
        assert!(ep_solved(&model) && cp_solved(&model));
        assert!(!permutation_aligned(&model));
    }

    #[test]
    fn exact_grid_of_a_solved_top() {
        let grid = last_layer_grid(&model_after(""), GridEncoding::Exact);
        let expected = [
            [0, 4, 4, 4, 0],
            [6, 1, 1, 1, 5],
            [6, 1, 1, 1, 5],
            [6, 1, 1, 1, 5],
            [0, 3, 3, 3, 0],
        ];
        assert_eq!(grid.0, expected);
    }

    #[test]
    fn pattern_grid_renumbers_by_first_appearance() {
        let grid = last_layer_grid(&model_after(""), GridEncoding::Pattern);
        let expected = [
            [0, 2, 2, 2, 0],
            [4, 1, 1, 1, 5],
            [4, 1, 1, 1, 5],
            [4, 1, 1, 1, 5],
            [0, 3, 3, 3, 0],
        ];
        assert_eq!(grid.0, expected);
    }

    #[test]
    fn steps_after_an_oll_scramble_include_orientation_tags() {
        let model = model_after("R U2 R' U' R U' R'"); // inverse sune
        let steps = steps_completed(&model);
        assert!(steps.iter().any(|s| s.tag == StepTag::Cross));
        assert_eq!(
            steps.iter().filter(|s| s.tag == StepTag::Pair).count(),
            4
        );
        assert!(steps.iter().any(|s| s.tag == StepTag::EdgesOriented));
        assert!(steps.iter().all(|s| s.tag != StepTag::CornersOriented));
    }
}
