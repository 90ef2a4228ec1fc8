//! Canonical keys for last-layer patterns. A 5x5 grid is masked down to the
//! cells its case family cares about, read under all four top-layer
//! rotations, and folded to the smallest base-6 key. The rotations that
//! achieve the minimum come along as a movement set for AUF alignment.

/// Top-layer pattern: nine up-facing stickers in the middle, the twelve
/// sideways last-layer stickers on the border, zeros in the corners.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid(pub [[u8; 5]; 5]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseFamily {
    Oll,
    Eo,
    Pll,
    Cp,
    Zbll,
    OneLook,
}

/// Set of top-layer rotation counts (0..4) achieving the canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementSet(u8);

impl MovementSet {
    #[must_use]
    pub fn empty() -> MovementSet {
        MovementSet(0)
    }

    pub fn insert(&mut self, rotation: u8) {
        self.0 |= 1 << (rotation % 4);
    }

    #[must_use]
    pub fn contains(self, rotation: u8) -> bool {
        self.0 & (1 << (rotation % 4)) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..4).filter(move |&k| self.contains(k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalPattern {
    pub key: u64,
    pub min_movements: MovementSet,
}

/// Per-cell value cap applied before folding; 0 drops the cell entirely.
type Mask = [[u8; 5]; 5];

const OLL_MASK: Mask = [
    [0, 2, 2, 2, 0],
    [2, 2, 2, 2, 2],
    [2, 2, 2, 2, 2],
    [2, 2, 2, 2, 2],
    [0, 2, 2, 2, 0],
];

const EO_MASK: Mask = [
    [0, 0, 2, 0, 0],
    [0, 0, 2, 0, 0],
    [2, 2, 2, 2, 2],
    [0, 0, 2, 0, 0],
    [0, 0, 2, 0, 0],
];

const PLL_MASK: Mask = [
    [0, 6, 6, 6, 0],
    [6, 0, 0, 0, 6],
    [6, 0, 0, 0, 6],
    [6, 0, 0, 0, 6],
    [0, 6, 6, 6, 0],
];

const CP_MASK: Mask = [
    [0, 6, 0, 6, 0],
    [6, 0, 0, 0, 6],
    [0, 0, 0, 0, 0],
    [6, 0, 0, 0, 6],
    [0, 6, 0, 6, 0],
];

const ZBLL_MASK: Mask = [
    [0, 6, 6, 6, 0],
    [6, 2, 2, 2, 6],
    [6, 2, 2, 2, 6],
    [6, 2, 2, 2, 6],
    [0, 6, 6, 6, 0],
];

const ONE_LOOK_MASK: Mask = [
    [0, 6, 6, 6, 0],
    [6, 6, 6, 6, 6],
    [6, 6, 6, 6, 6],
    [6, 6, 6, 6, 6],
    [0, 6, 6, 6, 0],
];

/// Flat index remaps for 0..4 clockwise grid rotations.
const ROT_IDX: [[usize; 25]; 4] = {
    let mut idx = [[0usize; 25]; 4];
    let mut i = 0;
    while i < 25 {
        idx[0][i] = i;
        i += 1;
    }
    let mut k = 1;
    while k < 4 {
        let mut r = 0;
        while r < 5 {
            let mut c = 0;
            while c < 5 {
                idx[k][r * 5 + c] = idx[k - 1][(4 - c) * 5 + r];
                c += 1;
            }
            r += 1;
        }
        k += 1;
    }
    idx
};

/// Border cells clockwise from (0, 1), twelve in all.
const OUTER_RING: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 4),
    (2, 4),
    (3, 4),
    (4, 3),
    (4, 2),
    (4, 1),
    (3, 0),
    (2, 0),
    (1, 0),
];

/// Inner ring clockwise from (1, 1), eight in all.
const INNER_RING: [(usize, usize); 8] = [
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 3),
    (3, 3),
    (3, 2),
    (3, 1),
    (2, 1),
];

#[must_use]
pub fn rotate90(grid: &Grid) -> Grid {
    let mut out = [[0u8; 5]; 5];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = grid.0[4 - c][r];
        }
    }
    Grid(out)
}

fn masked(grid: &Grid, family: CaseFamily) -> [[u8; 5]; 5] {
    let mask = match family {
        CaseFamily::Oll => &OLL_MASK,
        CaseFamily::Eo => &EO_MASK,
        CaseFamily::Pll => &PLL_MASK,
        CaseFamily::Cp => &CP_MASK,
        CaseFamily::Zbll => &ZBLL_MASK,
        CaseFamily::OneLook => &ONE_LOOK_MASK,
    };
    let mut out = [[0u8; 5]; 5];
    for r in 0..5 {
        for c in 0..5 {
            out[r][c] = grid.0[r][c].min(mask[r][c]);
        }
    }
    out
}

/// Collapse a grid to its rotation-independent key for the given family.
#[must_use]
pub fn canonicalize(grid: &Grid, family: CaseFamily) -> CanonicalPattern {
    let cells = masked(grid, family);
    let candidate = |rotation: u8| match family {
        CaseFamily::Oll | CaseFamily::Eo => rotational_key(&cells, rotation),
        CaseFamily::Pll | CaseFamily::Cp | CaseFamily::Zbll | CaseFamily::OneLook => {
            spiral_key(&cells, rotation)
        }
    };

    let mut best = candidate(0);
    let mut min_movements = MovementSet::empty();
    min_movements.insert(0);
    for rotation in 1..4 {
        let key = candidate(rotation);
        if key < best {
            best = key;
            min_movements = MovementSet::empty();
            min_movements.insert(rotation);
        } else if key == best {
            min_movements.insert(rotation);
        }
    }
    CanonicalPattern {
        key: best,
        min_movements,
    }
}

/// Read the grid under a rotation remap and fold row-major. Corner cells
/// are always zero, so 25 base-6 digits fit in a u64.
fn rotational_key(cells: &[[u8; 5]; 5], rotation: u8) -> u64 {
    ROT_IDX[rotation as usize]
        .iter()
        .fold(0u64, |acc, &i| acc * 6 + u64::from(cells[i / 5][i % 5]))
}

/// Read both rings starting at the offset a rotation induces, renumber the
/// values by first appearance, and fold. Renumbering makes the key blind
/// to which actual colors fill a role.
fn spiral_key(cells: &[[u8; 5]; 5], rotation: u8) -> u64 {
    let outer_start = (12 - 3 * usize::from(rotation)) % 12;
    let inner_start = (8 - 2 * usize::from(rotation)) % 8;
    let read = OUTER_RING
        .iter()
        .cycle()
        .skip(outer_start)
        .take(12)
        .chain(INNER_RING.iter().cycle().skip(inner_start).take(8))
        .chain(std::iter::once(&(2usize, 2usize)));

    let mut ids = [0u8; 7];
    let mut next = 1u8;
    let mut key = 0u64;
    for &(r, c) in read {
        let value = cells[r][c];
        let digit = if value == 0 {
            0
        } else {
            if ids[value as usize] == 0 {
                ids[value as usize] = next;
                next += 1;
            }
            ids[value as usize]
        };
        key = key * 6 + u64::from(digit);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    /// Sune: headlights on the left, one oriented corner front-right.
    fn sune_grid() -> Grid {
        Grid([
            [0, 2, 1, 2, 0],
            [1, 2, 1, 2, 2],
            [2, 1, 1, 1, 2],
            [1, 2, 1, 1, 2],
            [0, 2, 2, 1, 0],
        ])
    }

    #[test]
    fn rotating_the_input_does_not_change_the_key() {
        for family in [
            CaseFamily::Oll,
            CaseFamily::Eo,
            CaseFamily::Pll,
            CaseFamily::Cp,
            CaseFamily::Zbll,
            CaseFamily::OneLook,
        ] {
            let base = canonicalize(&sune_grid(), family);
            let mut grid = sune_grid();
            for _ in 0..3 {
                grid = rotate90(&grid);
                assert_eq!(canonicalize(&grid, family).key, base.key);
            }
        }
    }

    #[test]
    fn rotation_shifts_the_movement_set() {
        let base = canonicalize(&sune_grid(), CaseFamily::Oll);
        let rotated = canonicalize(&rotate90(&sune_grid()), CaseFamily::Oll);
        let shifted = base
            .min_movements
            .iter()
            .map(|k| (k + 3) % 4)
            .sorted()
            .collect_vec();
        assert_eq!(rotated.min_movements.iter().collect_vec(), shifted);
    }

    #[test]
    fn fourfold_symmetric_grid_keeps_every_movement() {
        let uniform = Grid([
            [0, 2, 2, 2, 0],
            [2, 1, 1, 1, 2],
            [2, 1, 1, 1, 2],
            [2, 1, 1, 1, 2],
            [0, 2, 2, 2, 0],
        ]);
        let pattern = canonicalize(&uniform, CaseFamily::Oll);
        assert_eq!(pattern.min_movements.iter().collect_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn eo_mask_ignores_corner_stickers() {
        let mut twisted = sune_grid();
        // Change a corner cell only; the edge family must not care.
        twisted.0[1][1] = 1;
        assert_eq!(
            canonicalize(&twisted, CaseFamily::Eo).key,
            canonicalize(&sune_grid(), CaseFamily::Eo).key
        );
        assert_ne!(
            canonicalize(&twisted, CaseFamily::Oll).key,
            canonicalize(&sune_grid(), CaseFamily::Oll).key
        );
    }

    #[test]
    fn spiral_renumbering_collapses_recolorings() {
        // A T-perm-shaped border with two color labelings of the same case.
        let first = Grid([
            [0, 2, 3, 3, 0],
            [5, 1, 1, 1, 2],
            [4, 1, 1, 1, 5],
            [4, 1, 1, 1, 4],
            [0, 5, 2, 2, 0],
        ]);
        let relabeled = Grid([
            [0, 4, 5, 5, 0],
            [3, 1, 1, 1, 4],
            [2, 1, 1, 1, 3],
            [2, 1, 1, 1, 2],
            [0, 3, 4, 4, 0],
        ]);
        assert_eq!(
            canonicalize(&first, CaseFamily::Pll).key,
            canonicalize(&relabeled, CaseFamily::Pll).key
        );
    }

    #[test]
    fn pll_ignores_orientation_cells_cp_ignores_edges() {
        let mut grid = sune_grid();
        let pll = canonicalize(&grid, CaseFamily::Pll);
        grid.0[2][2] = 2;
        grid.0[1][2] = 2;
        assert_eq!(canonicalize(&grid, CaseFamily::Pll).key, pll.key);

        let cp = canonicalize(&grid, CaseFamily::Cp);
        grid.0[0][2] = 5;
        assert_eq!(canonicalize(&grid, CaseFamily::Cp).key, cp.key);
    }
}
