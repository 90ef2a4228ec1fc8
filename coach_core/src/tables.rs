//! The authored algorithm corpus and its startup compilation. Every
//! algorithm is replayed in inverse on a solved simulator; the state that
//! produces is the case the algorithm solves, so canonical keys and
//! signatures stay consistent with the live pipeline by construction.

use fxhash::FxHashMap;
use log::{info, warn};
use thiserror::Error;

use crate::canonical::{canonicalize, CaseFamily, MovementSet};
use crate::cube::Simulator;
use crate::index::SIGNATURE_LEN;
use crate::model::{ArrayStateReader, CubeModel, Dir, Signature, StructuralError};
use crate::moves::{
    format_moves, invert_moves, mirror_moves, parse_moves, Move, MoveParseError,
};
use crate::progress::{last_layer_grid, GridEncoding};

/// 57 orientation cases, named by convention.
const OLL_CASES: [(&str, &str); 57] = [
    ("OLL 1", "R U2 R2 F R F' U2 R' F R F'"),
    ("OLL 2", "r U r' U2 r U2 R' U2 R U' r'"),
    ("OLL 3", "f R U R' U' f' U' F R U R' U' F'"),
    ("OLL 4", "f R U R' U' f' U F R U R' U' F'"),
    ("OLL 5", "r' U2 R U R' U r"),
    ("OLL 6", "r U2 R' U' R U' r'"),
    ("OLL 7", "r U R' U R U2 r'"),
    ("OLL 8", "r' U' R U' R' U2 r"),
    ("OLL 9", "R U R' U' R' F R2 U R' U' F'"),
    ("OLL 10", "R U R' U R' F R F' R U2 R'"),
    ("OLL 11", "r U R' U R' F R F' R U2 r'"),
    ("OLL 12", "F R U R' U' F' U F R U R' U' F'"),
    ("OLL 13", "F U R U' R2 F' R U R U' R'"),
    ("OLL 14", "R' F R U R' F' R F U' F'"),
    ("OLL 15", "r' U' r R' U' R U r' U r"),
    ("OLL 16", "r U r' R U R' U' r U' r'"),
    ("OLL 17", "F R' F' R2 r' U R U' R' U' M'"),
    ("OLL 18", "r U R' U R U2 r2 U' R U' R' U2 r"),
    ("OLL 19", "M U R U R' U' M' R' F R F'"),
    ("OLL 20", "r U R' U' M2 U R U' R' U' M'"),
    ("OLL 21", "R U2 R' U' R U R' U' R U' R'"),
    ("OLL 22", "R U2 R2 U' R2 U' R2 U2 R"),
    ("OLL 23", "R2 D' R U2 R' D R U2 R"),
    ("OLL 24", "r U R' U' r' F R F'"),
    ("OLL 25", "F' r U R' U' r' F R"),
    ("OLL 26", "R U2 R' U' R U' R'"),
    ("OLL 27", "R U R' U R U2 R'"),
    ("OLL 28", "r U R' U' M U R U' R'"),
    ("OLL 29", "R U R' U' R U' R' F' U' F R U R'"),
    ("OLL 30", "F U R U2 R' U' R U2 R' U' F'"),
    ("OLL 31", "R' U' F U R U' R' F' R"),
    ("OLL 32", "L U F' U' L' U L F L'"),
    ("OLL 33", "R U R' U' R' F R F'"),
    ("OLL 34", "R U R2 U' R' F R U R U' F'"),
    ("OLL 35", "R U2 R2 F R F' R U2 R'"),
    ("OLL 36", "L' U' L U' L' U L U L F' L' F"),
    ("OLL 37", "F R' F' R U R U' R'"),
    ("OLL 38", "R U R' U R U' R' U' R' F R F'"),
    ("OLL 39", "L F' L' U' L U F U' L'"),
    ("OLL 40", "R' F R U R' U' F' U R"),
    ("OLL 41", "R U R' U R U2 R' F R U R' U' F'"),
    ("OLL 42", "R' U' R U' R' U2 R F R U R' U' F'"),
    ("OLL 43", "F' U' L' U L F"),
    ("OLL 44", "F U R U' R' F'"),
    ("OLL 45", "F R U R' U' F'"),
    ("OLL 46", "R' U' R' F R F' U R"),
    ("OLL 47", "R' U' R' F R F' R' F R F' U R"),
    ("OLL 48", "F R U R' U' R U R' U' F'"),
    ("OLL 49", "r U' r2 U r2 U r2 U' r"),
    ("OLL 50", "r' U r2 U' r2 U' r2 U r'"),
    ("OLL 51", "F U R U' R' U R U' R' F'"),
    ("OLL 52", "R U R' U R U' B U' B' R'"),
    ("OLL 53", "r' U' R U' R' U R U' R' U2 r"),
    ("OLL 54", "r U R' U R U' R' U R U2 r'"),
    ("OLL 55", "R' F R U R U' R2 F' R2 U' R' U R U R'"),
    ("OLL 56", "r' U' r U' R' U R U' R' U R r' U r"),
    ("OLL 57", "R U R' U' M' U R U' r'"),
];

/// 21 permutation cases.
const PLL_CASES: [(&str, &str); 21] = [
    ("Aa", "x R' U R' D2 R U' R' D2 R2 x'"),
    ("Ab", "x R2 D2 R U R' D2 R U' R x'"),
    ("E", "x' R U' R' D R U R' D' R U R' D R U' R' D' x"),
    ("F", "R' U' F' R U R' U' R' F R2 U' R' U' R U R' U R"),
    ("Ga", "R2 U R' U R' U' R U' R2 U' D R' U R D'"),
    ("Gb", "R' U' R U D' R2 U R' U R U' R U' R2 D"),
    ("Gc", "R2 U' R U' R U R' U R2 U D' R U' R' D"),
    ("Gd", "R U R' U' D R2 U' R U' R' U R' U R2 D'"),
    ("H", "M2 U M2 U2 M2 U M2"),
    ("Ja", "R' U L' U2 R U' R' U2 R L"),
    ("Jb", "R U R' F' R U R' U' R' F R2 U' R'"),
    ("Na", "R U R' U R U R' F' R U R' U' R' F R2 U' R' U2 R U' R'"),
    ("Nb", "R' U R U' R' F' U' F R U R' F R' F' R U' R"),
    ("Ra", "R U' R' U' R U R D R' U' R D' R' U2 R'"),
    ("Rb", "R2 F R U R U' R' F' R U2 R' U2 R"),
    ("T", "R U R' U' R' F R2 U' R' U' R U R' F'"),
    ("Ua", "R U' R U R U R U' R' U' R2"),
    ("Ub", "R2 U R U R' U' R' U' R' U R'"),
    ("V", "R' U R' U' y R' F' R2 U' R' U R' F R F"),
    ("Y", "F R U' R' U' R U R' F' R U R' U' R' F R F'"),
    ("Z", "M' U M2 U M2 U M' U2 M2"),
];

/// 41 front-right slot inserts; the front-left set is derived by mirror.
const F2L_CASES: [(&str, &str); 41] = [
    ("F2L 1", "U R U' R'"),
    ("F2L 2", "U' F' U F"),
    ("F2L 3", "F' U' F"),
    ("F2L 4", "R U R'"),
    ("F2L 5", "U' R U' R' U R U R'"),
    ("F2L 6", "U' R U R' U R U R'"),
    ("F2L 7", "U' R U2 R' U R U R'"),
    ("F2L 8", "U F' U F U' F' U' F"),
    ("F2L 9", "U F' U' F U' R U R'"),
    ("F2L 10", "U' R U R' U F' U' F"),
    ("F2L 11", "U' R U2 R' U F' U' F"),
    ("F2L 12", "R U' R' U2 F' U' F"),
    ("F2L 13", "U' R U' R' U2 R U' R'"),
    ("F2L 14", "U' R U R' U2 R U R'"),
    ("F2L 15", "U' R U' R' U F' U' F"),
    ("F2L 16", "R U' R' U' F' U F"),
    ("F2L 17", "R U2 R' U' R U R'"),
    ("F2L 18", "F' U2 F U F' U' F"),
    ("F2L 19", "U R U2 R' U R U' R'"),
    ("F2L 20", "U' F' U2 F U' F' U F"),
    ("F2L 21", "U2 R U R' U R U' R'"),
    ("F2L 22", "U2 F' U' F U' F' U F"),
    ("F2L 23", "U R U R' U2 R U R' U' R U R'"),
    ("F2L 24", "U' R U' R' U2 R U' R' U R U' R'"),
    ("F2L 25", "U' F' U F U R U' R'"),
    ("F2L 26", "U R U' R' U' F' U F"),
    ("F2L 27", "R U' R' U R U' R'"),
    ("F2L 28", "R U R' U' F' U F"),
    ("F2L 29", "R' U' R U' R' U R"),
    ("F2L 30", "F U F' U F U F'"),
    ("F2L 31", "U' R' U R U' R' U' R"),
    ("F2L 32", "U R U' R' U R U' R' U R U' R'"),
    ("F2L 33", "U' F' U F U F' U F"),
    ("F2L 34", "U2 R U' R' U' F' U F"),
    ("F2L 35", "U' R U R' U' R U2 R'"),
    ("F2L 36", "U F' U' F U F' U2 F"),
    ("F2L 37", "R2 U2 F R2 F' U2 R' U R'"),
    ("F2L 38", "R U' R' U R U2 R' U R U' R'"),
    ("F2L 39", "U R U2 R' U' R U R'"),
    ("F2L 40", "U' F' U2 F U F' U' F"),
    ("F2L 41", "R U' R' U2 R U R'"),
];

const PRE_AUF: [&str; 4] = ["", "U", "U'", "U2"];

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("unparseable authored algorithm: {0}")]
    Parse(#[from] MoveParseError),
    #[error("simulator state unreadable during compilation: {0}")]
    Structural(#[from] StructuralError),
}

/// One compiled algorithm: the case it solves, how its reference edge
/// travels when executed, and the rotations its canonical key tolerates.
#[derive(Debug, Clone)]
pub struct CompiledAlgorithm {
    pub case_index: usize,
    pub moves: Vec<Move>,
    pub ref_piece_movement: u8,
    pub min_movements: MovementSet,
}

/// Canonical-key dictionary for one case family.
pub struct CaseTable {
    entries: FxHashMap<u64, usize>,
    names: Vec<&'static str>,
    algs: Vec<CompiledAlgorithm>,
}

impl CaseTable {
    /// The case a live canonical key belongs to, or `None` when the key is
    /// outside the corpus.
    #[must_use]
    pub fn lookup(&self, key: u64) -> Option<(usize, &'static str)> {
        self.entries.get(&key).map(|&index| (index, self.names[index]))
    }

    pub fn algorithms_for(&self, case_index: usize) -> impl Iterator<Item = &CompiledAlgorithm> {
        self.algs.iter().filter(move |alg| alg.case_index == case_index)
    }

    #[must_use]
    pub fn case_count(&self) -> usize {
        self.names.len()
    }
}

/// One index entry: an F2L insert (possibly pre-rotated) and the signature
/// of the state it solves.
pub struct F2lEntry {
    pub moves: Vec<Move>,
    pub signature: [u8; SIGNATURE_LEN],
}

pub struct CompiledTables {
    pub oll: CaseTable,
    pub pll: CaseTable,
    pub f2l: Vec<F2lEntry>,
}

/// The model of the state an algorithm solves: its inverse applied to a
/// solved cube.
fn case_model(moves: &[Move]) -> Result<CubeModel, CompileError> {
    let mut sim = Simulator::new();
    sim.apply_moves(&invert_moves(moves));
    Ok(CubeModel::from_reader(&ArrayStateReader(sim.state()))?)
}

fn f2l_intact(signature: &Signature) -> bool {
    (4..12).chain(16..26).all(|slot| signature.is_solved_at(slot))
}

fn cross_intact(signature: &Signature) -> bool {
    (4..8).chain(20..26).all(|slot| signature.is_solved_at(slot))
}

impl CompiledTables {
    /// Compile the whole corpus. Authored algorithms that fail their
    /// structural check are skipped with a warning so one typo cannot take
    /// the advisor down.
    ///
    /// # Errors
    ///
    /// [`CompileError`] when an algorithm does not parse or the simulator
    /// state cannot be read back.
    pub fn compile() -> Result<CompiledTables, CompileError> {
        let oll = compile_family(&OLL_CASES, CaseFamily::Oll)?;
        let pll = compile_family(&PLL_CASES, CaseFamily::Pll)?;
        let f2l = compile_f2l()?;
        info!(
            "compiled {} OLL cases, {} PLL cases, {} F2L entries",
            oll.case_count(),
            pll.case_count(),
            f2l.len()
        );
        Ok(CompiledTables { oll, pll, f2l })
    }
}

fn compile_family(
    cases: &[(&'static str, &'static str)],
    family: CaseFamily,
) -> Result<CaseTable, CompileError> {
    let mut table = CaseTable {
        entries: FxHashMap::default(),
        names: Vec::new(),
        algs: Vec::new(),
    };
    for &(name, notation) in cases {
        let moves = parse_moves(notation)?;
        let model = case_model(&moves)?;
        if !f2l_intact(&model.signature) {
            warn!("{name} ({notation}) disturbs the first two layers, skipping");
            continue;
        }
        let ref_piece_movement = if family == CaseFamily::Pll {
            let (lead, other) = model.signature.edge_dirs(0);
            let position = match (lead, other) {
                (Dir::Up, Dir::Front) => 0,
                (Dir::Up, Dir::Right) => 1,
                (Dir::Up, Dir::Back) => 2,
                (Dir::Up, Dir::Left) => 3,
                _ => {
                    warn!("{name} ({notation}) misorients the reference edge, skipping");
                    continue;
                }
            };
            (4 - position) % 4
        } else {
            0
        };

        let grid = last_layer_grid(&model, GridEncoding::Pattern);
        let pattern = canonicalize(&grid, family);
        let names = &mut table.names;
        let case_index = *table.entries.entry(pattern.key).or_insert_with(|| {
            names.push(name);
            names.len() - 1
        });
        table.algs.push(CompiledAlgorithm {
            case_index,
            moves,
            ref_piece_movement,
            min_movements: pattern.min_movements,
        });
    }
    Ok(table)
}

fn compile_f2l() -> Result<Vec<F2lEntry>, CompileError> {
    let mut entries = Vec::with_capacity(F2L_CASES.len() * PRE_AUF.len() * 2);
    for &(name, notation) in &F2L_CASES {
        let authored = parse_moves(notation)?;
        for variant in [authored.clone(), mirror_moves(&authored)] {
            for pre in PRE_AUF {
                let mut moves = parse_moves(pre)?;
                moves.extend_from_slice(&variant);
                let model = case_model(&moves)?;
                if !cross_intact(&model.signature) {
                    warn!(
                        "{name} variant ({}) disturbs the cross, skipping",
                        format_moves(&moves)
                    );
                    continue;
                }
                entries.push(F2lEntry {
                    moves,
                    signature: model.signature.0,
                });
            }
        }
    }
    Ok(entries)
}
