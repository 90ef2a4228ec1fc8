//! Ranked continuation suggestions for a live cube state. The advisor owns
//! the compiled corpus and the F2L index; callers hand it a [`CubeModel`]
//! and get back algorithms already adjusted for top-layer alignment.

use itertools::Itertools;
use log::debug;
use thiserror::Error;

use crate::canonical::{canonicalize, CaseFamily, MovementSet};
use crate::cube::Color;
use crate::index::{AlgIndex, Query, ScoreBy};
use crate::model::{CubeModel, Dir};
use crate::moves::{format_moves, BaseMove, Modifier, Move};
use crate::progress::{
    co_solved, cp_offset, eo_solved, ep_offset, last_layer_grid, pairs_solved, GridEncoding,
    PAIR_COLORS, PAIR_SLOTS,
};
use crate::tables::{CompileError, CompiledTables};

/// Preference when several pre-alignments reach the same case: no turn,
/// then U, then U', then U2.
const AUF_PREFERENCE: [u8; 4] = [0, 1, 3, 2];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SuggestError {
    #[error("no {family:?} case matches canonical key {key}")]
    UnknownCase { family: CaseFamily, key: u64 },
    #[error("reference edge for post-alignment not found")]
    ReferencePieceNotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub alg: String,
    pub estimated_cost: f64,
    pub step_label: String,
    pub case_name: Option<&'static str>,
}

pub struct Advisor {
    tables: CompiledTables,
    index: AlgIndex,
}

impl Advisor {
    /// Compile the corpus and build the F2L index.
    ///
    /// # Errors
    ///
    /// [`CompileError`] when the authored corpus fails to compile.
    pub fn new() -> Result<Advisor, CompileError> {
        let tables = CompiledTables::compile()?;
        let index = AlgIndex::build(tables.f2l.iter().map(|entry| entry.signature).collect());
        Ok(Advisor { tables, index })
    }

    /// Suggestions for the given state, cheapest first. A state before the
    /// bottom cross yields an empty list; a state whose last-layer case is
    /// missing from the corpus is an error.
    ///
    /// # Errors
    ///
    /// [`SuggestError`] for corpus misses and broken reference tracking.
    pub fn suggest(&self, model: &CubeModel) -> Result<Vec<Suggestion>, SuggestError> {
        if model.is_solved() {
            return Ok(Vec::new());
        }
        let bottom = model.orientation.effective_color(Color::Yellow);
        let Some(pairs) = pairs_solved(model, bottom) else {
            return Ok(Vec::new());
        };
        let mut suggestions = if pairs.into_iter().all(|p| p) {
            self.last_layer_suggestions(model)?
        } else {
            self.f2l_suggestions(model, pairs)
        };
        dedup_cheapest(&mut suggestions);
        Ok(suggestions)
    }

    fn f2l_suggestions(&self, model: &CubeModel, pairs: [bool; 4]) -> Vec<Suggestion> {
        let signature = &model.signature.0;
        let mut out = Vec::new();
        for (target, _) in pairs.iter().enumerate().filter(|&(_, &solved)| !solved) {
            let mut query = Query::new().score_by(ScoreBy::MustOnly);
            for slot in 4..8 {
                query = query.must(slot, signature[slot]);
            }
            for (pair, &(corner, edge)) in pairs.iter().zip(&PAIR_SLOTS) {
                if *pair {
                    query = query.must(corner, signature[corner]);
                    query = query.must(edge, signature[edge]);
                }
            }
            let (corner, edge) = PAIR_SLOTS[target];
            query = query.must(corner, signature[corner]);
            query = query.must(edge, signature[edge]);

            let hits = self.index.search(&query);
            debug!("pair {target}: {} candidate inserts", hits.len());
            let (front, side) = PAIR_COLORS[target];
            let label = format!(
                "f2l {}/{}",
                model.orientation.effective_color(front).name(),
                model.orientation.effective_color(side).name()
            );
            for hit in hits {
                let moves = &self.tables.f2l[hit.id as usize].moves;
                out.push(Suggestion {
                    alg: format_moves(moves),
                    estimated_cost: estimated_cost(moves),
                    step_label: label.clone(),
                    case_name: None,
                });
            }
        }
        out
    }

    fn last_layer_suggestions(&self, model: &CubeModel) -> Result<Vec<Suggestion>, SuggestError> {
        if !(eo_solved(model) && co_solved(model)) {
            return self.case_suggestions(model, CaseFamily::Oll);
        }
        if let (Some(edge_k), Some(corner_k)) = (ep_offset(model), cp_offset(model)) {
            if edge_k == corner_k {
                // Only the final top-layer turn remains.
                let moves = auf_moves(edge_k);
                return Ok(vec![Suggestion {
                    estimated_cost: estimated_cost(&moves),
                    alg: format_moves(&moves),
                    step_label: "auf".to_owned(),
                    case_name: None,
                }]);
            }
        }
        self.case_suggestions(model, CaseFamily::Pll)
    }

    fn case_suggestions(
        &self,
        model: &CubeModel,
        family: CaseFamily,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let grid = last_layer_grid(model, GridEncoding::Pattern);
        let live = canonicalize(&grid, family);
        let table = match family {
            CaseFamily::Oll => &self.tables.oll,
            _ => &self.tables.pll,
        };
        let (case_index, name) = table.lookup(live.key).ok_or(SuggestError::UnknownCase {
            family,
            key: live.key,
        })?;

        let label = match family {
            CaseFamily::Oll => "oll",
            _ => "pll",
        };
        let mut out = Vec::new();
        for alg in table.algorithms_for(case_index) {
            let Some(pre) = pre_alignment(live.min_movements, alg.min_movements) else {
                continue;
            };
            let mut moves = auf_moves(pre);
            moves.extend_from_slice(&alg.moves);
            if family == CaseFamily::Pll {
                let post = post_alignment(model, pre, alg.ref_piece_movement)?;
                moves.extend(auf_moves(post));
            }
            out.push(Suggestion {
                estimated_cost: estimated_cost(&moves),
                alg: format_moves(&moves),
                step_label: label.to_owned(),
                case_name: Some(name),
            });
        }
        Ok(out)
    }
}

/// The preferred number of U turns to apply before an algorithm so the live
/// pattern lines up with the pattern the algorithm was compiled against.
fn pre_alignment(live: MovementSet, alg: MovementSet) -> Option<u8> {
    let deltas: Vec<u8> = live
        .iter()
        .cartesian_product(alg.iter().collect_vec())
        .map(|(live_k, alg_k)| (live_k + 4 - alg_k) % 4)
        .collect();
    AUF_PREFERENCE.into_iter().find(|t| deltas.contains(t))
}

/// The final top-layer turn after a permutation algorithm: track which home
/// edge the algorithm carries into the front position and turn it home.
fn post_alignment(
    model: &CubeModel,
    pre: u8,
    ref_piece_movement: u8,
) -> Result<u8, SuggestError> {
    let source_position = (4 - ref_piece_movement) % 4;
    for home in 0..4u8 {
        let (lead, other) = model.signature.edge_dirs(home as usize);
        if lead != Dir::Up {
            return Err(SuggestError::ReferencePieceNotFound);
        }
        let position = match other {
            Dir::Front => 0,
            Dir::Right => 1,
            Dir::Back => 2,
            Dir::Left => 3,
            Dir::Up | Dir::Down => return Err(SuggestError::ReferencePieceNotFound),
        };
        if (position + 4 - pre) % 4 == source_position {
            return Ok((4 - home) % 4);
        }
    }
    Err(SuggestError::ReferencePieceNotFound)
}

fn auf_moves(turns: u8) -> Vec<Move> {
    let modifier = match turns % 4 {
        1 => Modifier::Single,
        2 => Modifier::Double,
        3 => Modifier::Prime,
        _ => return Vec::new(),
    };
    vec![Move {
        base: BaseMove::U,
        modifier,
    }]
}

/// Rough execution-speed estimate: weighted move count, penalized for
/// grip-breaking move families and wide generator sets.
fn estimated_cost(moves: &[Move]) -> f64 {
    let mut sum = 0.0;
    let mut any_rotation = false;
    for mv in moves {
        let base = if mv.base.is_rotation() {
            any_rotation = true;
            1.2
        } else if mv.base.is_slice() {
            1.6
        } else if mv.base.is_wide() {
            1.35
        } else {
            1.0
        };
        let modifier = match mv.modifier {
            Modifier::Single => 1.0,
            Modifier::Prime => 1.08,
            Modifier::Double => 1.45,
        };
        sum += base * modifier;
    }
    let generators = moves.iter().map(|mv| mv.base).unique().count();
    let mut cost = sum * 1.1f64.powi(generators as i32);
    if any_rotation {
        cost *= 1.4;
    }
    cost
}

fn dedup_cheapest(suggestions: &mut Vec<Suggestion>) {
    suggestions.sort_by(|a, b| {
        a.alg
            .cmp(&b.alg)
            .then(a.estimated_cost.total_cmp(&b.estimated_cost))
    });
    suggestions.dedup_by(|next, kept| next.alg == kept.alg);
    suggestions.sort_by(|a, b| {
        a.estimated_cost
            .total_cmp(&b.estimated_cost)
            .then(a.alg.cmp(&b.alg))
    });
}
