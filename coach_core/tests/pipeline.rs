//! End-to-end runs through the whole engine: replay notation, interpret
//! progress, ask the advisor, execute its answer.

use coach_core::moves::parse_moves;
use coach_core::progress::{steps_completed, StepTag};
use coach_core::{Advisor, ArrayStateReader, CubeModel, Simulator};
use test_log::test;

fn model_of(sim: &Simulator) -> CubeModel {
    CubeModel::from_reader(&ArrayStateReader(sim.state())).unwrap()
}

#[test]
fn replayed_solution_reaches_the_solved_step() {
    let mut sim = Simulator::new();
    sim.apply_moves(&parse_moves("R U R' U' U R U' R'").unwrap());
    let model = model_of(&sim);
    let steps = steps_completed(&model);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].tag, StepTag::Solved);

    let advisor = Advisor::new().unwrap();
    assert!(advisor.suggest(&model).unwrap().is_empty());
}

#[test]
fn editing_the_move_list_never_changes_the_interpretation() {
    let scramble = parse_moves("R U2 F' L D B2 r M S'").unwrap();
    let mut sim = Simulator::new();
    sim.apply_moves(&scramble);

    for cut in [9, 4, 7, 0, 9] {
        let partial = scramble[..cut].to_vec();
        sim.apply_moves(&partial);
        let mut fresh = Simulator::new();
        fresh.apply_moves(&partial);
        assert_eq!(
            model_of(&sim).signature,
            model_of(&fresh).signature,
            "divergence at cut {cut}"
        );
    }
}

#[test]
fn following_suggestions_solves_single_stage_states() {
    let advisor = Advisor::new().unwrap();
    for scramble in [
        "R U2 R' U' R U' R'",   // sune case
        "M2 U' M2 U2 M2 U' M2", // H permutation
        "U2",                   // alignment only
    ] {
        let mut moves = parse_moves(scramble).unwrap();
        let mut sim = Simulator::new();
        sim.apply_moves(&moves);
        let mut model = model_of(&sim);

        for _ in 0..3 {
            if model.is_solved() {
                break;
            }
            let suggestions = advisor.suggest(&model).unwrap();
            assert!(!suggestions.is_empty(), "no help for {scramble}");
            moves.extend(parse_moves(&suggestions[0].alg).unwrap());
            sim.apply_moves(&moves);
            model = model_of(&sim);
        }
        assert!(model.is_solved(), "{scramble} not solved");
    }
}

#[test]
fn full_last_layer_needs_at_most_three_suggestions() {
    let advisor = Advisor::new().unwrap();
    // Undo a T permutation, then undo a sune: solving needs orientation,
    // permutation, and possibly a final turn.
    let mut moves =
        parse_moves("F R U' R' U R U R2 F' R U R U' R' R U2 R' U' R U' R'").unwrap();
    let mut sim = Simulator::new();
    sim.apply_moves(&moves);
    let mut model = model_of(&sim);

    let mut used = 0;
    while !model.is_solved() {
        assert!(used < 3, "still unsolved after {used} suggestions");
        let suggestions = advisor.suggest(&model).unwrap();
        let best = suggestions.first().expect("a suggestion at every stage");
        moves.extend(parse_moves(&best.alg).unwrap());
        sim.apply_moves(&moves);
        model = model_of(&sim);
        used += 1;
    }
}

#[test]
fn pair_suggestion_restores_the_full_solve_path() {
    let advisor = Advisor::new().unwrap();
    let mut moves = parse_moves("R U R' U'").unwrap();
    let mut sim = Simulator::new();
    sim.apply_moves(&moves);
    let model = model_of(&sim);

    let steps = steps_completed(&model);
    assert!(steps.iter().any(|s| s.tag == StepTag::Cross));
    assert_eq!(steps.iter().filter(|s| s.tag == StepTag::Pair).count(), 2);

    let suggestions = advisor.suggest(&model).unwrap();
    let insert = suggestions
        .iter()
        .find(|s| s.alg == "U R U' R'")
        .expect("inverse of the scramble is indexed");
    moves.extend(parse_moves(&insert.alg).unwrap());
    sim.apply_moves(&moves);
    assert!(model_of(&sim).is_solved());
}
