mod common;

use common::*;
use float_eq::*;
use ndarray::array;
use pomdp_solver::algos::model_based::mdp::ValueIteration;
use pomdp_solver::algos::model_based::pomdp::{
    cross_sum, project, IncrementalPruning, PairwisePrune, Pbvi,
};
use pomdp_solver::envs::{simple_golf::*, tiger::*};
use pomdp_solver::mdps::{self, Mdp};
use pomdp_solver::pomdps::{best_vector, make_vlist, Policy, Pomdp};
use rstest::rstest;

#[test]
fn tiger_horizon_one_has_at_most_one_vector_per_action() {
    let model = tiger(0).unwrap();
    let immediate = model.immediate_rewards();
    let base = make_vlist(model.n_s(), model.n_o());

    let unpruned: usize = (0..model.n_a())
        .map(|a| {
            let left = project(&model, &immediate, &base, a, HEAR_LEFT);
            let right = project(&model, &immediate, &base, a, HEAR_RIGHT);
            cross_sum(&left, &right, a, true).len()
        })
        .sum();
    assert_eq!(unpruned, model.n_a());

    let (_, vf) = IncrementalPruning::new(1, 0.).unwrap().solve(&model);
    assert!(vf[1].len() <= model.n_a());
}

fn tiger_mdp() -> mdps::Model {
    let t = tiger(0).unwrap();
    mdps::Model::from_tables(
        t.mdp().transition_function().clone(),
        t.mdp().reward_function().clone(),
        t.discount(),
        0,
    )
    .unwrap()
}

#[rstest]
#[case::simple_golf(simple_golf(0.9, 0).unwrap(), 12)]
#[case::tiger(tiger_mdp(), 6)]
fn fully_observable_matches_value_iteration(#[case] mdp: mdps::Model, #[case] horizon: usize) {
    let (_, mdp_vf, _) = ValueIteration::new(horizon, 0.).unwrap().solve(&mdp);
    let n_s = mdp.n_s();
    let model = fully_observable(mdp);

    // A zero variation may end the run early; the last horizon is the fixed point then.
    let (_, vf) = IncrementalPruning::new(horizon, 0.).unwrap().solve(&model);

    for (s, b) in vertices(n_s).iter().enumerate() {
        let (_, value) = best_vector(b, vf.last().unwrap()).unwrap();
        assert_float_eq!(value, mdp_vf.values[s], abs <= 1e-9);
    }
}

#[test]
fn fully_observable_greedy_actions_match_value_iteration() {
    let mdp = simple_golf(0.9, 0).unwrap();
    let (_, mdp_vf, _) = ValueIteration::new(10, 0.).unwrap().solve(&mdp);
    let model = fully_observable(simple_golf(0.9, 0).unwrap());
    let (_, vf) = IncrementalPruning::new(10, 0.).unwrap().solve(&model);

    let policy = Policy::new(vf);
    for s in [START, FAIRWAY] {
        let (action, _, _) = policy.best_action(&vertices(3)[s]).unwrap();
        assert_eq!(action, mdp_vf.actions[s]);
    }
}

#[test]
fn pbvi_on_vertices_matches_exact_when_observable() {
    let model = fully_observable(simple_golf(0.9, 0).unwrap());
    let beliefs = vertices(3);

    let (_, exact) = IncrementalPruning::new(8, 0.).unwrap().solve(&model);
    let (_, approx) = Pbvi::new(3, 8, 0.)
        .unwrap()
        .solve_with_beliefs(&model, &beliefs);

    for b in &beliefs {
        let expected = envelope(exact.last().unwrap(), b);
        assert_float_eq!(envelope(approx.last().unwrap(), b), expected, abs <= 1e-9);
    }
}

#[test]
fn pbvi_on_vertices_is_a_lower_bound_for_tiger() {
    let model = tiger(0).unwrap();
    let beliefs = vertices(2);

    let (_, exact) = IncrementalPruning::new(5, 0.).unwrap().solve(&model);
    let (_, approx) = Pbvi::new(2, 5, 0.)
        .unwrap()
        .solve_with_beliefs(&model, &beliefs);

    for t in 1..=5 {
        for b in belief_grid(2, 10) {
            assert!(envelope(&approx[t], &b) <= envelope(&exact[t], &b) + 1e-9);
        }
    }
    // One step ahead every successor belief is irrelevant.
    for b in &beliefs {
        assert_float_eq!(envelope(&approx[1], b), envelope(&exact[1], b), abs <= 1e-9);
    }
}

#[test]
fn tiger_exact_solution_listens_when_uncertain() {
    let model = tiger(0).unwrap();
    let (_, vf) = IncrementalPruning::new(8, 0.).unwrap().solve(&model);
    let policy = Policy::new(vf);

    let (action, id, _) = policy.best_action(&array![0.5, 0.5]).unwrap();
    assert_eq!(action, LISTEN);

    let (action, _, _) = policy.best_action(&array![0.99, 0.01]).unwrap();
    assert_eq!(action, OPEN_RIGHT);

    // Hearing the tiger once is not enough to open a door.
    let (action, _) = policy.follow(8, id, HEAR_LEFT).unwrap();
    assert_eq!(action, LISTEN);
}

#[test]
fn pairwise_and_witness_give_the_same_tiger_values() {
    let model = tiger(0).unwrap();
    let (_, exact) = IncrementalPruning::new(4, 0.).unwrap().solve(&model);
    let (_, loose) = IncrementalPruning::new(4, 0.)
        .unwrap()
        .with_pruner(PairwisePrune)
        .solve(&model);

    for b in belief_grid(2, 40) {
        assert_float_eq!(envelope(&exact[4], &b), envelope(&loose[4], &b), abs <= 1e-9);
    }
}
