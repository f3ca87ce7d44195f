use epsflow_core::{FlowGraph, GenericMinCostFlow, ReverseArcGraph, SolverOptions, Status};

fn build_solver<'a>(
    graph: &'a ReverseArcGraph,
    capacities: &[i64],
    costs: &[i64],
    supplies: &[i64],
    options: SolverOptions,
) -> GenericMinCostFlow<'a, ReverseArcGraph> {
    let mut solver = GenericMinCostFlow::new(graph, options);
    for (arc, (&capacity, &cost)) in capacities.iter().zip(costs.iter()).enumerate() {
        solver.set_arc_capacity(arc, capacity);
        solver.set_arc_unit_cost(arc, cost);
    }
    for (node, &supply) in supplies.iter().enumerate() {
        solver.set_node_supply(node, supply);
    }
    solver
}

#[test]
fn routes_a_single_arc_at_face_value() {
    let graph = ReverseArcGraph::from_arcs(2, &[(0, 1)]).unwrap();
    let mut solver = build_solver(&graph, &[5], &[3], &[5, -5], SolverOptions::default());
    assert!(solver.solve());
    assert_eq!(solver.status(), Status::Optimal);
    assert_eq!(solver.flow(0), 5);
    assert_eq!(solver.optimal_cost(), 15);
}

#[test]
fn picks_the_cheaper_of_two_parallel_arcs() {
    let graph = ReverseArcGraph::from_arcs(2, &[(0, 1), (0, 1)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[3, 3],
        &[2, 5],
        &[3, -3],
        SolverOptions::default(),
    );
    assert!(solver.solve());
    assert_eq!(solver.flow(0), 3);
    assert_eq!(solver.flow(1), 0);
    assert_eq!(solver.optimal_cost(), 6);
}

#[test]
fn splits_flow_when_the_cheap_route_fills_up() {
    let graph = ReverseArcGraph::from_arcs(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[2, 2, 2, 2],
        &[1, 4, 1, 1],
        &[3, 0, 0, -3],
        SolverOptions::default(),
    );
    assert!(solver.solve());
    assert_eq!(solver.flow(0), 2);
    assert_eq!(solver.flow(1), 1);
    assert_eq!(solver.flow(2), 2);
    assert_eq!(solver.flow(3), 1);
    assert_eq!(solver.optimal_cost(), 9);

    // Conservation at the interior nodes.
    assert_eq!(solver.flow(0), solver.flow(2));
    assert_eq!(solver.flow(1), solver.flow(3));
    assert_eq!(solver.supply(1), 0);
    assert_eq!(solver.supply(2), 0);
}

#[test]
fn unbalanced_supplies_are_rejected_without_solving() {
    let graph = ReverseArcGraph::from_arcs(2, &[(0, 1)]).unwrap();
    let mut solver = build_solver(&graph, &[5], &[1], &[1, 0], SolverOptions::default());
    assert!(!solver.solve());
    assert_eq!(solver.status(), Status::Unbalanced);
    assert_eq!(solver.flow(0), 0);
}

#[test]
fn oversized_costs_are_rejected_before_scaling() {
    let graph = ReverseArcGraph::from_arcs(3, &[(0, 1)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[1],
        &[1_i64 << 62],
        &[0, 0, 0],
        SolverOptions::default(),
    );
    assert!(!solver.solve());
    assert_eq!(solver.status(), Status::BadCostRange);
}

#[test]
fn flow_is_antisymmetric_across_the_arc_pair() {
    let graph = ReverseArcGraph::from_arcs(3, &[(0, 1), (1, 2)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[4, 4],
        &[2, 3],
        &[4, 0, -4],
        SolverOptions::default(),
    );
    assert!(solver.solve());
    for arc in 0..graph.num_arcs() {
        assert_eq!(solver.flow(arc), -solver.flow(graph.opposite(arc)));
    }
}

#[test]
fn reported_cost_matches_a_recomputation_from_flows() {
    let graph =
        ReverseArcGraph::from_arcs(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (1, 4)]).unwrap();
    let capacities = [7, 4, 6, 4, 9, 2];
    let costs = [3, 1, 2, 6, 1, 10];
    let supplies = [8, 0, 0, 0, -8];
    let mut solver = build_solver(
        &graph,
        &capacities,
        &costs,
        &supplies,
        SolverOptions::default(),
    );
    assert!(solver.solve());
    let recomputed: i64 = (0..capacities.len())
        .map(|arc| solver.flow(arc) * costs[arc])
        .sum();
    assert_eq!(solver.optimal_cost(), recomputed);
    for (arc, &capacity) in capacities.iter().enumerate() {
        assert!(solver.flow(arc) >= 0);
        assert!(solver.flow(arc) <= capacity);
    }
}

#[test]
fn keeps_a_profitable_circulation() {
    // 0 -> 1 pays 5 per unit, coming back costs 1: circulating the full
    // capacity is optimal even with zero supplies everywhere.
    let graph = ReverseArcGraph::from_arcs(2, &[(0, 1), (1, 0)]).unwrap();
    let mut solver = build_solver(&graph, &[3, 3], &[-5, 1], &[0, 0], SolverOptions::default());
    assert!(solver.solve());
    assert_eq!(solver.flow(0), 3);
    assert_eq!(solver.flow(1), 3);
    assert_eq!(solver.optimal_cost(), -12);
}

#[test]
fn zero_supplies_and_positive_costs_move_nothing() {
    let graph = ReverseArcGraph::from_arcs(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[5, 5, 5],
        &[1, 1, 1],
        &[0, 0, 0],
        SolverOptions::default(),
    );
    assert!(solver.solve());
    for arc in 0..3 {
        assert_eq!(solver.flow(arc), 0);
    }
    assert_eq!(solver.optimal_cost(), 0);
}

#[test]
fn price_update_toggle_changes_speed_not_cost() {
    let (arcs, capacities, costs, supplies) = ladder_instance();
    let graph = ReverseArcGraph::from_arcs(supplies.len(), &arcs).unwrap();

    let mut with_updates = build_solver(
        &graph,
        &capacities,
        &costs,
        &supplies,
        SolverOptions::default(),
    );
    assert!(with_updates.solve());

    let mut without_updates = build_solver(
        &graph,
        &capacities,
        &costs,
        &supplies,
        SolverOptions {
            use_price_update: false,
            ..SolverOptions::default()
        },
    );
    assert!(without_updates.solve());

    assert_eq!(with_updates.optimal_cost(), without_updates.optimal_cost());
}

#[test]
fn alpha_only_affects_the_phase_count() {
    let (arcs, capacities, costs, supplies) = ladder_instance();
    let graph = ReverseArcGraph::from_arcs(supplies.len(), &arcs).unwrap();

    let mut coarse = build_solver(
        &graph,
        &capacities,
        &costs,
        &supplies,
        SolverOptions::default(),
    );
    assert!(coarse.solve());

    let mut fine = build_solver(
        &graph,
        &capacities,
        &costs,
        &supplies,
        SolverOptions {
            alpha: 2,
            ..SolverOptions::default()
        },
    );
    assert!(fine.solve());

    assert_eq!(coarse.optimal_cost(), fine.optimal_cost());
    assert!(fine.stats().refines >= coarse.stats().refines);
}

#[test]
fn resolve_after_mutation_tracks_the_new_costs() {
    let graph = ReverseArcGraph::from_arcs(2, &[(0, 1), (0, 1)]).unwrap();
    let mut solver = build_solver(
        &graph,
        &[3, 3],
        &[2, 5],
        &[3, -3],
        SolverOptions::default(),
    );
    assert!(solver.solve());
    assert_eq!(solver.flow(0), 3);

    // Make the first arc the expensive one and solve again.
    solver.set_arc_unit_cost(0, 9);
    assert_eq!(solver.status(), Status::NotSolved);
    assert!(solver.solve());
    assert_eq!(solver.flow(0), 0);
    assert_eq!(solver.flow(1), 3);
    assert_eq!(solver.optimal_cost(), 15);
}

// A ladder of parallel two-arc hops with mixed costs, big enough to trigger
// relabels and price updates.
fn ladder_instance() -> (Vec<(usize, usize)>, Vec<i64>, Vec<i64>, Vec<i64>) {
    let rungs = 12;
    let mut arcs = Vec::new();
    let mut capacities = Vec::new();
    let mut costs = Vec::new();
    for step in 0..rungs {
        arcs.push((step, step + 1));
        capacities.push(10);
        costs.push(1 + (step as i64 % 4) * 3);
        arcs.push((step, step + 1));
        capacities.push(4);
        costs.push((step as i64 % 3) + 1);
    }
    let mut supplies = vec![0_i64; rungs + 1];
    supplies[0] = 9;
    supplies[rungs] = -9;
    (arcs, capacities, costs, supplies)
}
