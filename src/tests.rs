#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use itertools::Itertools;
    use ndarray::arr2;
    use proptest::prelude::*;
    use strum::VariantArray;

    use crate::builder::{BuilderInvalidReason, GraphBuilder};
    use crate::game::{greedy, DollarGame, Strategy};
    use crate::gonality::{gonality, gonality_bounds, is_winning_placement, play_gonality_game};
    use crate::solids::{complete_graph, cycle_graph, path_graph, PlatonicSolid};
    use crate::{ewd, is_q_reduced, is_winnable, linear_equivalence, q_reduced_at, q_reduction, rank, rank_at_most};
    use crate::{ChipFiringError, ChipGraph, Chips, DharAlgorithm, Divisor, FiringScript, Laplacian, Orientation, OrientationState};

    // a 4-cycle Alice-Bob-Charlie-Elise, with Alice-Elise doubled and a chord Alice-Charlie
    fn friends() -> ChipGraph {
        GraphBuilder::with_vertices(["Alice", "Bob", "Charlie", "Elise"])
            .add_edges([
                ("Alice", "Bob", 1),
                ("Bob", "Charlie", 1),
                ("Charlie", "Elise", 1),
                ("Elise", "Alice", 2),
                ("Alice", "Charlie", 1),
            ])
            .build()
            .unwrap()
    }

    fn triangle() -> ChipGraph {
        GraphBuilder::with_vertices(["v1", "v2", "v3"])
            .add_edges([("v1", "v2", 1), ("v2", "v3", 1), ("v1", "v3", 1)])
            .build()
            .unwrap()
    }

    fn friends_debt(graph: &ChipGraph) -> Divisor<'_> {
        Divisor::new(graph, &[("Alice", 2), ("Bob", -3), ("Charlie", 4), ("Elise", -1)]).unwrap()
    }

    fn on<'g>(graph: &'g ChipGraph, chips: &[Chips]) -> Divisor<'g> {
        let names = graph.vertices().collect_vec();
        let pairs = names.iter().copied().zip(chips.iter().copied()).collect_vec();
        Divisor::new(graph, &pairs).unwrap()
    }

    #[test]
    fn builder_rejects_bad_edges() {
        let mut builder = GraphBuilder::with_vertices(["a", "b"]);
        builder.add_edge("a", "a", 1);
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::SelfLoop("a".to_string())]));
        // further calls are ignored once invalid
        builder.add_edge("a", "c", 1);
        assert_eq!(builder.build().unwrap_err().len(), 1);

        let mut builder = GraphBuilder::with_vertices(["a", "b"]);
        builder.add_edge("a", "b", 0);
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::ZeroMultiplicity("a".to_string(), "b".to_string())]);

        let mut builder = GraphBuilder::with_vertices(["a", "b"]);
        builder.add_edge("a", "z", 1);
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::UnknownVertex("z".to_string())]);
    }

    #[test]
    fn builder_rejects_empty_and_disconnected() {
        assert_eq!(GraphBuilder::new().build().unwrap_err(), &vec![BuilderInvalidReason::NoVertices]);

        let mut builder = GraphBuilder::with_vertices(["a", "b", "c"]);
        builder.add_edge("a", "b", 1);
        let reasons = builder.build().unwrap_err();
        assert_eq!(reasons, &vec![BuilderInvalidReason::Disconnected]);
        assert_eq!(format!("{}", reasons[0]), "graph is not connected");

        // a single vertex is connected
        assert!(GraphBuilder::with_vertices(["lonely"]).build().is_ok());
    }

    #[test]
    fn builder_accumulates_parallel_edges() {
        let graph = GraphBuilder::with_vertices(["a", "b"])
            .add_edge("a", "b", 1)
            .add_edge("b", "a", 2)
            .build()
            .unwrap();

        assert_eq!(graph.multiplicity("a", "b").unwrap(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.genus(), 2);
    }

    #[test]
    fn graph_queries() {
        let graph = friends();

        assert_eq!(graph.vertices().collect_vec(), vec!["Alice", "Bob", "Charlie", "Elise"]);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.genus(), 3);
        assert_eq!(graph.valence("Alice").unwrap(), 4);
        assert_eq!(graph.valence("Bob").unwrap(), 2);
        assert_eq!(graph.multiplicity("Bob", "Elise").unwrap(), 0);
        assert_eq!(graph.neighbors_with_weights("Alice").unwrap(), vec![("Bob", 1), ("Charlie", 1), ("Elise", 2)]);
        assert_eq!(graph.min_neighbor_count(), 2);
        assert_eq!(graph.valence("Zed"), Err(ChipFiringError::UnknownVertex("Zed".to_string())));

        assert_eq!(graph, friends());
        assert_ne!(graph, triangle());
    }

    #[test]
    fn divisor_construction() {
        let graph = friends();
        let divisor = friends_debt(&graph);

        assert_eq!(divisor.total_degree(), 2);
        assert!(!divisor.is_effective());
        assert_eq!(divisor.degree("Charlie").unwrap(), 4);
        assert_eq!(format!("{}", divisor), "{Alice: 2, Bob: -3, Charlie: 4, Elise: -1}");

        assert_eq!(
            Divisor::new(&graph, &[("Alice", 1), ("Alice", 2)]).unwrap_err(),
            ChipFiringError::DuplicateVertex("Alice".to_string()),
        );
        assert_eq!(
            Divisor::new(&graph, &[("Dave", 1)]).unwrap_err(),
            ChipFiringError::UnknownVertex("Dave".to_string()),
        );

        // unmentioned vertices start at zero
        let sparse = Divisor::new(&graph, &[("Bob", 5)]).unwrap();
        assert_eq!(sparse.to_vec(), vec![0, 5, 0, 0]);
        let mut sparse = sparse;
        sparse.set_degree("Elise", -2).unwrap();
        assert_eq!(sparse.iter().collect_vec(), vec![("Alice", 0), ("Bob", 5), ("Charlie", 0), ("Elise", -2)]);

        assert_eq!(Divisor::canonical(&graph).to_vec(), vec![2, 0, 1, 1]);
        assert_eq!(Divisor::canonical(&graph).total_degree(), 2 * graph.genus() - 2);
    }

    #[test]
    fn divisor_moves() {
        let graph = friends();
        let mut divisor = friends_debt(&graph);

        divisor.lend("Alice").unwrap();
        assert_eq!(divisor.to_vec(), vec![-2, -2, 5, 1]);
        divisor.borrow("Alice").unwrap();
        assert_eq!(divisor, friends_debt(&graph));

        divisor.fire_set(["Alice", "Elise", "Charlie"]).unwrap();
        assert_eq!(divisor.to_vec(), vec![1, -1, 3, -1]);
        divisor.fire_set(["Alice", "Elise", "Charlie"]).unwrap();
        assert_eq!(divisor.to_vec(), vec![0, 1, 2, -1]);
        assert_eq!(divisor.total_degree(), 2);

        divisor.borrow_set(["Alice", "Elise", "Charlie"]).unwrap();
        assert_eq!(divisor.to_vec(), vec![1, -1, 3, -1]);

        assert_eq!(divisor.lend("Dave"), Err(ChipFiringError::UnknownVertex("Dave".to_string())));
    }

    #[test]
    fn divisor_arithmetic() {
        let graph = triangle();
        let a = on(&graph, &[2, 0, 0]);
        let b = on(&graph, &[0, 1, 1]);

        assert_eq!((&a - &b).to_vec(), vec![2, -1, -1]);
        assert_eq!((&a + &b).to_vec(), vec![2, 1, 1]);
        assert_eq!((-&a).to_vec(), vec![-2, 0, 0]);

        let path = path_graph(3).unwrap();
        let elsewhere = Divisor::zero(&path);
        assert_eq!(a.checked_add(&elsewhere), Err(ChipFiringError::GraphMismatch));

        // structurally equal graphs are interchangeable
        let twin = triangle();
        assert_eq!(a, on(&twin, &[2, 0, 0]));
    }

    #[test]
    fn orientation_states() {
        let graph = triangle();
        let mut orientation = Orientation::from_pairs(&graph, &[("v1", "v2"), ("v2", "v3")]).unwrap();

        assert_eq!(orientation.state("v1", "v2").unwrap(), OrientationState::SourceToSink);
        assert_eq!(orientation.state("v2", "v1").unwrap(), OrientationState::SinkToSource);
        assert_eq!(orientation.state("v1", "v3").unwrap(), OrientationState::NoOrientation);
        assert_eq!(orientation.get_orientation("v3", "v2").unwrap(), Some(("v2", "v3")));
        assert_eq!(orientation.get_orientation("v3", "v1").unwrap(), None);
        assert_eq!(orientation.is_source("v1", "v2").unwrap(), Some(true));
        assert_eq!(orientation.is_sink("v1", "v2").unwrap(), Some(false));
        assert_eq!(orientation.is_source("v1", "v3").unwrap(), None);
        assert_eq!(orientation.in_degree("v2").unwrap(), 1);
        assert_eq!(orientation.out_degree("v2").unwrap(), 1);
        assert!(!orientation.is_full());

        // same direction again is fine, the other direction is not
        orientation.set_orientation("v1", "v2").unwrap();
        assert_eq!(
            orientation.set_orientation("v2", "v1"),
            Err(ChipFiringError::OrientationConflict("v2".to_string(), "v1".to_string())),
        );

        orientation.set_orientation("v1", "v3").unwrap();
        assert!(orientation.is_full());
        assert_eq!(orientation.oriented_edges(), vec![("v1", "v2"), ("v1", "v3"), ("v2", "v3")]);
        assert_eq!(orientation.divisor().to_vec(), vec![-1, 0, 1]);
        assert_eq!(orientation.reversed().divisor().to_vec(), vec![1, 0, -1]);
        assert_eq!(orientation.canonical_divisor(), Divisor::canonical(&graph));
    }

    #[test]
    fn orientation_rejects_non_edges() {
        let graph = path_graph(3).unwrap();
        let mut orientation = Orientation::new(&graph);

        assert_eq!(
            orientation.set_orientation("v0", "v2"),
            Err(ChipFiringError::UnknownEdge("v0".to_string(), "v2".to_string())),
        );
        assert_eq!(
            orientation.state("v0", "nowhere"),
            Err(ChipFiringError::UnknownEdge("v0".to_string(), "nowhere".to_string())),
        );
        // partial orientations fall back to valences
        assert_eq!(orientation.canonical_divisor().to_vec(), vec![-1, 0, -1]);
    }

    #[test]
    fn laplacian_matrix() {
        let graph = GraphBuilder::with_vertices(["a", "b", "c"])
            .add_edges([("a", "b", 2), ("b", "c", 3)])
            .build()
            .unwrap();
        let laplacian = Laplacian::from(&graph);

        assert_eq!(laplacian.matrix(), &arr2(&[[2i64, -2, 0], [-2, 5, -3], [0, -3, 3]]));
        assert_eq!(laplacian.entry("b", "c").unwrap(), -3);

        let script = FiringScript::from_set(&graph, ["b"]).unwrap();
        let fired = laplacian.apply(&Divisor::zero(&graph), &script).unwrap();
        assert_eq!(fired.to_vec(), vec![2, -5, 3]);

        let mut by_hand = Divisor::zero(&graph);
        by_hand.lend("b").unwrap();
        assert_eq!(fired, by_hand);

        let twice = &script + &FiringScript::from_set(&graph, ["b", "c"]).unwrap();
        assert_eq!(twice.firings("b").unwrap(), 2);
        assert_eq!(laplacian.apply(&Divisor::zero(&graph), &twice).unwrap().to_vec(), vec![4, -7, 3]);

        assert!(FiringScript::new(&graph, &[("a", 4), ("b", 4), ("c", 4)]).unwrap().is_trivial());
        assert_eq!(
            FiringScript::new(&graph, &[("a", 1), ("a", 1)]).unwrap_err(),
            ChipFiringError::DuplicateVertex("a".to_string()),
        );
    }

    #[test]
    fn laplacian_matches_moves() {
        let graph = friends();
        let laplacian = Laplacian::from(&graph);
        let mut divisor = friends_debt(&graph);

        let script = FiringScript::new(&graph, &[("Alice", 2), ("Charlie", 2), ("Elise", 2)]).unwrap();
        let expected = laplacian.apply(&divisor, &script).unwrap();

        divisor.fire_set(["Alice", "Elise", "Charlie"]).unwrap();
        divisor.fire_set(["Alice", "Elise", "Charlie"]).unwrap();
        assert_eq!(divisor, expected);

        let other = triangle();
        assert_eq!(
            laplacian.apply(&Divisor::zero(&other), &FiringScript::empty(&graph)),
            Err(ChipFiringError::GraphMismatch),
        );
    }

    #[test]
    fn send_debt_to_q() {
        let graph = friends();
        let mut dhar = DharAlgorithm::new(&friends_debt(&graph), "Bob").unwrap();

        dhar.send_debt_to_q();
        assert_eq!(dhar.configuration().to_vec(), vec![0, -3, 3, 2]);
        assert_eq!(dhar.script().firings("Elise").unwrap(), -1);

        assert!(DharAlgorithm::new(&friends_debt(&graph), "Dave").is_err());
    }

    #[test]
    fn dhar_burn() {
        let graph = friends();
        let mut dhar = DharAlgorithm::new(&friends_debt(&graph), "Bob").unwrap();
        assert_eq!(dhar.q(), "Bob");

        let (firing_set, orientation) = dhar.run();
        let names = firing_set.iter().map(|v| graph.vertex_name(*v)).collect_vec();
        assert_eq!(names, vec!["Charlie", "Elise"]);
        // only Alice caught fire, from Bob
        assert_eq!(orientation.oriented_edges(), vec![("Bob", "Alice")]);

        dhar.legal_set_fire(&firing_set);
        assert_eq!(dhar.configuration().to_vec(), vec![3, -2, 1, 0]);
        assert_eq!(dhar.configuration().total_degree(), 2);
    }

    #[test]
    fn dhar_burn_is_repeatable() {
        let graph = PlatonicSolid::Cube.graph();
        let divisor = on(&graph, &[1, 0, 2, -1, 0, 3, 0, -2]);

        for q in graph.vertices() {
            let (first_set, first_orientation) = DharAlgorithm::new(&divisor, q).unwrap().run();
            let (second_set, second_orientation) = DharAlgorithm::new(&divisor, q).unwrap().run();

            assert_eq!(first_set, second_set, "q = {q}");
            assert_eq!(first_orientation.oriented_edges(), second_orientation.oriented_edges(), "q = {q}");
        }

        // separately built copies of a graph burn identically
        let (one, other) = (friends(), friends());
        let (first_set, first_orientation) = DharAlgorithm::new(&friends_debt(&one), "Bob").unwrap().run();
        let (second_set, second_orientation) = DharAlgorithm::new(&friends_debt(&other), "Bob").unwrap().run();
        assert_eq!(first_set, second_set);
        assert_eq!(first_orientation.oriented_edges(), second_orientation.oriented_edges());
    }

    #[test]
    fn ewd_reduces_friends() {
        let graph = friends();
        let divisor = friends_debt(&graph);
        let outcome = ewd(&divisor, false);

        assert!(outcome.winnable);
        assert_eq!(outcome.q, graph.vertex_index("Bob"));
        let reduced = outcome.reduced.unwrap();
        assert_eq!(reduced.to_vec(), vec![2, 0, 0, 0]);

        let orientation = outcome.orientation.unwrap();
        assert!(orientation.is_full());
        assert_eq!(orientation.divisor().total_degree(), graph.genus() - 1);

        let script = outcome.script.unwrap();
        assert_eq!(script.firings("Alice").unwrap(), 1);
        assert_eq!(script.firings("Bob").unwrap(), 0);
        assert_eq!(script.firings("Charlie").unwrap(), 2);
        assert_eq!(script.firings("Elise").unwrap(), 1);
        assert_eq!(Laplacian::from(&graph).apply(&divisor, &script).unwrap(), reduced);

        assert!(is_winnable(&divisor));
        assert_eq!(q_reduction(&divisor), reduced);
        assert!(is_q_reduced(&reduced));
        assert!(!is_q_reduced(&divisor));
    }

    #[test]
    fn ewd_shortcuts() {
        let graph = triangle();

        let rich = on(&graph, &[3, -1, -1]);
        let outcome = ewd(&rich, true);
        assert!(outcome.winnable);
        assert!(outcome.reduced.is_none());
        assert!(outcome.q.is_none());
        assert!(ewd(&rich, false).winnable);

        let poor = on(&graph, &[1, -1, -1]);
        let outcome = ewd(&poor, true);
        assert!(!outcome.winnable);
        assert!(outcome.script.is_none());
        assert!(!ewd(&poor, false).winnable);
    }

    #[test]
    fn q_reduced_at_named_vertex() {
        let graph = triangle();
        let divisor = on(&graph, &[2, 0, 0]);

        assert_eq!(q_reduced_at(&divisor, "v1").unwrap().to_vec(), vec![2, 0, 0]);
        assert_eq!(q_reduced_at(&divisor, "v2").unwrap().to_vec(), vec![0, 1, 1]);
        assert!(q_reduced_at(&divisor, "v9").is_err());

        assert!(is_q_reduced(&on(&graph, &[0, 1, 1])));
        // reduced with respect to v2, but the fewest chips sit on v1
        assert_eq!(q_reduction(&on(&graph, &[0, 1, 1])).to_vec(), vec![2, 0, 0]);
        assert!(is_q_reduced(&on(&graph, &[-2, 0, 0])));
        assert!(!is_q_reduced(&on(&graph, &[1, 1, 1])));
        assert!(!is_q_reduced(&on(&graph, &[-1, -1, 3])));
    }

    #[test]
    fn linear_equivalences() {
        let graph = triangle();

        assert!(linear_equivalence(&on(&graph, &[2, 0, 0]), &on(&graph, &[0, 1, 1])));
        assert!(linear_equivalence(&on(&graph, &[1, 0, 0]), &on(&graph, &[1, 0, 0])));
        assert!(!linear_equivalence(&on(&graph, &[1, 0, 0]), &on(&graph, &[0, 1, 0])));
        assert!(!linear_equivalence(&on(&graph, &[1, 0, 0]), &on(&graph, &[1, 1, 0])));

        let path = path_graph(3).unwrap();
        assert!(!linear_equivalence(&on(&graph, &[1, 0, 0]), &on(&path, &[1, 0, 0])));
    }

    #[test]
    fn ranks_on_triangle() {
        let graph = triangle();

        assert_eq!(rank(&on(&graph, &[1, 0, 0])), 0);
        assert_eq!(rank(&on(&graph, &[1, 1, 1])), 2);
        assert_eq!(rank(&on(&graph, &[0, 0, 0])), 0);
        assert_eq!(rank(&on(&graph, &[-1, 0, 0])), -1);
        assert_eq!(rank(&on(&graph, &[0, 1, -1])), -1);
        assert_eq!(rank_at_most(&on(&graph, &[1, 1, 1]), 1), 1);
    }

    fn assert_riemann_roch(graph: &ChipGraph, chips: impl Iterator<Item=Chips> + Clone) {
        let canonical = Divisor::canonical(graph);
        for values in (0..graph.vertex_count()).map(|_| chips.clone()).multi_cartesian_product() {
            let divisor = on(graph, &values);
            let residual = &canonical - &divisor;
            assert_eq!(
                rank(&divisor) - rank(&residual),
                divisor.total_degree() - graph.genus() + 1,
                "Riemann-Roch fails for {divisor}",
            );
        }
    }

    #[test]
    fn riemann_roch() {
        assert_riemann_roch(&triangle(), -1..=2);
        assert_riemann_roch(&complete_graph(4).unwrap(), -1..=1);
        assert_riemann_roch(&cycle_graph(4).unwrap(), -1..=1);
        assert_riemann_roch(&cycle_graph(2).unwrap(), -2..=2);
        assert_riemann_roch(&friends(), 0..=1);
    }

    #[test]
    fn gonality_game() {
        let graph = complete_graph(4).unwrap();
        let placement = on(&graph, &[1, 1, 1, 0]);

        let round = play_gonality_game(&placement, "v3").unwrap();
        assert!(round.player_a_wins);
        assert_eq!(round.final_divisor.to_vec(), vec![1, 1, 1, -1]);
        assert!(is_winning_placement(&placement));

        assert!(!is_winning_placement(&on(&graph, &[2, 0, 0, 0])));
        assert_eq!(play_gonality_game(&on(&graph, &[2, -1, 0, 0]), "v0").unwrap_err(), ChipFiringError::NotEffective);
        assert!(play_gonality_game(&placement, "v7").is_err());
    }

    #[test]
    fn gonality_of_solids() {
        let tetrahedron = PlatonicSolid::Tetrahedron.graph();
        assert_eq!(gonality_bounds(&tetrahedron), 3..=4);
        let result = gonality(&tetrahedron);
        assert_eq!(result.gonality, 3);
        assert_eq!(result.winning_placement.total_degree(), 3);
        assert!(is_winning_placement(&result.winning_placement));

        assert_eq!(gonality(&PlatonicSolid::Octahedron.graph()).gonality, 4);
        assert_eq!(gonality(&PlatonicSolid::Cube.graph()).gonality, 4);
    }

    #[test]
    fn gonality_of_trees_and_cycles() {
        assert_eq!(gonality(&path_graph(5).unwrap()).gonality, 1);
        assert_eq!(gonality(&GraphBuilder::with_vertices(["only"]).build().unwrap()).gonality, 1);
        assert_eq!(gonality(&cycle_graph(5).unwrap()).gonality, 2);
    }

    #[test]
    fn solid_shapes() {
        for (solid, vertices, edges, valence) in [
            (PlatonicSolid::Tetrahedron, 4, 6, 3),
            (PlatonicSolid::Cube, 8, 12, 3),
            (PlatonicSolid::Octahedron, 6, 12, 4),
            (PlatonicSolid::Dodecahedron, 20, 30, 3),
            (PlatonicSolid::Icosahedron, 12, 30, 5),
        ] {
            let graph = solid.graph();
            assert_eq!(graph.vertex_count(), vertices, "{solid}");
            assert_eq!(graph.edge_count(), edges, "{solid}");
            assert!(graph.vertices().all(|v| graph.valence(v).unwrap() == valence), "{solid}");
        }

        assert_eq!(PlatonicSolid::VARIANTS.len(), 5);
        assert_eq!(OrientationState::VARIANTS.len(), 3);
        assert_eq!(PlatonicSolid::from_str("cube").unwrap(), PlatonicSolid::Cube);
        assert_eq!(complete_graph(0).unwrap_err(), vec![BuilderInvalidReason::NoVertices]);
        assert_eq!(cycle_graph(1).unwrap_err(), vec![BuilderInvalidReason::SelfLoop("v0".to_string())]);
    }

    #[test]
    fn dollar_game() {
        let graph = friends();
        let game = DollarGame::new(friends_debt(&graph));

        for strategy in Strategy::VARIANTS {
            let script = game.play(*strategy).unwrap();
            assert!(game.apply(&script).is_effective(), "{strategy}");
        }

        let triangle = triangle();
        let hopeless = DollarGame::new(on(&triangle, &[-1, 0, 0]));
        assert!(hopeless.play(Strategy::Greedy).is_none());
        assert!(hopeless.play(Strategy::Dhar).is_none());

        assert_eq!(Strategy::from_str("greedy").unwrap(), Strategy::Greedy);
        assert_eq!(Strategy::Dhar.to_string(), "dhar");
    }

    proptest! {
        #[test]
        fn moves_conserve_degree(chips in prop::collection::vec(-5i64..=5, 4), set in prop::collection::vec(any::<bool>(), 4)) {
            let graph = friends();
            let mut divisor = on(&graph, &chips);
            let names = graph.vertices().zip(set).filter(|(_, chosen)| *chosen).map(|(name, _)| name).collect_vec();

            divisor.fire_set(names.iter().copied()).unwrap();
            prop_assert_eq!(divisor.total_degree(), chips.iter().sum::<Chips>());
            divisor.borrow_set(names.iter().copied()).unwrap();
            prop_assert_eq!(divisor.to_vec(), chips);
        }

        #[test]
        fn reduction_is_stable(chips in prop::collection::vec(-4i64..=4, 4)) {
            let graph = friends();
            let divisor = on(&graph, &chips);

            let reduced = q_reduction(&divisor);
            prop_assert!(is_q_reduced(&reduced));
            prop_assert_eq!(reduced.total_degree(), divisor.total_degree());
            prop_assert!(linear_equivalence(&divisor, &reduced));

            let at_bob = q_reduced_at(&divisor, "Bob").unwrap();
            prop_assert_eq!(q_reduced_at(&at_bob, "Bob").unwrap(), at_bob.clone());
            prop_assert!(at_bob.iter().filter(|(name, _)| *name != "Bob").all(|(_, chips)| chips >= 0));
        }

        #[test]
        fn script_explains_reduction(chips in prop::collection::vec(-4i64..=4, 4)) {
            let graph = friends();
            let divisor = on(&graph, &chips);
            let outcome = ewd(&divisor, false);

            let script = outcome.script.unwrap();
            prop_assert_eq!(Laplacian::from(&graph).apply(&divisor, &script).unwrap(), outcome.reduced.unwrap());
            prop_assert!(outcome.orientation.unwrap().is_full());
        }

        #[test]
        fn shortcuts_agree(chips in prop::collection::vec(-3i64..=3, 4)) {
            let graph = PlatonicSolid::Tetrahedron.graph();
            let divisor = on(&graph, &chips);
            prop_assert_eq!(ewd(&divisor, true).winnable, ewd(&divisor, false).winnable);
        }

        #[test]
        fn greedy_agrees_with_ewd(chips in prop::collection::vec(-3i64..=3, 4)) {
            let graph = friends();
            let divisor = on(&graph, &chips);

            let script = greedy(&divisor);
            prop_assert_eq!(script.is_some(), is_winnable(&divisor));
            if let Some(script) = script {
                prop_assert!(Laplacian::from(&graph).apply(&divisor, &script).unwrap().is_effective());
            }
        }
    }
}
