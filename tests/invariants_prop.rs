//! Property tests for the move/elimination rules.
//!
//! Invariants covered:
//! - A move succeeds exactly when its preconditions hold, and a rejected move
//!   leaves the level untouched.
//! - Every non-empty shelf shows its top box after any move or undo.
//! - No qualifying run survives elimination, and resolving again is a no-op.
//! - Undo right after a non-clearing move restores contents and score.
//! - Occlusion never hides a top box.

use proptest::prelude::*;

use cat_shelf::core::{
    apply_move, resolve_eliminations, valid_moves, MemoryStore, MoveError, PuzzleSession,
    RuntimeLevel, SimpleRng,
};
use cat_shelf::engine::{design_level, LayoutGenerator, OcclusionAllocator, Policy, RandomPolicy};
use cat_shelf::types::{
    BoxSlot, Color, GameConfig, GameState, GoalPlacement, LayoutRequest, LevelDefinition,
    SessionConfig, ShelfDefinition, ToolCounts, ToolKind, MIN_RUN_LEN,
};

fn assert_tops_visible(level: &RuntimeLevel) {
    for (i, shelf) in level.shelves().iter().enumerate() {
        if let Some(top) = shelf.top() {
            assert!(top.color_visible, "shelf {} top hidden", i);
        }
    }
}

fn assert_no_runs(level: &RuntimeLevel) {
    for shelf in level.shelves() {
        assert!(shelf.find_run(MIN_RUN_LEN).is_none());
    }
}

fn level_strategy() -> impl Strategy<Value = LevelDefinition> {
    (2usize..=5, 2usize..=7, any::<bool>()).prop_flat_map(|(capacity, shelves, hide)| {
        let color = prop::sample::select(Color::ALL[..4].to_vec());
        let shelf = prop::collection::vec((color, any::<bool>()), 0..=capacity).prop_map(
            move |slots| ShelfDefinition {
                capacity,
                boxes: slots
                    .into_iter()
                    .map(|(c, visible)| BoxSlot {
                        color: c,
                        start_visible: visible,
                    })
                    .collect(),
            },
        );
        prop::collection::vec(shelf, shelves).prop_map(move |shelves| LevelDefinition {
            only_top_visible: hide,
            shelves,
            ..Default::default()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_moves_respect_legality(
        def in level_strategy(),
        attempts in prop::collection::vec((0usize..8, 0usize..8), 1..60),
    ) {
        let mut level = RuntimeLevel::build(&def).unwrap();
        resolve_eliminations(&mut level);
        assert_tops_visible(&level);

        for (from, to) in attempts {
            let before = level.clone();
            let legal = valid_moves(&before).iter().any(|m| m.from == from && m.to == to);
            match apply_move(&mut level, from, to) {
                Ok(applied) => {
                    prop_assert!(legal);
                    let src = before.shelf(from).unwrap();
                    let dst = before.shelf(to).unwrap();
                    prop_assert!(!src.is_empty());
                    prop_assert!(!dst.is_full());
                    if let Some(target) = dst.top_color() {
                        prop_assert_eq!(Some(target), src.top_color());
                    }
                    prop_assert_eq!(Some(applied.box_id), src.top().map(|b| b.id));
                    prop_assert_eq!(
                        level.total_boxes() + applied.elimination.boxes_cleared(),
                        before.total_boxes()
                    );
                }
                Err(err) => {
                    prop_assert!(!legal, "legal move rejected: {:?}", err);
                    prop_assert_eq!(&level, &before);
                }
            }
            assert_tops_visible(&level);
            assert_no_runs(&level);

            let settled = level.clone();
            let again = resolve_eliminations(&mut level);
            prop_assert!(again.is_empty());
            prop_assert_eq!(&level, &settled);
        }
    }

    #[test]
    fn session_play_keeps_invariants(
        seed in any::<u64>(),
        hidden in 0.0f64..=1.0,
        steps in 1usize..80,
    ) {
        let config = GameConfig::default();
        let request = LayoutRequest { hidden_fraction: hidden, ..config.layout };
        let generator = LayoutGenerator::from_config(&config);
        let designed = design_level(&generator, &request, &mut SimpleRng::new(seed)).unwrap();

        let session_config = SessionConfig {
            starting_tools: ToolCounts { undo: 1_000, ..Default::default() },
            ..config.session
        };
        let mut session = PuzzleSession::new(session_config, MemoryStore::new(), seed);
        session
            .try_start_level(&designed.definition, GoalPlacement::Random, 0)
            .unwrap();
        let mut policy = RandomPolicy::new(SimpleRng::stream(seed, 1));

        for _ in 0..steps {
            if session.state() != GameState::Playing {
                break;
            }
            let level = session.level().unwrap().clone();
            let Some(mv) = policy.choose_move(&level) else {
                break;
            };
            let outcome = session.try_move_top_box(mv.from, mv.to).unwrap();
            assert_tops_visible(session.level().unwrap());
            assert_no_runs(session.level().unwrap());

            if outcome.elimination.is_empty() && outcome.state == GameState::Playing {
                session.use_tool(ToolKind::Undo, None).unwrap();
                let restored = session.level().unwrap();
                prop_assert_eq!(restored.color_layout(), level.color_layout());
                prop_assert_eq!(restored.score(), level.score());
                assert_tops_visible(restored);
                // play it for real this time
                session.try_move_top_box(mv.from, mv.to).unwrap();
            }
        }

        if session.state() == GameState::Playing {
            prop_assert!(!session.valid_moves().is_empty());
        }
    }

    #[test]
    fn occlusion_never_hides_a_top(
        counts in prop::collection::vec(0usize..8, 1..12),
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let plan = OcclusionAllocator::new(fraction)
            .unwrap()
            .allocate(&counts, &mut SimpleRng::new(seed));
        for (h, n) in plan.hidden.iter().zip(&counts) {
            prop_assert!(*h <= n.saturating_sub(1));
        }
        prop_assert!(plan.allocated <= plan.requested);
        prop_assert_eq!(plan.total_hidden(), plan.allocated);
    }
}

#[test]
fn moves_before_start_are_rejected() {
    let mut session = PuzzleSession::new(SessionConfig::default(), MemoryStore::new(), 1);
    assert_eq!(session.try_move_top_box(0, 1), Err(MoveError::NotPlaying));
    assert!(session.valid_moves().is_empty());
}
