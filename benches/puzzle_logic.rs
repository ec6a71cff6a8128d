use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cat_shelf::core::{apply_move, resolve_eliminations, RuntimeLevel, SimpleRng};
use cat_shelf::engine::{design_level, LayoutGenerator, SolvabilityEvaluator};
use cat_shelf::types::{
    BoxSlot, Color, EvaluatorConfig, GameConfig, LevelDefinition, ShelfDefinition,
};

fn bench_generation(c: &mut Criterion) {
    let config = GameConfig::default();
    let generator = LayoutGenerator::from_config(&config);
    let mut seed = 0u64;

    c.bench_function("design_8x32", |b| {
        b.iter(|| {
            seed += 1;
            design_level(&generator, black_box(&config.layout), &mut SimpleRng::new(seed))
        })
    });
}

fn bench_elimination(c: &mut Criterion) {
    // Landing the Red leaves two runs on shelf 0 to clear in turn.
    let def = LevelDefinition {
        shelves: vec![
            ShelfDefinition {
                capacity: 8,
                boxes: [Color::Blue, Color::Blue, Color::Blue, Color::Red, Color::Red]
                    .iter()
                    .map(|&c| BoxSlot::visible(c))
                    .collect(),
            },
            ShelfDefinition {
                capacity: 8,
                boxes: vec![BoxSlot::visible(Color::Green), BoxSlot::visible(Color::Red)],
            },
        ],
        ..Default::default()
    };
    let level = RuntimeLevel::build(&def).unwrap();

    c.bench_function("move_and_cascade", |b| {
        b.iter(|| {
            let mut l = level.clone();
            apply_move(&mut l, 1, 0).unwrap();
            resolve_eliminations(black_box(&mut l))
        })
    });
}

fn bench_evaluation(c: &mut Criterion) {
    let config = GameConfig::default();
    let generator = LayoutGenerator::from_config(&config);
    let def = design_level(&generator, &config.layout, &mut SimpleRng::new(7))
        .unwrap()
        .definition;
    let evaluator = SolvabilityEvaluator::new(EvaluatorConfig {
        runs: 64,
        move_budget: 200,
        base_seed: 1,
    });

    c.bench_function("evaluate_64_runs", |b| {
        b.iter(|| evaluator.evaluate(black_box(&def)).unwrap())
    });
}

criterion_group!(benches, bench_generation, bench_elimination, bench_evaluation);
criterion_main!(benches);
