//! Level lab (default binary).
//!
//! Designs a level from the configured layout request and scores it with
//! greedy playouts, or scores a level definition loaded from JSON. Results go
//! to stdout as JSON; progress lines go to stderr.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Result};
use serde::Serialize;

use cat_shelf::cli::{parse_args, CliArgs, Command, USAGE};
use cat_shelf::config::{config_path_from_env, load_config, load_level};
use cat_shelf::core::SimpleRng;
use cat_shelf::engine::{design_level, EvaluationReport, LayoutGenerator, SolvabilityEvaluator};
use cat_shelf::types::{GameConfig, LevelDefinition};

#[derive(Serialize)]
struct GenerateOutput<'a> {
    seed: u64,
    layout_attempt: u32,
    hidden_requested: usize,
    hidden_allocated: usize,
    hidden_adjusted: bool,
    report: EvaluationReport,
    level: &'a LevelDefinition,
}

#[derive(Serialize)]
struct EvaluateOutput {
    report: EvaluationReport,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("[LevelLab] {}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = resolve_config(&cli)?;
    match &cli.command {
        Command::Generate => generate(&config, cli.seed.unwrap_or(config.evaluator.base_seed)),
        Command::Evaluate { level } => evaluate(&config, level),
    }
}

fn resolve_config(cli: &CliArgs) -> Result<GameConfig> {
    let mut config = match cli.config.clone().or_else(config_path_from_env) {
        Some(path) => {
            eprintln!("[LevelLab] Loading config from {}", path.display());
            load_config(&path)?
        }
        None => GameConfig::default(),
    };
    if let Some(runs) = cli.runs {
        config.evaluator.runs = runs;
    }
    if let Some(budget) = cli.budget {
        config.evaluator.move_budget = budget;
    }
    if let Some(seed) = cli.seed {
        config.evaluator.base_seed = seed;
    }
    config.validate().map_err(|e| anyhow!("invalid config: {}", e))?;
    Ok(config)
}

fn generate(config: &GameConfig, seed: u64) -> Result<()> {
    let generator = LayoutGenerator::from_config(config);
    let mut rng = SimpleRng::new(seed);

    let started = Instant::now();
    let designed = design_level(&generator, &config.layout, &mut rng)
        .map_err(|e| anyhow!("generation failed ({}): {}", e.code(), e))?;
    eprintln!(
        "[LevelLab] Layout found on attempt {} ({} shelves, {} boxes)",
        designed.layout.attempt,
        designed.definition.shelves.len(),
        designed.definition.total_boxes()
    );
    if designed.occlusion.adjusted() {
        eprintln!(
            "[LevelLab] Hidden target adjusted from {} to {}",
            designed.occlusion.requested, designed.occlusion.allocated
        );
    }

    let report = run_evaluation(config, &designed.definition)?;
    eprintln!("[LevelLab] Done in {} ms", started.elapsed().as_millis());

    let output = GenerateOutput {
        seed,
        layout_attempt: designed.layout.attempt,
        hidden_requested: designed.occlusion.requested,
        hidden_allocated: designed.occlusion.allocated,
        hidden_adjusted: designed.occlusion.adjusted(),
        report,
        level: &designed.definition,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn evaluate(config: &GameConfig, path: &Path) -> Result<()> {
    let level = load_level(path, config.group_size)?;
    eprintln!(
        "[LevelLab] Loaded {} ({} shelves, {} boxes)",
        path.display(),
        level.shelves.len(),
        level.total_boxes()
    );
    let report = run_evaluation(config, &level)?;
    println!("{}", serde_json::to_string_pretty(&EvaluateOutput { report })?);
    Ok(())
}

fn run_evaluation(config: &GameConfig, level: &LevelDefinition) -> Result<EvaluationReport> {
    let evaluator = SolvabilityEvaluator::new(config.evaluator);
    eprintln!(
        "[LevelLab] Evaluating: {} runs, budget {} moves, seed {}",
        config.evaluator.runs, config.evaluator.move_budget, config.evaluator.base_seed
    );
    let report = evaluator
        .evaluate(level)
        .map_err(|e| anyhow!("evaluation failed ({}): {}", e.code(), e))?;
    eprintln!(
        "[LevelLab] Solvable rate {:.2}, difficulty {}{}",
        report.solvable_rate,
        report.estimated_difficulty,
        if report.likely_solvable { "" } else { " (unlikely solvable)" }
    );
    Ok(report)
}
