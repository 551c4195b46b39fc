#![warn(non_snake_case)]
//! # Loteamento Main Entry Point
//!
//! Command-line front door for the loteamento core: builds a spatial model
//! either from a parametric block plan (`generate`) or from an imported
//! geographic feature collection (`import`), loads it into an editing
//! session, and prints a summary — optionally the full model as JSON.
//!
//! ## License
//! Licensed under the MIT License.

use std::env;
use std::error::Error;
use std::path::Path;

use log::info;

use loteamento::editor::Editor;
use loteamento::ingest::{
    BlockPlan, FeatureCollection, FeatureSource, GenerationStrategy, ModelSource, PlanSource,
};
use loteamento::model::SpatialModel;

enum Mode {
    Generate,
    Import,
}

fn parse_args(args: &[String]) -> Result<(Mode, String, bool), Box<dyn Error>> {
    let mut mode = None;
    let mut path = None;
    let mut json = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "generate" => mode = Some(Mode::Generate),
            "import" => mode = Some(Mode::Import),
            "--json" => json = true,
            other => path = Some(other.to_string()),
        }
    }
    match (mode, path) {
        (Some(mode), Some(path)) => Ok((mode, path, json)),
        _ => Err("usage: loteamento <generate|import> <file.json> [--json]".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (mode, path, json_dump) = parse_args(&args)?;

    let source: Box<dyn ModelSource> = match mode {
        Mode::Generate => {
            let plan = BlockPlan::from_path(Path::new(&path))?;
            Box::new(PlanSource::new(plan, GenerationStrategy::Manual))
        }
        Mode::Import => {
            let collection = FeatureCollection::from_path(Path::new(&path))?;
            Box::new(FeatureSource { collection })
        }
    };

    let mut editor = Editor::new(SpatialModel::new());
    editor.load_source(source.as_ref());

    let model = editor.snapshot();
    info!("model bounds: {} x {}", model.bounds.0, model.bounds.1);
    for block in &model.blocks {
        println!("{:>6}  {:<24} {:>4} lots", block.id, block.name, block.lots.len());
    }
    println!(
        "total: {} blocks, {} lots, recorded area {:.1}",
        model.blocks.len(),
        model.lot_count(),
        model.total_area()
    );
    if json_dump {
        println!("{}", serde_json::to_string_pretty(&model)?);
    }
    Ok(())
}
