//! Populate a flat in-memory world with one object and print a JSON summary
//!
//! Usage: populate data/objects/oak_tree.toml --chunks 8 --seed 42 [--parallel]

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use custom_objects::core::error::{ObjectError, Result};
use custom_objects::core::ChunkCoordinate;
use custom_objects::objects::{Bo3Object, CustomObject, TomlDefinitionLoader};
use custom_objects::placement::PlacementContext;
use custom_objects::structures::StructureCache;
use custom_objects::world::{Material, MemoryWorld};

#[derive(Parser, Debug)]
#[command(name = "populate")]
#[command(about = "Run chunk population for one object over a flat test world")]
struct Args {
    /// Object definition file (.toml)
    object: PathBuf,

    /// Side length of the square of populated chunks
    #[arg(long, default_value_t = 4)]
    chunks: i32,

    /// Height of the grass surface
    #[arg(long, default_value_t = 63)]
    surface: i32,

    /// Random seed (random if not specified)
    #[arg(long)]
    seed: Option<u64>,

    /// Populate chunks in parallel, each against its own world window
    #[arg(long)]
    parallel: bool,

    /// Mods reported as loaded to the object's requirement check
    #[arg(long = "mod")]
    mods: Vec<String>,
}

/// JSON output structure
#[derive(Serialize)]
struct Summary {
    object: String,
    seed: u64,
    parallel: bool,
    chunks_populated: usize,
    chunks_with_spawns: usize,
    entities_spawned: usize,
    cached_chunks: usize,
    cached_entries: usize,
    elapsed_ms: u128,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    match run(&args).and_then(|summary| Ok(serde_json::to_string_pretty(&summary)?)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("populate failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn terrain(surface: i32) -> [(Material, i32); 3] {
    [
        (Material::STONE, (surface - 3).max(0)),
        (Material::DIRT, 3),
        (Material::GRASS, 1),
    ]
}

fn run(args: &Args) -> Result<Summary> {
    let name = args
        .object
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ObjectError::ObjectNotFound(args.object.display().to_string()))?
        .to_string();

    let mut object = Bo3Object::new(&name, &args.object);
    if !object.on_enable(&TomlDefinitionLoader::new()) {
        return Err(ObjectError::NotLoaded(name));
    }
    if !object.load_checks(&|m: &str| args.mods.iter().any(|loaded| loaded == m)) {
        return Err(ObjectError::NotLoaded(format!("{} (missing required mods)", name)));
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let cache = StructureCache::new();
    let layers = terrain(args.surface);
    let chunks: Vec<ChunkCoordinate> = (0..args.chunks)
        .flat_map(|x| (0..args.chunks).map(move |z| ChunkCoordinate::new(x, z)))
        .collect();

    tracing::info!(object = %name, seed, chunks = chunks.len(), "populating");
    let start = Instant::now();

    // (spawned, entities) per chunk
    let results: Vec<(bool, usize)> = if args.parallel {
        chunks
            .par_iter()
            .enumerate()
            .map(|(index, &chunk)| {
                // The populating area reaches one chunk past the populated one
                let far = ChunkCoordinate::new(chunk.x + 1, chunk.z + 1);
                let mut world = MemoryWorld::flat("flat", chunk, far, &layers);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(index as u64);
                let mut ctx = PlacementContext::new(&cache, &mut world, &mut rng);
                let spawned = object.process(&mut ctx, chunk);
                (spawned, world.entities().len())
            })
            .collect()
    } else {
        let far = ChunkCoordinate::new(args.chunks, args.chunks);
        let mut world = MemoryWorld::flat("flat", ChunkCoordinate::new(0, 0), far, &layers);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut results = Vec::with_capacity(chunks.len());
        for &chunk in &chunks {
            let before = world.entities().len();
            let mut ctx = PlacementContext::new(&cache, &mut world, &mut rng);
            let spawned = object.process(&mut ctx, chunk);
            results.push((spawned, world.entities().len() - before));
        }
        results
    };

    Ok(Summary {
        object: name,
        seed,
        parallel: args.parallel,
        chunks_populated: results.len(),
        chunks_with_spawns: results.iter().filter(|(spawned, _)| *spawned).count(),
        entities_spawned: results.iter().map(|(_, entities)| entities).sum(),
        cached_chunks: cache.chunk_count(),
        cached_entries: cache.entry_count(),
        elapsed_ms: start.elapsed().as_millis(),
    })
}
