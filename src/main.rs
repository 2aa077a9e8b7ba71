use std::{fs, path::Path, time::Instant};

use anyhow::Context;
use rand::SeedableRng;

use median_bvh::{cli, pack_bvh, scenes, Bvh, PackedScene};

fn main() -> anyhow::Result<()> {
    // Parsing cli args
    let cli_args = cli::parse_args();

    env_logger::Builder::new()
        .filter_level(cli_args.verbosity.log_level_filter())
        .init();

    // set up enviroment
    let mut rng = if let Some(seed) = cli_args.seed {
        // use user-provided seed if available
        rand::rngs::SmallRng::seed_from_u64(seed)
    } else if cfg!(debug_assertions) {
        // if debugging, use deterministic seed
        rand::rngs::SmallRng::seed_from_u64(0)
    } else {
        // otherwise real psuedo-randomness
        rand::rngs::SmallRng::from_entropy()
    };

    // Get scene
    let triangles = scenes::get_scene(cli_args.scene, cli_args.triangle_count, &mut rng)
        .with_context(|| format!("Failed to generate scene {:?}", cli_args.scene))?;
    log::info!("{:?} scene has {} triangles", cli_args.scene, triangles.len());

    let start = Instant::now();
    #[cfg(feature = "parallel")]
    let bvh = Bvh::par_build(triangles, cli_args.max_leaf_size);
    #[cfg(not(feature = "parallel"))]
    let bvh = Bvh::build(triangles, cli_args.max_leaf_size);
    log::info!("BVH built in {:?}: {}", start.elapsed(), bvh.stats());

    if cli_args.validate {
        bvh.validate().context("Built BVH is malformed")?;
        log::info!("BVH passed validation");
    }

    let packed = pack_bvh(&bvh).context("Failed to pack BVH")?;
    log::info!(
        "scene bounds {:?} ..= {:?}",
        packed.scene_bounds.min,
        packed.scene_bounds.max
    );

    if let Some(prefix) = &cli_args.output {
        write_buffers(prefix, &packed)?;
    }

    Ok(())
}

/// Write the packed buffers as raw native-endian `f32`s
fn write_buffers(prefix: &Path, packed: &PackedScene) -> anyhow::Result<()> {
    let tris_path = prefix.with_extension("tris.bin");
    let nodes_path = prefix.with_extension("nodes.bin");

    fs::write(&tris_path, packed.triangle_bytes())
        .with_context(|| format!("Failed to write {}", tris_path.display()))?;
    fs::write(&nodes_path, packed.node_bytes())
        .with_context(|| format!("Failed to write {}", nodes_path.display()))?;

    println!(
        "Buffers written to {} and {}",
        tris_path.display(),
        nodes_path.display()
    );
    Ok(())
}
