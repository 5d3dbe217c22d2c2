//! Shared plumbing for the variant entry points.

use anyhow::Result;
use terrarium_core::SimConfig;
use terrarium_world::{NullRenderer, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Run one variant to completion and log the final counters.
pub fn run_variant(name: &str, config: SimConfig) -> Result<()> {
    info!(variant = name, num_ticks = config.num_ticks, "starting variant");

    let mut world = World::new(config, Box::new(NullRenderer::new()))?;
    world.run()?;

    let stats = world.stats();
    info!(
        variant = name,
        survivors = world.organisms().len(),
        deaths_total = stats.deaths_total,
        deaths_by_starvation = stats.deaths_by_starvation,
        deaths_by_combat = stats.deaths_by_combat,
        births = stats.births,
        food_eaten = stats.food_eaten,
        "variant finished"
    );
    Ok(())
}
