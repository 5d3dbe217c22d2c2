//! The planar variant: a 400x400 plane, no combat, slow ticks.

use anyhow::Result;
use terrarium_core::SimConfig;

fn main() -> Result<()> {
    terrarium_app::init_tracing();
    terrarium_app::run_variant("terrarium-2d", SimConfig::flatland())
}
