//! The volume variant: a 60x60x60 world with combat enabled.

use anyhow::Result;
use terrarium_core::SimConfig;

fn main() -> Result<()> {
    terrarium_app::init_tracing();
    terrarium_app::run_variant("terrarium-3d", SimConfig::default())
}
