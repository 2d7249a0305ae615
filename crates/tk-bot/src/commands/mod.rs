pub mod console;
pub mod generate;
pub mod monsters;
pub mod sessions;
pub mod sheets;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tk_bot::BotConfig;

/// The configured RNG, seeded from the OS when no seed is set.
fn rng(config: &BotConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
