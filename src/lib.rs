pub mod biome;
pub mod config;
pub mod error;
pub mod generator;
pub mod heightmap;
pub mod placement;
pub mod world;

pub use biome::{Biome, BiomeInfo, TileMap};
pub use config::{ElevationThresholds, HazardSettings, IslandGenerationParams};
pub use error::IslandError;
pub use generator::{IslandMap, IslandSession, generate_island_map};
pub use heightmap::{Heightmap, diamond_square};
