// src/generator.rs
//! Полный конвейер генерации острова:
//! diamond-square → радиальное затухание → классификация → грязь и шипы.
//!
//! Конвейер синхронный и отрабатывает целиком, прежде чем карта станет
//! доступна остальным подсистемам.

use crate::biome::{TileMap, classify_heightmap, scatter_hazards};
use crate::config::IslandGenerationParams;
use crate::error::Result;
use crate::heightmap::{Heightmap, diamond_square, heightmap_size};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Сгенерированный остров
#[derive(Debug, Clone, PartialEq)]
pub struct IslandMap {
    /// Сид, из которого получена карта (заданный или сгенерированный)
    pub seed: u64,
    /// Карта высот после радиального затухания, до обрезки
    pub heightmap: Heightmap,
    pub tiles: TileMap,
}

/// Определяет сид: заданный или новый случайный (с записью в лог,
/// чтобы карту можно было воспроизвести).
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed specified, using random seed");
        seed
    })
}

/// Генерирует остров по параметрам.
///
/// Параметры проверяются до того, как потрачено хоть одно случайное число.
/// Один и тот же сид даёт побитово одинаковую карту.
pub fn generate_island_map(params: &IslandGenerationParams) -> Result<IslandMap> {
    params.validate()?;
    let seed = resolve_seed(params.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // === 1. Фрактальная карта высот ===
    let size = heightmap_size(params.width, params.height);
    let mut heightmap = diamond_square(size, params.roughness, params.roughness_decay, &mut rng);

    // === 2. Остров: суша к центру, вода к краям ===
    heightmap.apply_radial_falloff();

    // === 3. Биомы по порогам (левый верхний угол) ===
    let mut tiles = classify_heightmap(&heightmap, params.width, params.height, &params.thresholds);

    // === 4. Грязь и шипы ===
    scatter_hazards(&mut tiles, &params.hazards, &mut rng);

    tracing::info!(
        seed,
        width = params.width,
        height = params.height,
        land = tiles.land_tiles().len(),
        "island map generated"
    );

    Ok(IslandMap {
        seed,
        heightmap,
        tiles,
    })
}

/// Игровая сессия: владеет текущей картой.
///
/// `reset` сначала полностью строит новую карту и только потом
/// подменяет указатель. Ранее выданные `Arc` остаются целостными
/// (старая карта), новые читатели видят новую.
#[derive(Debug)]
pub struct IslandSession {
    params: IslandGenerationParams,
    map: Arc<IslandMap>,
}

impl IslandSession {
    pub fn new(params: IslandGenerationParams) -> Result<Self> {
        let map = Arc::new(generate_island_map(&params)?);
        Ok(Self { params, map })
    }

    /// Текущая карта
    pub fn map(&self) -> Arc<IslandMap> {
        Arc::clone(&self.map)
    }

    pub fn params(&self) -> &IslandGenerationParams {
        &self.params
    }

    /// Пересоздаёт остров. При ошибке текущая карта остаётся на месте.
    pub fn reset(&mut self) -> Result<Arc<IslandMap>> {
        let fresh = Arc::new(generate_island_map(&self.params)?);
        self.map = Arc::clone(&fresh);
        Ok(fresh)
    }
}
