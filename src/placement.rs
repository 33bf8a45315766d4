// src/placement.rs
//! Размещение объектов на готовой карте: место высадки (лодка),
//! разброс вокруг центра (предметы, лава), точки появления существ.

use crate::biome::TileMap;
use crate::error::{IslandError, Result};
use rand::Rng;
use rand::seq::SliceRandom;

/// Выбирает место для лодки.
///
/// Равномерно среди клеток побережья; если побережья нет — случайная
/// клетка суши с предупреждением в логе. Карта без суши даёт
/// `IslandError::NoLandTile`.
pub fn place_landing_site<R: Rng + ?Sized>(tiles: &TileMap, rng: &mut R) -> Result<(u32, u32)> {
    let coast = tiles.find_coastal_tiles();
    if let Some(&site) = coast.choose(rng) {
        tracing::info!(x = site.0, y = site.1, "landing site placed on the coast");
        return Ok(site);
    }

    tracing::warn!("no coastal tile found, placing landing site on random land");
    let land = tiles.land_tiles();
    land.choose(rng).copied().ok_or(IslandError::NoLandTile)
}

/// Разбрасывает до `count` точек в квадрате `radius` вокруг центра карты.
///
/// Точки за пределами карты или на непроходимых по реестру клетках
/// отбрасываются, поэтому результат может быть короче `count`.
pub fn scatter_near_center<R: Rng + ?Sized>(
    tiles: &TileMap,
    rng: &mut R,
    count: usize,
    radius: i32,
) -> Vec<(u32, u32)> {
    let cx = (tiles.width / 2) as i32;
    let cy = (tiles.height / 2) as i32;

    (0..count)
        .filter_map(|_| {
            let x = cx + rng.gen_range(-radius..=radius);
            let y = cy + rng.gen_range(-radius..=radius);
            if tiles.in_bounds(x, y) && tiles.get(x as u32, y as u32).is_passable() {
                Some((x as u32, y as u32))
            } else {
                None
            }
        })
        .collect()
}

/// `count` независимых точек появления существ.
///
/// Наземные существа (`for_flying == false`) никогда не появляются в воде.
pub fn spawn_points<R: Rng + ?Sized>(
    tiles: &TileMap,
    rng: &mut R,
    count: usize,
    for_flying: bool,
) -> Result<Vec<(u32, u32)>> {
    let points = (0..count)
        .map(|_| tiles.random_passable_tile(rng, for_flying))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(count, for_flying, "spawn points chosen");
    Ok(points)
}
