// src/world.rs
//! Запросы к готовой карте тайлов: проходимость, случайная проходимая
//! клетка, побережье. Карта только читается.

use crate::biome::{Biome, TileMap};
use crate::error::{IslandError, Result};
use rand::Rng;

/// Лимит попыток случайного поиска проходимой клетки
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl TileMap {
    /// Лежит ли `(x, y)` внутри карты
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Может ли существо стоять на клетке `(x, y)`.
    ///
    /// За пределами карты — всегда `false`. Наземным существам
    /// (`for_flying == false`) вода запрещена явно, в остальном решает
    /// флаг проходимости из реестра биомов.
    pub fn is_passable(&self, x: i32, y: i32, for_flying: bool) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let biome = self.get(x as u32, y as u32);
        if !for_flying && biome == Biome::Water {
            return false;
        }
        biome.is_passable()
    }

    /// Случайная проходимая клетка.
    ///
    /// Делает до [`MAX_PLACEMENT_ATTEMPTS`] равномерных попыток, после чего
    /// возвращает `IslandError::NoPassableTileFound`: карта вырождена,
    /// повторять поиск бессмысленно.
    pub fn random_passable_tile<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        for_flying: bool,
    ) -> Result<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return Err(IslandError::NoPassableTileFound { attempts: 0 });
        }

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            if self.is_passable(x as i32, y as i32, for_flying) {
                return Ok((x, y));
            }
        }

        tracing::error!(
            attempts = MAX_PLACEMENT_ATTEMPTS,
            "could not find a passable tile"
        );
        Err(IslandError::NoPassableTileFound {
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    /// Есть ли вода среди восьми соседей клетки (с обрезкой по краям карты)
    pub fn touches_water(&self, x: u32, y: u32) -> bool {
        NEIGHBORS.iter().any(|&(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            self.in_bounds(nx, ny) && self.get(nx as u32, ny as u32) == Biome::Water
        })
    }

    /// Все клетки суши, у которых хотя бы один из восьми соседей — вода.
    /// Порядок — по строкам сверху вниз.
    pub fn find_coastal_tiles(&self) -> Vec<(u32, u32)> {
        let mut coast = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) != Biome::Water && self.touches_water(x, y) {
                    coast.push((x, y));
                }
            }
        }
        coast
    }
}
