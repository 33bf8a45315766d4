use crate::config::{ElevationThresholds, HazardSettings};
use crate::error::{IslandError, Result};
use crate::heightmap::Heightmap;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Тип клетки острова. Дискриминант совпадает с игровым кодом тайла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    Volcano = 0,
    Forest = 1,
    Beach = 2,
    Water = 3,
    Mud = 4,
    Spikes = 5,
}

/// Запись реестра биомов: цвет на миникарте, проходимость, имя
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeInfo {
    pub color: [u8; 3],
    pub passable: bool,
    pub name: &'static str,
}

/// Реестр биомов, индексируется кодом тайла
static BIOME_TABLE: [BiomeInfo; Biome::COUNT] = [
    BiomeInfo {
        color: [139, 69, 19],
        passable: true,
        name: "Volcano",
    },
    BiomeInfo {
        color: [34, 139, 34],
        passable: true,
        name: "Forest",
    },
    BiomeInfo {
        color: [238, 214, 175],
        passable: true,
        name: "Beach",
    },
    BiomeInfo {
        color: [0, 0, 255],
        passable: false,
        name: "Water",
    },
    BiomeInfo {
        color: [102, 51, 0],
        passable: true,
        name: "Mud",
    },
    // Шипы проходимы, урон наносит игровая логика
    BiomeInfo {
        color: [128, 128, 128],
        passable: true,
        name: "Spikes",
    },
];

impl Biome {
    pub const COUNT: usize = 6;

    pub const ALL: [Biome; Biome::COUNT] = [
        Biome::Volcano,
        Biome::Forest,
        Biome::Beach,
        Biome::Water,
        Biome::Mud,
        Biome::Spikes,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Biome> {
        Biome::ALL.get(code as usize).copied()
    }

    #[must_use]
    pub fn info(self) -> &'static BiomeInfo {
        &BIOME_TABLE[self as usize]
    }

    pub fn to_rgb(self) -> [u8; 3] {
        self.info().color
    }

    pub fn is_passable(self) -> bool {
        self.info().passable
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Биом по высоте: первый порог, под который попадает `v`
    #[must_use]
    pub fn from_elevation(v: f32, thresholds: &ElevationThresholds) -> Biome {
        if v < thresholds.water {
            Biome::Water
        } else if v < thresholds.beach {
            Biome::Beach
        } else if v < thresholds.forest {
            Biome::Forest
        } else {
            Biome::Volcano
        }
    }
}

/// Карта тайлов острова, строки сверху вниз
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Biome>,
}

impl TileMap {
    pub fn filled(width: u32, height: u32, biome: Biome) -> Self {
        Self {
            width,
            height,
            data: vec![biome; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Biome {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, biome: Biome) {
        self.data[(y * self.width + x) as usize] = biome;
    }

    /// Координаты всех клеток, кроме воды, в порядке строк
    pub fn land_tiles(&self) -> Vec<(u32, u32)> {
        let width = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != Biome::Water)
            .map(|(i, _)| ((i % width) as u32, (i / width) as u32))
            .collect()
    }

    pub fn count(&self, biome: Biome) -> usize {
        self.data.iter().filter(|&&b| b == biome).count()
    }

    /// Количество клеток каждого биома, индекс — код тайла
    pub fn counts(&self) -> [usize; Biome::COUNT] {
        let mut counts = [0; Biome::COUNT];
        for &b in &self.data {
            counts[b as usize] += 1;
        }
        counts
    }

    pub fn to_rgba_image(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|&b| {
                let rgb = b.to_rgb();
                [rgb[0], rgb[1], rgb[2], 255] // RGBA
            })
            .collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<()> {
        let img: image::ImageBuffer<image::Rgba<u8>, Vec<u8>> =
            image::ImageBuffer::from_raw(self.width, self.height, self.to_rgba_image())
                .ok_or(IslandError::ImageBuffer)?;
        img.save(path)?;
        Ok(())
    }
}

/// Переводит высоты в биомы.
///
/// Используется только левый верхний угол `width × height` карты высот,
/// без центрирования: так сохраняется воспроизводимость по сиду.
pub fn classify_heightmap(
    heightmap: &Heightmap,
    width: u32,
    height: u32,
    thresholds: &ElevationThresholds,
) -> TileMap {
    debug_assert!(width <= heightmap.width && height <= heightmap.height);

    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| Biome::from_elevation(heightmap.get(x, y), thresholds))
        .collect();

    TileMap {
        width,
        height,
        data,
    }
}

/// Вторичный проход: разбрасывает грязь и шипы по суше.
///
/// Клетки суши перемешиваются, первые `mud_fraction` из них становятся
/// грязью, следующие `spike_fraction` — шипами. Множества не пересекаются.
/// Возвращает количество клеток грязи и шипов.
pub fn scatter_hazards<R: Rng + ?Sized>(
    tiles: &mut TileMap,
    hazards: &HazardSettings,
    rng: &mut R,
) -> (usize, usize) {
    let mut land = tiles.land_tiles();
    land.shuffle(rng);

    let total_land = land.len();
    let mud_count = ((total_land as f32 * hazards.mud_fraction) as usize).min(total_land);
    for &(x, y) in &land[..mud_count] {
        tiles.set(x, y, Biome::Mud);
    }

    let mut spike_count = 0;
    if hazards.spikes_enabled {
        spike_count = ((total_land as f32 * hazards.spike_fraction) as usize)
            .min(total_land - mud_count);
        for &(x, y) in &land[mud_count..mud_count + spike_count] {
            tiles.set(x, y, Biome::Spikes);
        }
    }

    tracing::debug!(total_land, mud_count, spike_count, "scattered hazards");
    (mud_count, spike_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn registry_matches_tile_codes() {
        for (code, biome) in Biome::ALL.iter().enumerate() {
            assert_eq!(biome.code() as usize, code);
            assert_eq!(Biome::from_code(code as u8), Some(*biome));
        }
        assert_eq!(Biome::from_code(6), None);
        assert_eq!(Biome::Water.name(), "Water");
        assert_eq!(Biome::Beach.to_rgb(), [238, 214, 175]);
    }

    #[test]
    fn only_water_is_impassable_in_registry() {
        for biome in Biome::ALL {
            assert_eq!(biome.is_passable(), biome != Biome::Water);
        }
    }

    #[test]
    fn thresholds_first_match_wins() {
        let t = ElevationThresholds::default();
        assert_eq!(Biome::from_elevation(0.0, &t), Biome::Water);
        assert_eq!(Biome::from_elevation(0.19, &t), Biome::Water);
        assert_eq!(Biome::from_elevation(0.20, &t), Biome::Beach);
        assert_eq!(Biome::from_elevation(0.29, &t), Biome::Beach);
        assert_eq!(Biome::from_elevation(0.30, &t), Biome::Forest);
        assert_eq!(Biome::from_elevation(0.79, &t), Biome::Forest);
        assert_eq!(Biome::from_elevation(0.80, &t), Biome::Volcano);
        assert_eq!(Biome::from_elevation(1.0, &t), Biome::Volcano);
    }

    #[test]
    fn crop_takes_top_left_corner() {
        // Карта 5×5, где высота растёт по диагонали от левого верхнего угла
        let mut heights = Heightmap::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                heights.set(x, y, (x + y) as f32 / 8.0);
            }
        }

        let tiles = classify_heightmap(&heights, 3, 2, &ElevationThresholds::default());
        assert_eq!((tiles.width, tiles.height), (3, 2));
        // (0,0) = 0.0 → вода; (2,1) = 0.375 → лес
        assert_eq!(tiles.get(0, 0), Biome::Water);
        assert_eq!(tiles.get(1, 0), Biome::Water);
        assert_eq!(tiles.get(2, 0), Biome::Beach);
        assert_eq!(tiles.get(2, 1), Biome::Forest);
    }

    #[test]
    fn hazards_are_disjoint_and_on_land() {
        let mut tiles = TileMap::filled(20, 20, Biome::Forest);
        for x in 0..20 {
            tiles.set(x, 0, Biome::Water);
        }
        let before = tiles.clone();

        let hazards = HazardSettings {
            mud_fraction: 0.1,
            spike_fraction: 0.1,
            spikes_enabled: true,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (mud, spikes) = scatter_hazards(&mut tiles, &hazards, &mut rng);

        assert_eq!(mud, 38);
        assert_eq!(spikes, 38);
        assert_eq!(tiles.count(Biome::Mud), 38);
        assert_eq!(tiles.count(Biome::Spikes), 38);
        assert_eq!(tiles.count(Biome::Water), 20);
        for (i, b) in tiles.data.iter().enumerate() {
            if matches!(b, Biome::Mud | Biome::Spikes) {
                assert_ne!(before.data[i], Biome::Water);
            }
        }
    }

    #[test]
    fn disabled_spikes_leave_no_spikes() {
        let mut tiles = TileMap::filled(10, 10, Biome::Forest);
        let hazards = HazardSettings {
            spikes_enabled: false,
            ..HazardSettings::default()
        };
        let (mud, spikes) = scatter_hazards(&mut tiles, &hazards, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(mud, 3);
        assert_eq!(spikes, 0);
        assert_eq!(tiles.count(Biome::Spikes), 0);
    }

    #[test]
    fn counts_cover_every_cell() {
        let mut tiles = TileMap::filled(4, 4, Biome::Beach);
        tiles.set(0, 0, Biome::Volcano);
        let counts = tiles.counts();
        assert_eq!(counts[Biome::Volcano as usize], 1);
        assert_eq!(counts[Biome::Beach as usize], 15);
        assert_eq!(counts.iter().sum::<usize>(), 16);
    }
}
