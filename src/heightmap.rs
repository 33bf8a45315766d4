use crate::error::{IslandError, Result};
use image::{ImageBuffer, Luma};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Во сколько раз падает шероховатость на каждой итерации
pub const ROUGHNESS_DECAY: f32 = 0.7;
/// Диапазон высот меньше этого считается вырожденным
const DEGENERATE_RANGE: f32 = 1e-7;

/// Двумерная карта высот: значения от 0.0 (глубокая вода) до 1.0 (жерло вулкана)
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Heightmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    /// Карта, заполненная одним значением
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        self.data[(y * self.width + x) as usize] = value;
    }

    /// Минимум и максимум высот
    pub fn min_max(&self) -> (f32, f32) {
        let min_h = self.data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max_h = self.data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        (min_h, max_h)
    }

    /// Приводит высоты к `[0, 1]` через `(v - min) / (max - min)`.
    ///
    /// Если диапазон вырожден (плоская карта), вся карта заполняется `0.5`.
    pub fn normalize(&mut self) {
        let (min_h, max_h) = self.min_max();
        let range = max_h - min_h;

        if range < DEGENERATE_RANGE {
            tracing::debug!(min = min_h, max = max_h, "degenerate heightmap range, using 0.5");
            self.data.fill(0.5);
            return;
        }

        for h in &mut self.data {
            *h = (*h - min_h) / range;
        }
    }

    /// Радиальное затухание: умножает каждую высоту на `max(0, 1 - (d / r)^2)`,
    /// где `d` — расстояние до центра, `r` — половина стороны карты.
    /// Суша стягивается к центру, вода — к краям.
    pub fn apply_radial_falloff(&mut self) {
        let cx = (self.width / 2) as f32;
        let cy = (self.height / 2) as f32;
        let max_radius = self.width.max(self.height) as f32 / 2.0;
        let width = self.width as usize;

        for (i, h) in self.data.iter_mut().enumerate() {
            let dx = (i % width) as f32 - cx;
            let dy = (i / width) as f32 - cy;
            let fade = (dx * dx + dy * dy).sqrt() / max_radius;
            *h *= (1.0 - fade * fade).max(0.0);
        }
    }

    pub fn to_grayscale_image(&self) -> Vec<u8> {
        #[cfg(feature = "parallel")]
        let iter = self.data.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = self.data.iter();

        iter.map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8).collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<()> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_grayscale_image())
                .ok_or(IslandError::ImageBuffer)?;
        img.save(path)?;
        Ok(())
    }
}

/// Сторона квадратной карты высот для карты тайлов `width × height`:
/// `2^k + 1` для наименьшего `k` с `2^k >= max(width, height)`.
#[must_use]
pub fn heightmap_size(width: u32, height: u32) -> u32 {
    width.max(height).max(1).next_power_of_two() + 1
}

/// Генерирует фрактальную карту высот `size × size` алгоритмом diamond-square.
///
/// Углы засеваются один раз, все остальные точки выводятся. Амплитуда
/// случайного смещения равна `roughness * step` для *текущих* шага и
/// шероховатости; шероховатость умножается на `decay` после каждой итерации.
/// Результат нормализован в `[0, 1]`.
pub fn diamond_square<R: Rng + ?Sized>(
    size: u32,
    mut roughness: f32,
    decay: f32,
    rng: &mut R,
) -> Heightmap {
    let mut map = Heightmap::new(size, size);
    if size == 0 {
        return map;
    }
    let last = size - 1;

    // === 1. Углы ===
    map.set(0, 0, rng.r#gen::<f32>());
    map.set(last, 0, rng.r#gen::<f32>());
    map.set(0, last, rng.r#gen::<f32>());
    map.set(last, last, rng.r#gen::<f32>());

    let mut step = last;
    while step > 1 {
        let half = step / 2;
        let amplitude = roughness * step as f32;

        // === 2. Diamond: центр квадрата = среднее четырёх углов ===
        for y in (0..last).step_by(step as usize) {
            for x in (0..last).step_by(step as usize) {
                let corners = map.get(x, y)
                    + map.get(x + step, y)
                    + map.get(x, y + step)
                    + map.get(x + step, y + step);
                let offset = (rng.r#gen::<f32>() - 0.5) * amplitude;
                map.set(x + half, y + half, corners / 4.0 + offset);
            }
        }

        // === 3. Square: середины рёбер = среднее доступных соседей по осям ===
        for y in (0..size).step_by(half as usize) {
            for x in ((y + half) % step..size).step_by(step as usize) {
                let mut sum = 0.0;
                let mut count = 0u32;
                if y >= half {
                    sum += map.get(x, y - half);
                    count += 1;
                }
                if y + half < size {
                    sum += map.get(x, y + half);
                    count += 1;
                }
                if x >= half {
                    sum += map.get(x - half, y);
                    count += 1;
                }
                if x + half < size {
                    sum += map.get(x + half, y);
                    count += 1;
                }
                if count > 0 {
                    let offset = (rng.r#gen::<f32>() - 0.5) * amplitude;
                    map.set(x, y, sum / count as f32 + offset);
                }
            }
        }

        step /= 2;
        roughness *= decay;
    }

    map.normalize();
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DEFAULT_ROUGHNESS: f32 = 0.45;

    #[test]
    fn size_is_next_power_of_two_plus_one() {
        assert_eq!(heightmap_size(512, 512), 513);
        assert_eq!(heightmap_size(100, 40), 129);
        assert_eq!(heightmap_size(9, 9), 17);
        assert_eq!(heightmap_size(8, 3), 9);
        assert_eq!(heightmap_size(1, 1), 2);
    }

    #[test]
    fn normalized_range_is_exactly_zero_to_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let map = diamond_square(65, DEFAULT_ROUGHNESS, ROUGHNESS_DECAY, &mut rng);
        let (min_h, max_h) = map.min_max();
        assert_eq!(min_h, 0.0);
        assert_eq!(max_h, 1.0);
        assert_eq!(map.data.len(), 65 * 65);
    }

    #[test]
    fn flat_map_normalizes_to_midpoint() {
        let mut map = Heightmap::filled(9, 9, 0.3);
        map.normalize();
        assert!(map.data.iter().all(|&h| h == 0.5));
    }

    #[test]
    fn corners_are_the_seeded_heights_rescaled() {
        // Углы не перезаписываются итерациями, поэтому после нормализации
        // c = (s - min) / (max - min): разности углов пропорциональны
        // разностям засеянных значений с одним и тем же множителем.
        let mut seed_rng = ChaCha8Rng::seed_from_u64(42);
        let seeded: Vec<f32> = (0..4).map(|_| seed_rng.r#gen::<f32>()).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let map = diamond_square(17, DEFAULT_ROUGHNESS, ROUGHNESS_DECAY, &mut rng);
        let corners = [map.get(0, 0), map.get(16, 0), map.get(0, 16), map.get(16, 16)];

        let (lo, hi) = (0..4)
            .flat_map(|i| (0..4).map(move |j| (i, j)))
            .max_by(|a, b| {
                let da = (seeded[a.0] - seeded[a.1]).abs();
                let db = (seeded[b.0] - seeded[b.1]).abs();
                da.total_cmp(&db)
            })
            .unwrap();
        let scale = (corners[hi] - corners[lo]) / (seeded[hi] - seeded[lo]);
        assert!(scale > 0.0);

        for i in 0..4 {
            let expected = corners[lo] + (seeded[i] - seeded[lo]) * scale;
            assert!(
                (corners[i] - expected).abs() < 1e-4,
                "corner {i}: {} vs {expected}",
                corners[i]
            );
        }
    }

    #[test]
    fn same_seed_same_heights() {
        let a = diamond_square(33, 0.4, ROUGHNESS_DECAY, &mut ChaCha8Rng::seed_from_u64(3));
        let b = diamond_square(33, 0.4, ROUGHNESS_DECAY, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn radial_falloff_zeroes_the_rim_and_keeps_the_center() {
        let mut map = Heightmap::filled(17, 17, 1.0);
        map.apply_radial_falloff();

        assert_eq!(map.get(8, 8), 1.0);
        // Угол дальше радиуса
        assert_eq!(map.get(0, 0), 0.0);
        // Край по оси: d = 8, r = 8.5
        assert!(map.get(0, 8) < 0.15);
        assert!(map.data.iter().all(|&h| (0.0..=1.0).contains(&h)));
    }
}
