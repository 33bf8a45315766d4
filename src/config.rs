// src/config.rs
//! Конфигурация генерации острова
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией острова:
//! - Размер карты и сид
//! - Шероховатость фрактала (diamond-square) и скорость её затухания
//! - Пороги высот для биомов
//! - Доли грязи и шипов на суше
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::{IslandError, Result};
use crate::heightmap::ROUGHNESS_DECAY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Пороги высот для классификации клеток
///
/// Применяются по порядку, срабатывает первый подходящий:
/// `v < water` → вода, `v < beach` → пляж, `v < forest` → лес, иначе вулкан.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElevationThresholds {
    /// Верхняя граница воды (по умолчанию 0.20)
    #[serde(default = "default_water_level")]
    pub water: f32,

    /// Верхняя граница пляжа (по умолчанию 0.30)
    #[serde(default = "default_beach_level")]
    pub beach: f32,

    /// Верхняя граница леса, всё выше — вулкан (по умолчанию 0.80)
    #[serde(default = "default_forest_level")]
    pub forest: f32,
}

fn default_water_level() -> f32 {
    0.20
}
fn default_beach_level() -> f32 {
    0.30
}
fn default_forest_level() -> f32 {
    0.80
}

impl Default for ElevationThresholds {
    fn default() -> Self {
        Self {
            water: 0.20,
            beach: 0.30,
            forest: 0.80,
        }
    }
}

/// Настройки опасных клеток на суше
///
/// Управляет вторичным проходом классификатора: часть клеток суши
/// превращается в грязь и шипы.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HazardSettings {
    /// Доля клеток суши, превращаемых в грязь (по умолчанию 3%)
    #[serde(default = "default_mud_fraction")]
    pub mud_fraction: f32,

    /// Доля клеток суши, превращаемых в шипы (по умолчанию 2%)
    #[serde(default = "default_spike_fraction")]
    pub spike_fraction: f32,

    /// Включены ли шипы вообще
    #[serde(default = "default_spikes_enabled")]
    pub spikes_enabled: bool,
}

fn default_mud_fraction() -> f32 {
    0.03
}
fn default_spike_fraction() -> f32 {
    0.02
}
fn default_spikes_enabled() -> bool {
    true
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            mud_fraction: 0.03,
            spike_fraction: 0.02,
            spikes_enabled: true,
        }
    }
}

/// Основные параметры генерации острова
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IslandGenerationParams {
    /// Сид генератора случайных чисел. Если не задан, генерируется случайный
    /// и сообщается в лог, чтобы карту можно было воспроизвести.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Ширина карты в клетках (по умолчанию 512)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 512)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Начальная шероховатость фрактала (по умолчанию 0.4)
    #[serde(default = "default_roughness")]
    pub roughness: f32,

    /// Множитель шероховатости на каждой итерации (по умолчанию 0.7)
    #[serde(default = "default_roughness_decay")]
    pub roughness_decay: f32,

    /// Пороги высот для биомов
    #[serde(default)]
    pub thresholds: ElevationThresholds,

    /// Грязь и шипы
    #[serde(default)]
    pub hazards: HazardSettings,
}

/// Наибольшая сторона карты: карта высот `(2^15 + 1)^2` ещё помещается в `u32`
pub const MAX_MAP_SIDE: u32 = 1 << 15;

fn default_width() -> u32 {
    512
}
fn default_height() -> u32 {
    512
}
fn default_roughness() -> f32 {
    0.4
}
fn default_roughness_decay() -> f32 {
    ROUGHNESS_DECAY
}

impl Default for IslandGenerationParams {
    fn default() -> Self {
        Self {
            seed: None,
            width: 512,
            height: 512,
            roughness: 0.4,
            roughness_decay: ROUGHNESS_DECAY,
            thresholds: ElevationThresholds::default(),
            hazards: HazardSettings::default(),
        }
    }
}

impl IslandGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # island.toml
    /// seed = 12341
    /// width = 256
    /// height = 256
    ///
    /// [hazards]
    /// spikes_enabled = false
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }

    /// Проверяет параметры до начала генерации.
    ///
    /// Нулевые или слишком большие размеры, неупорядоченные пороги и доли вне `[0, 1]`
    /// дают `IslandError::InvalidConfig`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(IslandError::InvalidConfig(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.max(self.height) > MAX_MAP_SIDE {
            return Err(IslandError::InvalidConfig(format!(
                "map side must be at most {MAX_MAP_SIDE}, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(IslandError::InvalidConfig(format!(
                "roughness must be a non-negative number, got {}",
                self.roughness
            )));
        }
        if !(self.roughness_decay > 0.0 && self.roughness_decay <= 1.0) {
            return Err(IslandError::InvalidConfig(format!(
                "roughness_decay must be in (0, 1], got {}",
                self.roughness_decay
            )));
        }

        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.water)
            || !(0.0..=1.0).contains(&t.forest)
            || !(t.water < t.beach && t.beach < t.forest)
        {
            return Err(IslandError::InvalidConfig(format!(
                "thresholds must be strictly increasing within [0, 1], got water={} beach={} forest={}",
                t.water, t.beach, t.forest
            )));
        }

        let h = &self.hazards;
        let fractions_ok = (0.0..=1.0).contains(&h.mud_fraction)
            && (0.0..=1.0).contains(&h.spike_fraction)
            && h.mud_fraction + h.spike_fraction <= 1.0;
        if !fractions_ok {
            return Err(IslandError::InvalidConfig(format!(
                "hazard fractions must be in [0, 1] and sum to at most 1, got mud={} spikes={}",
                h.mud_fraction, h.spike_fraction
            )));
        }

        Ok(())
    }
}
