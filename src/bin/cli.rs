use clap::Parser;
use image::{ImageBuffer, Rgba};
use imageproc::drawing::draw_filled_circle_mut;
use islandgen::placement::place_landing_site;
use islandgen::{Biome, IslandGenerationParams, generate_island_map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор острова для Dino Island
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ширина карты в клетках
    #[arg(long)]
    width: Option<u32>,

    /// Высота карты в клетках
    #[arg(long)]
    height: Option<u32>,

    /// Отключить шипы
    #[arg(long)]
    no_spikes: bool,

    /// Каталог для height.png, tiles.png и summary.json
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Serialize)]
struct BiomeCount {
    name: &'static str,
    code: u8,
    tiles: usize,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    width: u32,
    height: u32,
    biomes: Vec<BiomeCount>,
    coastal_tiles: usize,
    landing_site: (u32, u32),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            IslandGenerationParams::from_toml_file(path)?
        }
        None => IslandGenerationParams::default(),
    };
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }
    if let Some(width) = cli.width {
        params.width = width;
    }
    if let Some(height) = cli.height {
        params.height = height;
    }
    if cli.no_spikes {
        params.hazards.spikes_enabled = false;
    }

    let island = generate_island_map(&params)?;
    let tiles = &island.tiles;

    // Отдельный поток случайных чисел, чтобы не трогать сам остров
    let mut rng = ChaCha8Rng::seed_from_u64(island.seed.wrapping_add(1));
    let landing_site = place_landing_site(tiles, &mut rng)?;

    std::fs::create_dir_all(&cli.output)?;

    let height_path = cli.output.join("height.png");
    island.heightmap.save_as_png(&height_path.to_string_lossy())?;

    let mut tiles_img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(tiles.width, tiles.height, tiles.to_rgba_image())
            .ok_or("Failed to create image buffer")?;
    draw_filled_circle_mut(
        &mut tiles_img,
        (landing_site.0 as i32, landing_site.1 as i32),
        2,
        Rgba([255, 255, 0, 255]),
    );
    let tiles_path = cli.output.join("tiles.png");
    tiles_img.save(&tiles_path)?;

    let counts = tiles.counts();
    let summary = Summary {
        seed: island.seed,
        width: tiles.width,
        height: tiles.height,
        biomes: Biome::ALL
            .iter()
            .map(|&b| BiomeCount {
                name: b.name(),
                code: b.code(),
                tiles: counts[b as usize],
            })
            .collect(),
        coastal_tiles: tiles.find_coastal_tiles().len(),
        landing_site,
    };
    let summary_json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(cli.output.join("summary.json"), &summary_json)?;

    println!("{summary_json}");
    println!("Сохранено: {height_path:?}, {tiles_path:?}");
    Ok(())
}
