// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Swatch sandbox
// Renders a palette of color previews through the keyed loader and writes them as PNGs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use swatch_core::Color;
use swatch_loader::LoaderConfig;
use swatch_preview::{preview_loader, save_png, PreviewBoard, PreviewStyle};

#[derive(Debug, Parser)]
#[command(about = "Render color previews through the asynchronous keyed loader")]
struct Cli {
    /// RON file with loader, style, colors and output directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the output directory from the config.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Colors to render (`#RGB`, `#RRGGBB` or `#AARRGGBB`). Replaces the config's list.
    colors: Vec<Color>,

    /// After requesting a color for the first slot, switch it to the last color
    /// straight away. Only the last color may end up in that slot.
    #[arg(long)]
    switch_first: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SandboxConfig {
    loader: LoaderConfig,
    style: PreviewStyle,
    colors: Vec<Color>,
    output_dir: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            style: PreviewStyle::default(),
            colors: vec![Color::RED, Color::GREEN, Color::BLUE],
            output_dir: PathBuf::from("previews"),
        }
    }
}

impl SandboxConfig {
    fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sandbox config '{}'", path.display()))?;
        let config: Self = ron::from_str(&source)
            .with_context(|| format!("Failed to parse sandbox config '{}'", path.display()))?;
        config.loader.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    if !cli.colors.is_empty() {
        config.colors = cli.colors.clone();
    }
    if let Some(out) = cli.out {
        config.output_dir = out;
    }

    log::info!(
        "Rendering {} preview(s) at {}px with {} worker(s).",
        config.colors.len(),
        config.style.size,
        config.loader.worker_count
    );

    let mut loader = preview_loader(config.style, config.loader.clone())?;
    let mut board = PreviewBoard::new();

    for color in &config.colors {
        let slot = board.insert(color.to_string());
        loader.request(*color, slot, (), &mut board)?;
    }

    if cli.switch_first {
        let first = board.iter().next().map(|(id, _)| id);
        if let (Some(first), Some(last)) = (first, config.colors.last()) {
            log::info!("Switching slot {first:?} to {last} before its preview arrives.");
            loader.request(*last, first, (), &mut board)?;
        }
    }

    let applied = loader.dispatch_until_idle(&mut board, Duration::from_secs(30));
    log::info!("Applied {applied} preview(s).");

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory '{}'",
            config.output_dir.display()
        )
    })?;

    for (id, slot) in board.iter() {
        match (&slot.image, &slot.color) {
            (Some(image), Some(color)) => {
                let name = format!("{:02}-{:08X}.png", id.index, color.argb());
                let path = config.output_dir.join(name);
                save_png(image, &path)?;
                log::info!("{} -> {}", slot.label, path.display());
            }
            _ => log::warn!(
                "{} has no preview: {}",
                slot.label,
                slot.error.as_deref().unwrap_or("still pending")
            ),
        }
    }

    let stats = loader.stats();
    log::info!(
        "requests={} hits={} computations={} delivered={} stale={} failures={}",
        stats.requests,
        stats.cache_hits,
        stats.computations,
        stats.delivered,
        stats.discarded_stale,
        stats.failures
    );

    loader.shutdown();
    Ok(())
}
