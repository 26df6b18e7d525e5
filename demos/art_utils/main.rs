//! Sprite art CLI utility
//!
//! Inspects the sprite art of a data image described by an art manifest.
//!
//! # Features
//!
//! - **info**: List the sprites of a manifest and summarize their art
//! - **frame**: Dump the pieces of one mapping frame as hex and decoded fields
//! - **render**: Compose a mapping frame into a PNG image
//! - **play**: Run an animation for a number of ticks and print the frames shown
//! - **export**: Write a JSON summary of a sprite's art
//!
//! # Usage
//!
//! ```bash
//! # List everything in the manifest
//! cargo run --example art_utils -- info -i data.bin -m art.toml
//!
//! # Dump frame 3 of "sonic"
//! cargo run --example art_utils -- frame -i data.bin -m art.toml sonic 3
//!
//! # Render frame 3 at 4x scale
//! cargo run --example art_utils -- render -i data.bin -m art.toml sonic 3 -o sonic_3.png -s 4
//!
//! # Play the walk animation for 60 ticks
//! cargo run --example art_utils -- play -i data.bin -m art.toml sonic walk -t 60
//!
//! # Export a JSON summary
//! cargo run --example art_utils -- export -i data.bin -m art.toml sonic -o sonic.json
//! ```

use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{Rgba, RgbaImage};
use log::info;
use serde::Serialize;
use spindash::prelude::*;

#[derive(Parser)]
#[command(name = "art_utils")]
#[command(author = "spindash-rs project")]
#[command(version = "1.0")]
#[command(about = "Sprite art utility - inspect, render and play sprite art from a data image", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Args)]
struct Source {
	/// Data image path
	#[arg(short, long, value_name = "IMAGE")]
	image: PathBuf,

	/// Art manifest path (TOML or JSON)
	#[arg(short, long, value_name = "MANIFEST")]
	manifest: PathBuf,
}

#[derive(Subcommand)]
enum Command {
	/// List sprites and summarize their art
	Info {
		#[command(flatten)]
		source: Source,
	},

	/// Dump one mapping frame
	Frame {
		#[command(flatten)]
		source: Source,

		/// Sprite name
		sprite: String,

		/// Frame index
		index: usize,
	},

	/// Render one mapping frame to PNG
	Render {
		#[command(flatten)]
		source: Source,

		/// Sprite name
		sprite: String,

		/// Frame index
		index: usize,

		/// Output PNG path
		#[arg(short, long, default_value = "frame.png")]
		output: PathBuf,

		/// Integer scale factor
		#[arg(short, long, default_value_t = 1)]
		scale: u32,
	},

	/// Play an animation and print the frame shown on every tick
	Play {
		#[command(flatten)]
		source: Source,

		/// Sprite name
		sprite: String,

		/// Animation name
		animation: String,

		/// Number of ticks to run
		#[arg(short, long, default_value_t = 60)]
		ticks: u32,
	},

	/// Export a JSON summary of a sprite's art
	Export {
		#[command(flatten)]
		source: Source,

		/// Sprite name
		sprite: String,

		/// Output JSON path; prints to stdout when absent
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info {
			source,
		} => run_info(&source),
		Command::Frame {
			source,
			sprite,
			index,
		} => run_frame(&source, &sprite, index),
		Command::Render {
			source,
			sprite,
			index,
			output,
			scale,
		} => run_render(&source, &sprite, index, &output, scale),
		Command::Play {
			source,
			sprite,
			animation,
			ticks,
		} => run_play(&source, &sprite, &animation, ticks),
		Command::Export {
			source,
			sprite,
			output,
		} => run_export(&source, &sprite, output.as_deref()),
	}
}

/// Opens the data image and manifest as an art cache
fn open_cache(source: &Source) -> Result<ArtCache> {
	let image = MemoryImage::open(&source.image)
		.with_context(|| format!("failed to read data image {}", source.image.display()))?;
	let manifest = ArtManifest::open(&source.manifest)
		.with_context(|| format!("failed to read manifest {}", source.manifest.display()))?;
	info!("data image: {} bytes, {} sprites", image.len(), manifest.sprites.len());
	Ok(ArtCache::new(manifest, image))
}

fn load(source: &Source, sprite: &str) -> Result<Arc<SpriteArtBundle>> {
	open_cache(source)?.get(sprite).with_context(|| format!("failed to load sprite art '{sprite}'"))
}

fn run_info(source: &Source) -> Result<()> {
	let mut cache = open_cache(source)?;
	let names: Vec<String> = cache.manifest().names().map(str::to_string).collect();

	for name in names {
		match cache.get(&name) {
			Ok(bundle) => {
				println!("{name}: {bundle}");
				for (anim, animation) in bundle.animations().iter() {
					let kind = match animation.loop_target() {
						Some(target) => format!("loops to {target}"),
						None => "one-shot".to_string(),
					};
					println!(
						"  {anim}: {} steps, {} ticks, {kind}",
						animation.len(),
						animation.total_ticks(bundle.frame_delay())
					);
				}
			}
			Err(e) => println!("{name}: ❌ {e}"),
		}
	}
	Ok(())
}

fn run_frame(source: &Source, sprite: &str, index: usize) -> Result<()> {
	let bundle = load(source, sprite)?;
	let Some((mapping, dplc)) = bundle.frame(index) else {
		bail!("frame {index} out of range ({} frames)", bundle.frame_count());
	};

	println!("{mapping}");
	for (i, piece) in mapping.pieces().iter().enumerate() {
		println!("  [{i:2}] {}  {piece}", hex::encode_upper(piece.to_bytes()?));
	}
	if let Some(bounds) = mapping.bounds() {
		println!("  bounds: ({}, {}) {}x{}", bounds.left, bounds.top, bounds.width(), bounds.height());
	}

	println!("{dplc}");
	for entry in dplc.entries() {
		println!("  {}  {entry}", hex::encode_upper(entry.to_word()?.to_be_bytes()));
	}
	Ok(())
}

/// 16-color ramp per palette line; index 0 is transparent
fn palette_color(line: u8, index: u8) -> Rgba<u8> {
	if index == 0 {
		return Rgba([0, 0, 0, 0]);
	}
	let level = index * 17;
	match line & 0x03 {
		0 => Rgba([level, level, level, 0xFF]),
		1 => Rgba([level, level / 2, 0x20, 0xFF]),
		2 => Rgba([0x20, level, level / 2, 0xFF]),
		_ => Rgba([level / 2, 0x20, level, 0xFF]),
	}
}

/// Composes a mapping frame into an RGBA image
fn compose(bundle: &SpriteArtBundle, index: usize) -> Result<RgbaImage> {
	let Some((mapping, dplc)) = bundle.frame(index) else {
		bail!("frame {index} out of range ({} frames)", bundle.frame_count());
	};
	let Some(bounds) = mapping.bounds() else {
		bail!("frame {index} is empty");
	};

	// Patterns as they sit in the sprite's bank while this frame is shown
	let bank: Vec<&TilePattern> = if dplc.is_empty() {
		bundle.patterns().iter().collect()
	} else {
		dplc.resolve(bundle.patterns()).context("DPLC references missing patterns")?
	};

	let mut img = RgbaImage::new(bounds.width(), bounds.height());
	for piece in mapping.pieces() {
		let palette_line = if piece.palette_line != 0 { piece.palette_line } else { bundle.palette_line() };
		for column in 0..piece.width {
			for row in 0..piece.height {
				let Some(tile) = piece.pattern_at(column, row).and_then(|i| bank.get(i)) else {
					bail!("piece {piece} references a pattern outside the bank");
				};

				let draw_column = if piece.h_flip { piece.width - 1 - column } else { column };
				let draw_row = if piece.v_flip { piece.height - 1 - row } else { row };
				let origin_x = i32::from(piece.x_offset) + i32::from(draw_column) * 8 - bounds.left;
				let origin_y = i32::from(piece.y_offset) + i32::from(draw_row) * 8 - bounds.top;

				for y in 0..8 {
					for x in 0..8 {
						let color = tile.pixel_flipped(x, y, piece.h_flip, piece.v_flip).unwrap_or(0);
						if color != 0 {
							img.put_pixel(
								(origin_x + x as i32) as u32,
								(origin_y + y as i32) as u32,
								palette_color(palette_line, color),
							);
						}
					}
				}
			}
		}
	}

	Ok(img)
}

fn run_render(source: &Source, sprite: &str, index: usize, output: &Path, scale: u32) -> Result<()> {
	let bundle = load(source, sprite)?;
	let mut img = compose(&bundle, index)?;

	if scale > 1 {
		img = image::imageops::resize(
			&img,
			img.width() * scale,
			img.height() * scale,
			image::imageops::FilterType::Nearest,
		);
	}

	img.save(output).with_context(|| format!("failed to write {}", output.display()))?;
	println!("✓ Rendered '{sprite}' frame {index} ({}x{}) to {}", img.width(), img.height(), output.display());
	Ok(())
}

fn run_play(source: &Source, sprite: &str, animation: &str, ticks: u32) -> Result<()> {
	let mut session = Session::new(open_cache(source)?, PlayerState::new(3));
	session.spawn_with_art(Sprite::new(sprite, 0, 0, 0, 0), sprite, Some(animation))?;

	let mut last = None;
	for tick in 0..=ticks {
		if tick > 0 {
			session.tick();
		}
		let Some(state) = session.world().sprite(sprite).map(|s| s.animation().clone()) else {
			bail!("sprite '{sprite}' vanished");
		};
		let frame = session.world().sprite(sprite).and_then(|s| state.frame_index(s.art()?));

		if frame != last || tick == 0 {
			println!(
				"tick {tick:4}: step {:2} frame {:>3} ({} ticks left){}",
				state.step(),
				frame.map_or_else(|| "-".to_string(), |f| f.to_string()),
				state.ticks_remaining(),
				if state.is_finished() { " [finished]" } else { "" }
			);
			last = frame;
		}
	}
	Ok(())
}

#[derive(Serialize)]
struct FrameSummary {
	index: usize,
	pieces: usize,
	pattern_span: usize,
	dplc_patterns: usize,
	bounds: Option<(i32, i32, u32, u32)>,
	mapping_hex: String,
}

#[derive(Serialize)]
struct ArtSummary<'a> {
	entry: &'a SpriteArtEntry,
	patterns: usize,
	bank_size: usize,
	frames: Vec<FrameSummary>,
}

fn run_export(source: &Source, sprite: &str, output: Option<&Path>) -> Result<()> {
	let mut cache = open_cache(source)?;
	let bundle = cache.get(sprite)?;
	let Some(entry) = cache.manifest().get(sprite) else {
		bail!("sprite '{sprite}' not in manifest");
	};

	let frames = bundle
		.mapping_frames()
		.iter()
		.zip(bundle.dplc_frames())
		.enumerate()
		.map(|(index, (mapping, dplc))| -> Result<FrameSummary> {
			Ok(FrameSummary {
				index,
				pieces: mapping.len(),
				pattern_span: mapping.pattern_span(),
				dplc_patterns: dplc.total_patterns(),
				bounds: mapping.bounds().map(|b| (b.left, b.top, b.width(), b.height())),
				mapping_hex: hex::encode(mapping.to_bytes()?),
			})
		})
		.collect::<Result<Vec<_>>>()?;

	let summary = ArtSummary {
		entry,
		patterns: bundle.patterns().len(),
		bank_size: bundle.bank_size(),
		frames,
	};
	let json = serde_json::to_string_pretty(&summary)?;

	match output {
		Some(path) => {
			std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
			println!("✓ Exported '{sprite}' to {}", path.display());
		}
		None => println!("{json}"),
	}
	Ok(())
}
