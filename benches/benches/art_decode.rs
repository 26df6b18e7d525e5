//! Benchmark suite for art table decoding and tick processing
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use spindash_benches::{generate_dplc_table, generate_mapping_table, generate_pattern_data, sizes};
use spindash_engine::{PlayerState, Session, Sprite, Timer, TimerKind, TimerManager};
use spindash_types::art::{
	Animation, AnimationStep, PatternStore, SpriteArtBundle, decode_dplc_table,
	decode_mapping_table, encode_mapping_table,
};

/// Benchmark raw 4bpp pattern decoding
fn bench_pattern_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("pattern_decode");

	for count in [16usize, 256, 2048] {
		let data = generate_pattern_data(count);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
			b.iter(|| black_box(PatternStore::from_bytes(black_box(data))));
		});
	}

	group.finish();
}

/// Benchmark mapping and DPLC table decoding
fn bench_table_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("table_decode");

	for (name, (frames, pieces)) in
		[("small", sizes::SMALL), ("medium", sizes::MEDIUM), ("large", sizes::LARGE)]
	{
		let mappings = generate_mapping_table(frames, pieces);
		group.throughput(Throughput::Elements((frames * pieces) as u64));
		group.bench_with_input(BenchmarkId::new("mapping", name), &mappings, |b, data| {
			b.iter(|| black_box(decode_mapping_table(black_box(data))));
		});

		let dplc = generate_dplc_table(frames, pieces);
		group.bench_with_input(BenchmarkId::new("dplc", name), &dplc, |b, data| {
			b.iter(|| black_box(decode_dplc_table(black_box(data))));
		});
	}

	group.finish();
}

/// Benchmark mapping table encoding, including frame deduplication
fn bench_table_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("table_encode");

	let (frames, pieces) = sizes::LARGE;
	let Ok(decoded) = decode_mapping_table(&generate_mapping_table(frames, pieces)) else {
		eprintln!("Warning: Could not decode synthetic mapping table");
		return;
	};

	group.bench_function("mapping_large", |b| {
		b.iter(|| black_box(encode_mapping_table(black_box(&decoded))));
	});

	group.finish();
}

/// Benchmark a session tick with many animated sprites
fn bench_session_tick(c: &mut Criterion) {
	let mut group = c.benchmark_group("session_tick");

	let (frames, pieces) = sizes::MEDIUM;
	let bundle = decode_mapping_table(&generate_mapping_table(frames, pieces))
		.map_err(|e| e.to_string())
		.and_then(|mapping_frames| {
			let steps = (0..frames).map(|f| AnimationStep::new(f, 2)).collect();
			SpriteArtBundle::builder()
				.patterns(PatternStore::from_bytes(&generate_pattern_data(pieces * 4)).map_err(|e| e.to_string())?)
				.mapping_frames(mapping_frames)
				.animation("loop", Animation::looping(steps, 0))
				.build()
				.map_err(|e| e.to_string())
		});
	let bundle = match bundle {
		Ok(bundle) => Arc::new(bundle),
		Err(e) => {
			eprintln!("Warning: Could not build benchmark art: {e}");
			return;
		}
	};

	for count in [16usize, 256] {
		let mut session = Session::new(Default::default(), PlayerState::new(3));
		for i in 0..count {
			let mut sprite = Sprite::new(format!("obj{i}"), i as i32 * 16, 0, 16, 16).with_art(Arc::clone(&bundle));
			let _ = sprite.set_animation("loop");
			session.spawn(sprite);
		}

		group.throughput(Throughput::Elements(count as u64));
		group.bench_function(BenchmarkId::new("animated_sprites", count), |b| {
			b.iter(|| black_box(session.tick()));
		});
	}

	group.bench_function("timers_1000", |b| {
		b.iter(|| {
			let mut timers = TimerManager::new();
			for i in 0..1000i64 {
				timers.register(Timer::new(format!("t{i}"), TimerKind::Other, i % 8, |n: &mut u64| {
					*n += 1;
					Ok(())
				}));
			}
			let mut fired = 0u64;
			for _ in 0..8 {
				timers.tick(&mut fired);
			}
			black_box(fired)
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_pattern_decode,
	bench_table_decode,
	bench_table_encode,
	bench_session_tick,
);

criterion_main!(benches);
