//! Data image → manifest → bundle → animated sprite.

use std::sync::Arc;

use spindash::prelude::*;
use spindash::spindash_types::art::{decode_dplc_table, decode_mapping_table, encode_dplc_table, encode_mapping_table};

use crate::{fixture, init_logger};

fn frame_of(session: &Session, code: &str) -> Option<usize> {
	let sprite = session.world().sprite(code)?;
	sprite.animation().frame_index(sprite.art()?)
}

#[test]
fn test_manifest_file_loads_through_config() {
	init_logger();
	let fixture = fixture::build();
	let path = fixture::write_manifest("manifest", &fixture.manifest);

	let manifest = ArtManifest::open(&path);
	let _ = std::fs::remove_file(&path);
	let manifest = manifest.unwrap();

	assert_eq!(manifest.names().collect::<Vec<_>>(), vec!["sonic"]);
	let entry = manifest.get("sonic").unwrap();
	assert_eq!(entry.base_pattern, 1920);
	assert_eq!(entry.animations.len(), 4);
	assert_eq!(entry.animations["hurt"].allowed_frames.iter().copied().collect::<Vec<_>>(), vec![4]);
}

#[test]
fn test_tables_round_trip_through_image() {
	let fixture = fixture::build();

	let mappings = decode_mapping_table(&fixture.mapping_table).unwrap();
	assert_eq!(mappings, fixture::mapping_frames());
	assert_eq!(encode_mapping_table(&mappings).unwrap(), fixture.mapping_table);

	let dplc = decode_dplc_table(&fixture.dplc_table).unwrap();
	assert_eq!(dplc, fixture::dplc_frames());
	assert_eq!(encode_dplc_table(&dplc).unwrap(), fixture.dplc_table);

	// Identical frames share one offset
	assert!(fixture.mapping_table.len() < 2 * fixture::FRAME_COUNT + fixture::FRAME_COUNT * 10);
}

#[test]
fn test_bundle_from_image() {
	init_logger();
	let mut session = fixture::session();
	let bundle = session.load_art("sonic").unwrap();

	assert_eq!(bundle.frame_count(), fixture::FRAME_COUNT);
	assert_eq!(bundle.patterns().len(), 20);
	assert_eq!(bundle.bank_size(), 4);
	assert_eq!(bundle.frame_delay(), 2);
	assert_eq!(bundle.animations().len(), 4);

	let roll = bundle.animation("roll").unwrap();
	assert_eq!(roll.steps(), &[AnimationStep::new(0, 1), AnimationStep::new(1, 1)]);
	assert_eq!(roll.loop_target(), Some(0));

	let hurt = bundle.animation("hurt").unwrap();
	assert!(hurt.is_one_shot());
	assert_eq!(hurt.steps(), &[AnimationStep::new(4, 4)]);

	// the spawned sprite shares the cached bundle
	let sonic = session.world().sprite("sonic").unwrap();
	assert!(Arc::ptr_eq(sonic.art().unwrap(), &bundle));
}

#[test]
fn test_walk_cycle_timing() {
	let mut session = fixture::session();
	session.world_mut().set_animation("sonic", "walk").unwrap();
	assert_eq!(frame_of(&session, "sonic"), Some(2));

	for _ in 0..3 {
		session.tick();
	}
	assert_eq!(frame_of(&session, "sonic"), Some(2));

	session.tick();
	assert_eq!(frame_of(&session, "sonic"), Some(3));

	for _ in 0..8 {
		session.tick();
	}
	assert_eq!(frame_of(&session, "sonic"), Some(2));
	assert_eq!(session.elapsed_ticks(), 12);
}

#[test]
fn test_set_animation_mid_walk_is_idempotent() {
	let mut session = fixture::session();
	session.world_mut().set_animation("sonic", "walk").unwrap();
	for _ in 0..6 {
		session.tick();
	}
	let before = session.world().sprite("sonic").unwrap().animation().clone();

	for _ in 0..4 {
		assert!(!session.world_mut().set_animation("sonic", "walk").unwrap());
	}
	assert_eq!(session.world().sprite("sonic").unwrap().animation(), &before);

	let err = session.world_mut().set_animation("sonic", "spindash").unwrap_err();
	assert_eq!(
		err,
		AnimationError::UnknownAnimation {
			name: "spindash".to_string()
		}
	);
	assert_eq!(session.world().sprite("sonic").unwrap().animation(), &before);
}

#[test]
fn test_one_shot_script_holds() {
	let mut session = fixture::session();
	session.world_mut().set_animation("sonic", "hurt").unwrap();
	for _ in 0..20 {
		session.tick();
	}
	let sonic = session.world().sprite("sonic").unwrap();
	assert!(sonic.animation().is_finished());
	assert_eq!(frame_of(&session, "sonic"), Some(4));
}

#[derive(Default)]
struct Recorder {
	draws: Vec<(String, (i32, i32), bool, Option<Vec<u8>>)>,
}

impl Renderer for Recorder {
	fn draw(&mut self, request: &DrawRequest<'_>) {
		let uploads = request.uploads.as_ref().map(|patterns| patterns.iter().map(|p| p.pixels()[0]).collect());
		let h_flip = request.mapping.pieces().iter().any(|p| p.h_flip);
		self.draws.push((request.code.to_string(), request.position, h_flip, uploads));
	}
}

#[test]
fn test_render_sends_dplc_uploads() {
	let mut session = fixture::session();
	session.world_mut().set_animation("sonic", "walk").unwrap();

	let mut renderer = Recorder::default();
	session.render(&mut renderer);
	assert_eq!(renderer.draws[0], ("sonic".to_string(), (160, 112), false, Some(vec![8, 9, 10, 11])));

	for _ in 0..4 {
		session.tick();
	}
	session.render(&mut renderer);
	session.render(&mut renderer);
	assert_eq!(renderer.draws[1], ("sonic".to_string(), (160, 112), true, Some(vec![12, 13, 14, 15])));
	assert_eq!(renderer.draws[2].3, None);
}
