//! Game session.
//!
//! A [`Session`] owns the art cache, the timer registry and the [`World`]
//! (sprites and player state). Nothing here is global: every session is
//! constructed explicitly and dropped with everything it owns.
//!
//! One [`tick`](Session::tick) runs, in order:
//!
//! 1. the timers, with mutable access to the world;
//! 2. animation playback of every sprite.
//!
//! Timed power-ups are gameplay timers too: collecting an invincibility or
//! speed shoes monitor through [`Session::collide`] registers the timer that
//! ends the effect.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, trace};
use spindash_types::art::SpriteArtBundle;

use crate::{
	art_cache::ArtCache,
	error::{AnimationError, SessionError},
	monitor::{Collidable, MonitorKind, PlayerState},
	sprite::{Renderer, Sprite, SpriteKind},
	timer::{TickReport, Timer, TimerManager},
};

/// Sprites and player state; the context timer actions run against.
#[derive(Debug, Clone, Default)]
pub struct World {
	sprites: BTreeMap<String, Sprite>,
	player: PlayerState,
}

impl World {
	/// Creates an empty world.
	pub fn new(player: PlayerState) -> Self {
		Self {
			sprites: BTreeMap::new(),
			player,
		}
	}

	/// Adds `sprite`, replacing and returning any sprite with the same code.
	pub fn spawn(&mut self, sprite: Sprite) -> Option<Sprite> {
		debug!("spawn '{}' at {:?}", sprite.code(), sprite.position());
		self.sprites.insert(sprite.code().to_string(), sprite)
	}

	/// Removes the sprite with `code`.
	pub fn despawn(&mut self, code: &str) -> Option<Sprite> {
		let sprite = self.sprites.remove(code);
		if sprite.is_some() {
			debug!("despawn '{code}'");
		}
		sprite
	}

	/// Looks up a sprite.
	pub fn sprite(&self, code: &str) -> Option<&Sprite> {
		self.sprites.get(code)
	}

	/// Looks up a sprite mutably.
	pub fn sprite_mut(&mut self, code: &str) -> Option<&mut Sprite> {
		self.sprites.get_mut(code)
	}

	/// All sprites in code order.
	pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
		self.sprites.values()
	}

	/// Number of sprites.
	pub fn len(&self) -> usize {
		self.sprites.len()
	}

	/// Returns `true` if there are no sprites.
	pub fn is_empty(&self) -> bool {
		self.sprites.is_empty()
	}

	/// Player state.
	pub fn player(&self) -> &PlayerState {
		&self.player
	}

	/// Player state, mutably.
	pub fn player_mut(&mut self) -> &mut PlayerState {
		&mut self.player
	}

	/// Starts animation `name` on sprite `code`.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::UnknownSprite`] if no such sprite exists,
	/// otherwise see [`Sprite::set_animation`].
	pub fn set_animation(&mut self, code: &str, name: &str) -> Result<bool, AnimationError> {
		self.sprites
			.get_mut(code)
			.ok_or_else(|| AnimationError::UnknownSprite {
				sprite: code.to_string(),
			})?
			.set_animation(name)
	}

	/// Advances every sprite's animation by one tick.
	///
	/// Returns the number of sprites whose frame changed.
	pub fn advance_animations(&mut self) -> usize {
		self.sprites.values_mut().map(Sprite::advance_animation).filter(|&changed| changed).count()
	}

	/// Resolves a collision reported between `target` and `other`.
	///
	/// `target` reacts to the hit; if it is destroyed it is removed from the
	/// world. Returns whether it was destroyed.
	///
	/// # Errors
	///
	/// Returns [`SessionError::UnknownSprite`] if either sprite is missing.
	pub fn collide(&mut self, target: &str, other: &str) -> Result<bool, SessionError> {
		if !self.sprites.contains_key(other) {
			return Err(SessionError::UnknownSprite(other.to_string()));
		}
		let mut sprite =
			self.sprites.remove(target).ok_or_else(|| SessionError::UnknownSprite(target.to_string()))?;

		let destroyed = match self.sprites.get(other) {
			Some(other) => sprite.on_collide(other, &mut self.player),
			// `target` and `other` are the same sprite
			None => false,
		};

		if destroyed {
			debug!("'{target}' destroyed by '{other}'");
		} else {
			self.sprites.insert(target.to_string(), sprite);
		}
		Ok(destroyed)
	}
}

/// One running game session.
#[derive(Debug, Default)]
pub struct Session {
	art: ArtCache,
	timers: TimerManager<World>,
	world: World,
	ticks: u64,
}

impl Session {
	/// Creates a session drawing art from `art`.
	pub fn new(art: ArtCache, player: PlayerState) -> Self {
		Self {
			art,
			timers: TimerManager::new(),
			world: World::new(player),
			ticks: 0,
		}
	}

	/// Art cache.
	pub fn art(&self) -> &ArtCache {
		&self.art
	}

	/// Art cache, mutably.
	pub fn art_mut(&mut self) -> &mut ArtCache {
		&mut self.art
	}

	/// Loads (or reuses) the art named `name`.
	///
	/// # Errors
	///
	/// See [`ArtCache::get`].
	pub fn load_art(&mut self, name: &str) -> Result<Arc<SpriteArtBundle>, SessionError> {
		Ok(self.art.get(name)?)
	}

	/// Timer registry.
	pub fn timers(&self) -> &TimerManager<World> {
		&self.timers
	}

	/// Timer registry, mutably.
	pub fn timers_mut(&mut self) -> &mut TimerManager<World> {
		&mut self.timers
	}

	/// Registers a timer; see [`TimerManager::register`].
	pub fn register_timer(&mut self, timer: Timer<World>) -> Option<Timer<World>> {
		self.timers.register(timer)
	}

	/// World state.
	pub fn world(&self) -> &World {
		&self.world
	}

	/// World state, mutably.
	pub fn world_mut(&mut self) -> &mut World {
		&mut self.world
	}

	/// Number of ticks run so far.
	pub fn elapsed_ticks(&self) -> u64 {
		self.ticks
	}

	/// Adds a sprite to the world.
	pub fn spawn(&mut self, sprite: Sprite) -> Option<Sprite> {
		self.world.spawn(sprite)
	}

	/// Creates a sprite with the art named `art`, starts `animation` on it when
	/// given and adds it to the world.
	///
	/// # Errors
	///
	/// Fails if the art cannot be loaded or the animation is unknown; the
	/// world is left unchanged.
	pub fn spawn_with_art(
		&mut self,
		sprite: Sprite,
		art: &str,
		animation: Option<&str>,
	) -> Result<&Sprite, SessionError> {
		let mut sprite = sprite.with_art(self.art.get(art)?);
		if let Some(name) = animation {
			sprite.set_animation(name)?;
		}

		let code = sprite.code().to_string();
		self.world.spawn(sprite);
		self.world.sprite(&code).ok_or(SessionError::UnknownSprite(code))
	}

	/// Removes a sprite from the world.
	pub fn despawn(&mut self, code: &str) -> Option<Sprite> {
		self.world.despawn(code)
	}

	/// See [`World::collide`].
	///
	/// A destroyed monitor with a timed power-up registers its expiry timer,
	/// replacing any running one so a second pickup restarts the duration.
	///
	/// # Errors
	///
	/// Returns [`SessionError::UnknownSprite`] if either sprite is missing.
	pub fn collide(&mut self, target: &str, other: &str) -> Result<bool, SessionError> {
		let monitor = match self.world.sprite(target).map(Sprite::kind) {
			Some(SpriteKind::Monitor(monitor)) => Some(monitor.kind()),
			_ => None,
		};

		let destroyed = self.world.collide(target, other)?;
		if destroyed && let Some(timer) = monitor.and_then(MonitorKind::expiry_timer) {
			debug!("'{}' runs for {} ticks", timer.code(), timer.remaining());
			self.timers.register(timer);
		}
		Ok(destroyed)
	}

	/// Runs one tick: timers, then animations.
	pub fn tick(&mut self) -> TickReport {
		self.ticks += 1;
		let report = self.timers.tick(&mut self.world);
		let changed = self.world.advance_animations();

		trace!(
			"tick {}: {} timers fired, {} frames changed",
			self.ticks,
			report.fired.len(),
			changed
		);
		report
	}

	/// Sends a draw request for every sprite that has a frame to show.
	///
	/// Returns the number of requests sent.
	pub fn render(&mut self, renderer: &mut impl Renderer) -> usize {
		let mut drawn = 0;
		for sprite in self.world.sprites.values_mut() {
			if let Some(request) = sprite.draw_request() {
				renderer.draw(&request);
				drawn += 1;
			}
		}
		drawn
	}
}

#[cfg(test)]
mod tests {
	use spindash_types::art::{
		Animation, AnimationStep, DplcEntry, DplcFrame, MappingFrame, MappingPiece, PatternStore,
		TilePattern,
	};

	use super::*;
	use crate::{
		error::TimerFailure,
		monitor::{INVINCIBILITY_TIMER, Monitor, POWER_UP_TICKS},
		sprite::DrawRequest,
		timer::TimerKind,
	};

	fn sonic_art() -> SpriteArtBundle {
		let patterns = (0..16u8).map(|i| TilePattern::from_pixels([i & 0x0F; 64])).collect();
		let frame = MappingFrame::from_pieces(vec![MappingPiece::new(0, -8, -16, 2, 2)]);
		SpriteArtBundle::builder()
			.patterns(PatternStore::from_patterns(patterns))
			.mapping_frames(vec![frame; 4])
			.dplc_frames((0..4).map(|i| DplcFrame::from_entries(vec![DplcEntry::new(4, i * 4)])).collect())
			.animation("stand", Animation::looping(vec![AnimationStep::new(0, 60)], 0))
			.animation(
				"run",
				Animation::looping(vec![AnimationStep::new(1, 2), AnimationStep::new(2, 2), AnimationStep::new(3, 2)], 0),
			)
			.build()
			.unwrap()
	}

	fn session() -> Session {
		let mut art = ArtCache::default();
		art.insert("sonic", sonic_art());
		let mut session = Session::new(art, PlayerState::new(3));
		let sonic = Sprite::new("sonic", 0, 0, 20, 38).with_kind(SpriteKind::Player);
		session.spawn_with_art(sonic, "sonic", Some("stand")).unwrap();
		session
	}

	#[derive(Default)]
	struct Recorder {
		frames: Vec<(String, usize)>,
	}

	impl Renderer for Recorder {
		fn draw(&mut self, request: &DrawRequest<'_>) {
			let uploaded = request.uploads.as_ref().map_or(0, Vec::len);
			self.frames.push((request.code.to_string(), uploaded));
		}
	}

	#[test_log::test]
	fn test_timer_animation_switch_applies_same_tick() {
		let mut session = session();
		session.register_timer(Timer::new("start-run", TimerKind::Animation, 1, |world: &mut World| {
			world.set_animation("sonic", "run")?;
			Ok(())
		}));

		let report = session.tick();
		assert!(report.is_clean());

		// the switch shows step 0 for 2 ticks, and this tick already counted one
		let sonic = session.world().sprite("sonic").unwrap();
		assert_eq!(sonic.animation().current(), Some("run"));
		assert_eq!(sonic.animation().ticks_remaining(), 1);

		session.tick();
		let sonic = session.world().sprite("sonic").unwrap();
		assert_eq!(sonic.animation().frame_index(sonic.art().unwrap()), Some(2));
	}

	#[test_log::test]
	fn test_failing_timer_does_not_stop_the_tick() {
		let mut session = session();
		session.register_timer(Timer::new("bad", TimerKind::Gameplay, 1, |world: &mut World| {
			world.set_animation("tails", "run")?;
			Ok(())
		}));
		session.register_timer(Timer::new("ring", TimerKind::Gameplay, 1, |world: &mut World| {
			world.player_mut().rings += 1;
			Ok(())
		}));

		let report = session.tick();
		assert_eq!(report.fired.len(), 2);
		assert_eq!(report.failures.len(), 1);
		assert_eq!(
			report.failures[0].failure,
			TimerFailure::Animation(AnimationError::UnknownSprite {
				sprite: "tails".to_string()
			})
		);
		assert_eq!(session.world().player().rings, 1);
		assert!(session.timers().is_empty());
	}

	#[test]
	fn test_monitor_collision_removes_monitor() {
		let mut session = session();
		session.spawn(Sprite::monitor("m-rings", 40, 0, Monitor::new(MonitorKind::Rings)));
		session.spawn(Sprite::monitor("m-broken", 80, 0, Monitor::new(MonitorKind::Broken)));

		assert!(session.collide("m-rings", "sonic").unwrap());
		assert!(session.world().sprite("m-rings").is_none());
		assert_eq!(session.world().player().rings, 10);

		assert!(!session.collide("m-broken", "sonic").unwrap());
		assert!(session.world().sprite("m-broken").is_some());

		assert!(matches!(session.collide("m-rings", "sonic"), Err(SessionError::UnknownSprite(code)) if code == "m-rings"));
		assert!(matches!(session.collide("sonic", "knuckles"), Err(SessionError::UnknownSprite(_))));
		assert!(session.world().sprite("sonic").is_some());
	}

	#[test]
	fn test_render_uploads_only_after_frame_change() {
		let mut session = session();
		session.spawn(Sprite::new("bush", 0, 0, 32, 32));
		session.world_mut().set_animation("sonic", "run").unwrap();

		let mut recorder = Recorder::default();
		assert_eq!(session.render(&mut recorder), 1);
		assert_eq!(recorder.frames, vec![("sonic".to_string(), 4)]);

		session.tick();
		session.render(&mut recorder);
		assert_eq!(recorder.frames[1], ("sonic".to_string(), 0));

		session.tick();
		session.render(&mut recorder);
		assert_eq!(recorder.frames[2], ("sonic".to_string(), 4));
	}

	#[test]
	fn test_spawn_with_unknown_art_leaves_world_unchanged() {
		let mut session = session();
		let before = session.world().len();
		let err = session.spawn_with_art(Sprite::new("ghost", 0, 0, 8, 8), "ghost", None).unwrap_err();
		assert!(matches!(err, SessionError::Load(_)));

		let err = session.spawn_with_art(Sprite::new("sonic2", 0, 0, 8, 8), "sonic", Some("fly")).unwrap_err();
		assert!(matches!(err, SessionError::Animation(AnimationError::UnknownAnimation { .. })));
		assert_eq!(session.world().len(), before);
	}

	#[test]
	fn test_power_ups_wear_off_through_timers() {
		let mut session = session();
		session.spawn(Sprite::monitor("m-star", 40, 0, Monitor::new(MonitorKind::Invincibility)));
		session.spawn(Sprite::monitor("m-star2", 80, 0, Monitor::new(MonitorKind::Invincibility)));

		assert!(session.collide("m-star", "sonic").unwrap());
		assert!(session.world().player().is_invincible());
		let timer = session.timers().lookup(INVINCIBILITY_TIMER).unwrap();
		assert_eq!(timer.kind(), TimerKind::Gameplay);
		assert_eq!(timer.remaining(), POWER_UP_TICKS);

		// A second pickup halfway through restarts the duration
		for _ in 0..POWER_UP_TICKS / 2 {
			session.tick();
		}
		assert!(session.collide("m-star2", "sonic").unwrap());
		for _ in 0..POWER_UP_TICKS - 1 {
			session.tick();
		}
		assert!(session.world().player().is_invincible());

		let report = session.tick();
		assert_eq!(report.fired, vec![INVINCIBILITY_TIMER.to_string()]);
		assert!(!session.world().player().is_invincible());
		assert!(session.timers().is_empty());
	}

	#[test]
	fn test_permanent_power_ups_register_no_timer() {
		let mut session = session();
		session.spawn(Sprite::monitor("m-shield", 40, 0, Monitor::new(MonitorKind::Shield)));
		assert!(session.collide("m-shield", "sonic").unwrap());
		assert!(session.world().player().shield);
		assert!(session.timers().is_empty());

		// Power-ups applied outside a monitor hit have no expiry
		MonitorKind::SpeedShoes.apply(session.world_mut().player_mut());
		for _ in 0..POWER_UP_TICKS {
			session.tick();
		}
		assert!(session.world().player().has_speed_shoes());
	}
}
