//! Sprites and draw requests.
//!
//! A [`Sprite`] is a single record: position, size, optional shared art, its
//! own animation playback state and a [`SpriteKind`] tag selecting how it
//! reacts to collisions.

use std::sync::Arc;

use spindash_types::art::{DplcFrame, MappingFrame, SpriteArtBundle, TilePattern};

use crate::{
	animation::AnimationState,
	error::AnimationError,
	monitor::{Collidable, Monitor, PlayerState},
};

/// Behavior variant of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteKind {
	/// Drawn only, ignores collisions
	#[default]
	Scenery,
	/// The player character
	Player,
	/// An item monitor
	Monitor(Monitor),
}

/// Everything the renderer needs to draw one sprite.
#[derive(Debug, Clone)]
pub struct DrawRequest<'a> {
	/// Sprite code
	pub code: &'a str,
	/// Layout of the current frame
	pub mapping: &'a MappingFrame,
	/// Load cues of the current frame
	pub dplc: &'a DplcFrame,
	/// Palette line
	pub palette_line: u8,
	/// VRAM pattern index the mapping is relative to
	pub base_pattern: u16,
	/// World position of the sprite anchor
	pub position: (i32, i32),
	/// Patterns to upload to the sprite's bank before drawing, in bank order;
	/// `None` when the resident patterns are still current
	pub uploads: Option<Vec<&'a TilePattern>>,
}

/// Rendering backend.
pub trait Renderer {
	/// Draws one sprite. Uploads, when present, must be applied first.
	fn draw(&mut self, request: &DrawRequest<'_>);
}

/// A positioned, drawable entity.
#[derive(Debug, Clone)]
pub struct Sprite {
	code: String,
	x: i32,
	y: i32,
	width: u32,
	height: u32,
	art: Option<Arc<SpriteArtBundle>>,
	animation: AnimationState,
	kind: SpriteKind,
}

impl Sprite {
	/// Creates a scenery sprite without art.
	pub fn new(code: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
		Self {
			code: code.into(),
			x,
			y,
			width,
			height,
			art: None,
			animation: AnimationState::new(),
			kind: SpriteKind::Scenery,
		}
	}

	/// Creates a monitor sprite with the fixed monitor size.
	pub fn monitor(code: impl Into<String>, x: i32, y: i32, monitor: Monitor) -> Self {
		let (width, height) = monitor.size();
		Self::new(code, x, y, width, height).with_kind(SpriteKind::Monitor(monitor))
	}

	/// Attaches art.
	pub fn with_art(mut self, art: Arc<SpriteArtBundle>) -> Self {
		self.art = Some(art);
		self
	}

	/// Sets the behavior variant.
	pub fn with_kind(mut self, kind: SpriteKind) -> Self {
		self.kind = kind;
		self
	}

	/// Unique code.
	pub fn code(&self) -> &str {
		&self.code
	}

	/// Anchor position.
	pub fn position(&self) -> (i32, i32) {
		(self.x, self.y)
	}

	/// Moves the anchor to `(x, y)`.
	pub fn set_position(&mut self, x: i32, y: i32) {
		self.x = x;
		self.y = y;
	}

	/// Moves the anchor by `(dx, dy)`.
	///
	/// The anchor saturates at the edges of the coordinate range.
	pub fn move_by(&mut self, dx: i32, dy: i32) {
		self.x = self.x.saturating_add(dx);
		self.y = self.y.saturating_add(dy);
	}

	/// Size in pixels.
	pub fn size(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Returns `true` if the centered boxes of `self` and `other` overlap.
	pub fn overlaps(&self, other: &Sprite) -> bool {
		let dx = u64::from(self.x.abs_diff(other.x));
		let dy = u64::from(self.y.abs_diff(other.y));
		dx * 2 < u64::from(self.width) + u64::from(other.width)
			&& dy * 2 < u64::from(self.height) + u64::from(other.height)
	}

	/// Attached art.
	pub fn art(&self) -> Option<&Arc<SpriteArtBundle>> {
		self.art.as_ref()
	}

	/// Behavior variant.
	pub fn kind(&self) -> SpriteKind {
		self.kind
	}

	/// Animation playback state.
	pub fn animation(&self) -> &AnimationState {
		&self.animation
	}

	/// Starts animation `name`; see [`AnimationState::set_animation`].
	///
	/// # Errors
	///
	/// Returns [`AnimationError::MissingArt`] for sprites without art and
	/// [`AnimationError::UnknownAnimation`] for undeclared names.
	pub fn set_animation(&mut self, name: &str) -> Result<bool, AnimationError> {
		let art = self.art.as_ref().ok_or_else(|| AnimationError::MissingArt {
			sprite: self.code.clone(),
		})?;
		self.animation.set_animation(art, name)
	}

	/// Advances the animation by one tick. Returns `true` if the frame changed.
	pub fn advance_animation(&mut self) -> bool {
		match &self.art {
			Some(art) => self.animation.advance(art),
			None => false,
		}
	}

	/// Mapping and DPLC frame currently shown.
	pub fn current_frame(&self) -> Option<(&MappingFrame, &DplcFrame)> {
		self.animation.current_frame(self.art.as_deref()?)
	}

	/// Builds the draw request for the current frame.
	///
	/// Pattern uploads are included when the frame changed since the last
	/// request and the frame loads its patterns dynamically.
	pub fn draw_request(&mut self) -> Option<DrawRequest<'_>> {
		let upload = self.animation.take_upload_pending();
		let art = self.art.as_deref()?;
		let (mapping, dplc) = self.animation.current_frame(art)?;

		let uploads = if upload && !dplc.is_empty() {
			dplc.resolve(art.patterns())
		} else {
			None
		};

		Some(DrawRequest {
			code: &self.code,
			mapping,
			dplc,
			palette_line: art.palette_line(),
			base_pattern: art.base_pattern(),
			position: (self.x, self.y),
			uploads,
		})
	}
}

impl Collidable for Sprite {
	fn on_collide(&mut self, other: &Sprite, player: &mut PlayerState) -> bool {
		match &mut self.kind {
			SpriteKind::Monitor(monitor) => monitor.on_collide(other, player),
			SpriteKind::Scenery | SpriteKind::Player => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use spindash_types::art::{Animation, AnimationStep, DplcEntry, MappingPiece, PatternStore};

	use super::*;
	use crate::monitor::MonitorKind;

	fn dynamic_art() -> Arc<SpriteArtBundle> {
		let patterns = (0..8u8).map(|i| TilePattern::from_pixels([i; 64])).collect();
		let piece = MappingPiece::new(0, -8, -8, 2, 2);
		let bundle = SpriteArtBundle::builder()
			.patterns(PatternStore::from_patterns(patterns))
			.mapping_frames(vec![MappingFrame::from_pieces(vec![piece]); 2])
			.dplc_frames(vec![
				DplcFrame::from_entries(vec![DplcEntry::new(4, 0)]),
				DplcFrame::from_entries(vec![DplcEntry::new(4, 4)]),
			])
			.palette_line(2)
			.base_pattern(0x500)
			.animation("spin", Animation::looping(vec![AnimationStep::new(0, 2), AnimationStep::new(1, 2)], 0))
			.build()
			.unwrap();
		Arc::new(bundle)
	}

	#[test]
	fn test_sprite_without_art() {
		let mut sprite = Sprite::new("rock", 10, 20, 16, 16);
		assert!(sprite.current_frame().is_none());
		assert!(sprite.draw_request().is_none());
		assert!(!sprite.advance_animation());
		assert_eq!(
			sprite.set_animation("idle").unwrap_err(),
			AnimationError::MissingArt {
				sprite: "rock".to_string()
			}
		);
	}

	#[test]
	fn test_draw_request_uploads_on_frame_change_only() {
		let mut sprite = Sprite::new("ring", 100, 50, 16, 16).with_art(dynamic_art());
		sprite.set_animation("spin").unwrap();

		let first = sprite.draw_request().unwrap();
		assert_eq!(first.palette_line, 2);
		assert_eq!(first.base_pattern, 0x500);
		assert_eq!(first.position, (100, 50));
		assert_eq!(first.uploads.as_ref().map(Vec::len), Some(4));

		assert!(sprite.draw_request().unwrap().uploads.is_none());

		sprite.advance_animation();
		sprite.advance_animation();
		let uploads = sprite.draw_request().unwrap().uploads.unwrap();
		assert_eq!(uploads[0].pixels()[0], 4);
	}

	#[test]
	fn test_overlap() {
		let a = Sprite::new("a", 0, 0, 20, 20);
		let b = Sprite::new("b", 19, 0, 20, 20);
		let c = Sprite::new("c", 20, 0, 20, 20);
		assert!(a.overlaps(&b));
		assert!(!a.overlaps(&c));
	}

	#[test]
	fn test_extreme_coordinates() {
		let far_left = Sprite::new("l", i32::MIN, 0, u32::MAX, 16);
		let far_right = Sprite::new("r", i32::MAX, 0, u32::MAX, 16);
		assert!(!far_left.overlaps(&far_right));
		assert!(far_right.overlaps(&Sprite::new("n", i32::MAX - 4, 0, 16, 16)));

		let mut sprite = Sprite::new("s", i32::MAX - 1, i32::MIN + 1, 8, 8);
		sprite.move_by(10, -10);
		assert_eq!(sprite.position(), (i32::MAX, i32::MIN));
	}

	#[test]
	fn test_collision_dispatch() {
		let player = Sprite::new("sonic", 0, 0, 20, 38).with_kind(SpriteKind::Player);
		let mut state = PlayerState::default();

		let mut scenery = Sprite::new("bush", 0, 0, 32, 32);
		assert!(!scenery.on_collide(&player, &mut state));

		let mut monitor = Sprite::monitor("m1", 0, 0, Monitor::new(MonitorKind::ExtraLife));
		assert_eq!(monitor.size(), (28, 32));
		assert!(monitor.on_collide(&player, &mut state));
		assert_eq!(state.lives, 1);
	}
}
