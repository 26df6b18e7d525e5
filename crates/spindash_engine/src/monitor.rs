//! Item monitors and the player state they change.
//!
//! Interactive sprites implement [`Collidable`]. A [`Monitor`] applies the
//! effect of its [`MonitorKind`] to the [`PlayerState`] and is consumed by the
//! hit; a broken shell has no effect and stays in the world.
//!
//! Timed power-ups end through a [`TimerKind::Gameplay`] timer from
//! [`MonitorKind::expiry_timer`], which the session registers on pickup.

use std::fmt::Display;

use log::debug;

use crate::{
	session::World,
	sprite::Sprite,
	timer::{Timer, TimerKind},
};

/// Monitor hitbox width in pixels.
pub const MONITOR_WIDTH: u32 = 28;

/// Monitor hitbox height in pixels.
pub const MONITOR_HEIGHT: u32 = 32;

/// Rings granted by a ring monitor.
pub const RING_BONUS: u32 = 10;

/// Duration of invincibility and speed shoes, 20 seconds at 60 Hz.
pub const POWER_UP_TICKS: i64 = 20 * 60;

/// Code of the timer that ends invincibility.
pub const INVINCIBILITY_TIMER: &str = "power-up.invincibility";

/// Code of the timer that ends speed shoes.
pub const SPEED_SHOES_TIMER: &str = "power-up.speed-shoes";

/// Something that reacts to being hit.
pub trait Collidable {
	/// Handles a collision with `other`, applying any effect to `player`.
	///
	/// Returns `true` if `self` is destroyed by the hit.
	fn on_collide(&mut self, other: &Sprite, player: &mut PlayerState) -> bool;
}

/// Player resources affected by monitors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
	/// Ring count
	pub rings: u32,
	/// Remaining lives
	pub lives: u32,
	/// Whether a shield is active
	pub shield: bool,
	/// Whether invincibility is active
	pub invincible: bool,
	/// Whether speed shoes are active
	pub speed_shoes: bool,
}

impl PlayerState {
	/// Creates a player with `lives` lives and nothing else.
	pub fn new(lives: u32) -> Self {
		Self {
			lives,
			..Self::default()
		}
	}

	/// Returns `true` while invincibility is active.
	pub fn is_invincible(&self) -> bool {
		self.invincible
	}

	/// Returns `true` while speed shoes are active.
	pub fn has_speed_shoes(&self) -> bool {
		self.speed_shoes
	}
}

/// What a monitor contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorKind {
	/// Ten rings
	Rings,
	/// Shield
	Shield,
	/// Temporary invincibility
	Invincibility,
	/// Temporary speed boost
	SpeedShoes,
	/// One extra life
	ExtraLife,
	/// Already opened shell
	Broken,
}

impl MonitorKind {
	/// Applies this kind's effect to `player`.
	pub fn apply(self, player: &mut PlayerState) {
		match self {
			Self::Rings => player.rings = player.rings.saturating_add(RING_BONUS),
			Self::Shield => player.shield = true,
			Self::Invincibility => player.invincible = true,
			Self::SpeedShoes => player.speed_shoes = true,
			Self::ExtraLife => player.lives = player.lives.saturating_add(1),
			Self::Broken => {}
		}
	}

	/// Timer that ends this kind's power-up after [`POWER_UP_TICKS`], for
	/// kinds whose effect is temporary.
	pub fn expiry_timer(self) -> Option<Timer<World>> {
		let timer = match self {
			Self::Invincibility => Timer::new(
				INVINCIBILITY_TIMER,
				TimerKind::Gameplay,
				POWER_UP_TICKS,
				|world: &mut World| {
					world.player_mut().invincible = false;
					Ok(())
				},
			),
			Self::SpeedShoes => {
				Timer::new(SPEED_SHOES_TIMER, TimerKind::Gameplay, POWER_UP_TICKS, |world: &mut World| {
					world.player_mut().speed_shoes = false;
					Ok(())
				})
			}
			Self::Rings | Self::Shield | Self::ExtraLife | Self::Broken => return None,
		};
		Some(timer)
	}
}

impl Display for MonitorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Rings => "rings",
			Self::Shield => "shield",
			Self::Invincibility => "invincibility",
			Self::SpeedShoes => "speed shoes",
			Self::ExtraLife => "extra life",
			Self::Broken => "broken",
		};
		f.write_str(name)
	}
}

/// An item monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Monitor {
	kind: MonitorKind,
}

impl Monitor {
	/// Creates a monitor of `kind`.
	pub fn new(kind: MonitorKind) -> Self {
		Self {
			kind,
		}
	}

	/// Contents.
	pub fn kind(&self) -> MonitorKind {
		self.kind
	}

	/// Hitbox size in pixels.
	pub fn size(&self) -> (u32, u32) {
		(MONITOR_WIDTH, MONITOR_HEIGHT)
	}
}

impl Collidable for Monitor {
	fn on_collide(&mut self, other: &Sprite, player: &mut PlayerState) -> bool {
		self.kind.apply(player);
		debug!("monitor ({}) hit by '{}'", self.kind, other.code());
		self.kind != MonitorKind::Broken
	}
}
