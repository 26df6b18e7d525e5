#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `spindash-rs` turns the sprite art of a Mega Drive style data image
//! (4bpp patterns, mapping frames, dynamic pattern load cues and animation
//! scripts) into validated, shareable sprite art and drives it tick by tick.
//!
//! ```
//! use spindash::prelude::*;
//!
//! let mut timers: TimerManager<u32> = TimerManager::new();
//! timers.register(Timer::new("score", TimerKind::Gameplay, 2, |score: &mut u32| {
//!     *score += 100;
//!     Ok(())
//! }));
//!
//! let mut score = 0;
//! timers.tick(&mut score);
//! timers.tick(&mut score);
//! assert_eq!(score, 100);
//! assert!(timers.is_empty());
//! ```
//!
pub use spindash_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use spindash_dylib;
