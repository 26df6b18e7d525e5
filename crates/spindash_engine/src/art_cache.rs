//! Session-scoped sprite art cache.
//!
//! An [`ArtCache`] loads bundles from a data image on first use, following an
//! [`ArtManifest`], and hands out shared [`Arc`] handles afterwards. Each
//! session constructs its own cache, so separate sessions (and tests) never
//! see each other's art.

use std::{collections::HashMap, sync::Arc};

use log::{debug, info};
use spindash_types::art::{ArtManifest, LoadError, SpriteArtBundle};
use spindash_vfs::ByteSource;

/// Loaded sprite art, keyed by name.
pub struct ArtCache {
	manifest: ArtManifest,
	source: Box<dyn ByteSource>,
	bundles: HashMap<String, Arc<SpriteArtBundle>>,
}

impl ArtCache {
	/// Creates an empty cache reading from `source`.
	pub fn new(manifest: ArtManifest, source: impl ByteSource + 'static) -> Self {
		Self {
			manifest,
			source: Box::new(source),
			bundles: HashMap::new(),
		}
	}

	/// Manifest the cache loads from.
	pub fn manifest(&self) -> &ArtManifest {
		&self.manifest
	}

	/// Returns the bundle for `name`, loading it on first request.
	///
	/// # Errors
	///
	/// Returns a [`LoadError`] if the manifest has no entry for `name` or the
	/// art fails to load. Failures are not cached.
	pub fn get(&mut self, name: &str) -> Result<Arc<SpriteArtBundle>, LoadError> {
		if let Some(bundle) = self.bundles.get(name) {
			return Ok(Arc::clone(bundle));
		}

		let bundle = Arc::new(self.manifest.load_bundle(self.source.as_ref(), name)?);
		info!("loaded sprite art '{name}': {bundle}");
		self.bundles.insert(name.to_string(), Arc::clone(&bundle));
		Ok(bundle)
	}

	/// Returns an already loaded bundle without touching the data image.
	pub fn cached(&self, name: &str) -> Option<Arc<SpriteArtBundle>> {
		self.bundles.get(name).cloned()
	}

	/// Loads every manifest entry that is not cached yet.
	///
	/// # Errors
	///
	/// Stops at the first entry that fails to load.
	pub fn preload(&mut self) -> Result<usize, LoadError> {
		let names: Vec<String> = self.manifest.names().map(str::to_string).collect();
		for name in &names {
			self.get(name)?;
		}
		Ok(names.len())
	}

	/// Registers a bundle built in code under `name`, replacing any cached one.
	pub fn insert(&mut self, name: impl Into<String>, bundle: SpriteArtBundle) -> Arc<SpriteArtBundle> {
		let bundle = Arc::new(bundle);
		self.bundles.insert(name.into(), Arc::clone(&bundle));
		bundle
	}

	/// Drops a cached bundle. Sprites holding it keep their handle.
	pub fn evict(&mut self, name: &str) -> Option<Arc<SpriteArtBundle>> {
		let evicted = self.bundles.remove(name);
		if evicted.is_some() {
			debug!("evicted sprite art '{name}'");
		}
		evicted
	}

	/// Returns `true` if `name` is cached.
	pub fn contains(&self, name: &str) -> bool {
		self.bundles.contains_key(name)
	}

	/// Number of cached bundles.
	pub fn len(&self) -> usize {
		self.bundles.len()
	}

	/// Returns `true` if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.bundles.is_empty()
	}

	/// Drops every cached bundle.
	pub fn clear(&mut self) {
		self.bundles.clear();
	}
}

impl Default for ArtCache {
	fn default() -> Self {
		Self::new(ArtManifest::default(), spindash_vfs::MemoryImage::default())
	}
}

impl std::fmt::Debug for ArtCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ArtCache")
			.field("sprites", &self.manifest.sprites.len())
			.field("source_len", &self.source.len())
			.field("cached", &self.bundles.keys().collect::<Vec<_>>())
			.finish()
	}
}
