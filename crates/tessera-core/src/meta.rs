//! Plugin payloads carried by component nodes.
//!
//! A component's `meta` bag is keyed by type, so each plugin looks up only
//! the payload type it understands (a style record, an island definition,
//! a slot descriptor) without the node model knowing about any of them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed payload map attached to a [`Component`](crate::Component).
///
/// Values are shared through `Arc`, so cloning a component never deep-copies
/// its payloads.
#[derive(Clone, Default)]
pub struct ComponentMeta {
	entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ComponentMeta {
	/// Creates an empty meta bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a payload, replacing any previous payload of the same type.
	pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
		self.entries.insert(TypeId::of::<T>(), Arc::new(value));
	}

	/// Returns the payload of type `T`, if present.
	pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.entries
			.get(&TypeId::of::<T>())
			.and_then(|value| value.downcast_ref::<T>())
	}

	/// Checks whether a payload of type `T` is present.
	pub fn contains<T: Any + Send + Sync>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<T>())
	}

	/// Removes the payload of type `T`. Returns whether one was present.
	pub fn remove<T: Any + Send + Sync>(&mut self) -> bool {
		self.entries.remove(&TypeId::of::<T>()).is_some()
	}

	/// Returns the number of payloads.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Checks whether the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl std::fmt::Debug for ComponentMeta {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentMeta")
			.field("payload_count", &self.entries.len())
			.finish()
	}
}
