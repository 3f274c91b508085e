//! Server-side island state.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use tessera_core::Attributes;

use super::{Island, IslandError, RpcProxy, StateMap};
use crate::settings::IslandSettings;

static GLOBAL_STORE: Lazy<Arc<IslandStore>> = Lazy::new(|| Arc::new(IslandStore::new()));

/// State of one initialized island.
#[derive(Debug)]
pub struct IslandRecord {
	name: String,
	state: StateMap,
	definition: Arc<Island>,
	attributes: Attributes,
	calls: Arc<Mutex<()>>,
}

impl IslandRecord {
	fn new(definition: Arc<Island>) -> Self {
		Self {
			name: definition.name().to_string(),
			state: definition.initial_state().clone(),
			definition,
			attributes: Attributes::new(),
			calls: Arc::new(Mutex::new(())),
		}
	}

	/// Island name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Current state.
	pub fn state(&self) -> &StateMap {
		&self.state
	}

	/// Definition the island was initialized from.
	pub fn definition(&self) -> &Arc<Island> {
		&self.definition
	}

	/// Shallow merge: every key of `patch` replaces the key in the state.
	pub fn merge(&mut self, patch: StateMap) {
		for (key, value) in patch {
			self.state.insert(key, value);
		}
	}

	/// Replaces the whole state.
	pub fn replace(&mut self, state: StateMap) {
		self.state = state;
	}

	/// Wrapper attributes of the last page render, reused by RPC re-renders.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Replaces the wrapper attributes.
	pub fn set_attributes(&mut self, attributes: Attributes) {
		self.attributes = attributes;
	}

	/// Lock held for the whole of an RPC call on this island.
	pub(crate) fn call_lock(&self) -> Arc<Mutex<()>> {
		Arc::clone(&self.calls)
	}
}

/// Island records keyed by name.
///
/// The map sits behind a read-write lock and each record has its own mutex,
/// held only for short reads and writes. RPC calls on one island also take
/// the record's call lock, so they run one at a time while different
/// islands proceed in parallel.
#[derive(Debug, Default)]
pub struct IslandStore {
	records: RwLock<HashMap<String, Arc<Mutex<IslandRecord>>>>,
	settings: IslandSettings,
}

impl IslandStore {
	/// Creates an empty store with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty store with the given settings.
	pub fn with_settings(settings: IslandSettings) -> Self {
		Self {
			records: RwLock::new(HashMap::new()),
			settings,
		}
	}

	/// The process-wide store.
	pub fn global() -> Arc<IslandStore> {
		Arc::clone(&GLOBAL_STORE)
	}

	/// Island settings used for proxies and client scripts.
	pub fn settings(&self) -> &IslandSettings {
		&self.settings
	}

	/// Initializes the island on first use and returns its current state.
	pub fn ensure(&self, island: &Arc<Island>) -> StateMap {
		if let Some(record) = self.record(island.name()) {
			return record.lock().state().clone();
		}
		let record = {
			let mut records = self.records.write();
			Arc::clone(records.entry(island.name().to_string()).or_insert_with(|| {
				tracing::debug!(island = island.name(), "initialized island state");
				Arc::new(Mutex::new(IslandRecord::new(Arc::clone(island))))
			}))
		};
		let state = record.lock().state().clone();
		state
	}

	/// Returns the record of an island.
	pub fn record(&self, name: &str) -> Option<Arc<Mutex<IslandRecord>>> {
		self.records.read().get(name).cloned()
	}

	/// Returns a copy of an island's state.
	pub fn get_state(&self, name: &str) -> Option<StateMap> {
		self.record(name).map(|record| record.lock().state().clone())
	}

	/// Replaces an island's state.
	///
	/// # Errors
	///
	/// Returns [`IslandError::NotFound`] if the island was never initialized.
	pub fn set_state(&self, name: &str, state: StateMap) -> Result<(), IslandError> {
		let record = self
			.record(name)
			.ok_or_else(|| IslandError::NotFound(name.to_string()))?;
		record.lock().replace(state);
		Ok(())
	}

	/// Replaces the wrapper attributes of an island.
	///
	/// # Errors
	///
	/// Returns [`IslandError::NotFound`] if the island was never initialized.
	pub fn set_attributes(&self, name: &str, attributes: Attributes) -> Result<(), IslandError> {
		let record = self
			.record(name)
			.ok_or_else(|| IslandError::NotFound(name.to_string()))?;
		record.lock().set_attributes(attributes);
		Ok(())
	}

	/// Creates the RPC proxy of an initialized island.
	pub fn create_rpc_proxy(&self, name: &str) -> Result<RpcProxy, IslandError> {
		if !self.contains(name) {
			return Err(IslandError::NotFound(name.to_string()));
		}
		Ok(RpcProxy::new(name, &self.settings))
	}

	/// Removes an island. Returns whether it was present.
	pub fn clear_state(&self, name: &str) -> bool {
		let removed = self.records.write().remove(name).is_some();
		if removed {
			tracing::debug!(island = name, "cleared island state");
		}
		removed
	}

	/// Removes every island.
	pub fn clear(&self) {
		self.records.write().clear();
	}

	/// Checks whether an island is initialized.
	pub fn contains(&self, name: &str) -> bool {
		self.records.read().contains_key(name)
	}

	/// Number of initialized islands.
	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	/// Checks whether no island is initialized.
	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	/// Sorted names of the initialized islands.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.records.read().keys().cloned().collect();
		names.sort_unstable();
		names
	}
}
