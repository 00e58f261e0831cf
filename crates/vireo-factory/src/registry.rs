//! Key-indexed creator registry.
//!
//! A registry is an ordered multi-map from key to one or more creators.
//! Keys are unique unless a registration explicitly asks for
//! multi-valued binding; candidates under one key keep registration order.
//!
//! One process-wide instance exists per `(Key, Object, Argument)`
//! combination, built lazily on first access through [`Registry::global`].
//! Registration is expected to finish before the first simulation step;
//! after that the contents are treated as read-only.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::creator::Creator;
use crate::log::{log_registration, RegistrationRecord};

type GlobalSlot = &'static (dyn Any + Send + Sync);

static GLOBALS: OnceLock<RwLock<HashMap<TypeId, GlobalSlot>>> = OnceLock::new();

/// Ordered multi-map from key to type-erased creators.
pub struct Registry<K, O: 'static, A: ?Sized + 'static> {
    entries: RwLock<BTreeMap<K, Vec<Arc<dyn Creator<O, A>>>>>,
}

impl<K, O, A> Registry<K, O, A>
where
    K: Ord + Clone + Display + Send + Sync + 'static,
    O: 'static,
    A: ?Sized + 'static,
{
    /// Creates an empty, standalone registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the process-wide registry for this `(K, O, A)` combination.
    ///
    /// The first call constructs it; later calls return the same instance.
    /// The instance lives until process exit.
    pub fn global() -> &'static Self {
        let globals = GLOBALS.get_or_init(|| RwLock::new(HashMap::new()));
        let id = TypeId::of::<Self>();

        if let Some(slot) = globals.read().get(&id).copied() {
            return Self::downcast(slot);
        }

        let mut map = globals.write();
        let slot = *map.entry(id).or_insert_with(|| {
            tracing::debug!(registry = type_name::<Self>(), "creating global registry");
            let leaked: GlobalSlot = Box::leak(Box::new(Self::new()));
            leaked
        });
        Self::downcast(slot)
    }

    fn downcast(slot: GlobalSlot) -> &'static Self {
        match slot.downcast_ref::<Self>() {
            Some(registry) => registry,
            None => unreachable!("global registry slot is keyed by its own TypeId"),
        }
    }

    /// Binds `creator` to `key`.
    ///
    /// Fails without touching the registry when `key` is already bound and
    /// `multi` is false. Successful registrations are appended to the
    /// process-wide registration log.
    pub fn register(&self, key: K, creator: Arc<dyn Creator<O, A>>, multi: bool) -> bool {
        let mut entries = self.entries.write();
        if !multi && entries.contains_key(&key) {
            tracing::warn!(
                object = type_name::<O>(),
                class = creator.produced_type(),
                key = %key,
                "factory key already registered"
            );
            return false;
        }

        log_registration(RegistrationRecord::new(
            type_name::<O>(),
            creator.produced_type(),
            key.to_string(),
            multi,
        ));
        entries.entry(key).or_default().push(creator);
        true
    }

    /// Creates an object through the creators bound to `key`.
    ///
    /// Candidates are tried in registration order; the first one that
    /// yields an object wins. Unknown keys give `None`.
    pub fn create(&self, key: &K, arg: &A) -> Option<O> {
        let candidates = self.candidates(key);
        if candidates.is_empty() {
            tracing::debug!(object = type_name::<O>(), key = %key, "factory key not found");
            return None;
        }
        candidates
            .iter()
            .find_map(|creator| creator.create_instance(arg))
    }

    /// Creates an object with the first creator, across all keys, that
    /// accepts `arg`.
    pub fn create_any(&self, arg: &A) -> Option<O> {
        let creators: Vec<Arc<dyn Creator<O, A>>> =
            self.entries.read().values().flatten().cloned().collect();
        creators
            .iter()
            .find_map(|creator| creator.create_instance(arg))
    }

    /// Creators bound to `key`, in registration order.
    ///
    /// The returned handles are detached from the lock, so creators may
    /// themselves consult the registry.
    pub fn candidates(&self, key: &K) -> Vec<Arc<dyn Creator<O, A>>> {
        self.entries.read().get(key).cloned().unwrap_or_default()
    }

    /// Produced-type names bound to `key`, in registration order.
    pub fn produced_types(&self, key: &K) -> Vec<&'static str> {
        self.entries
            .read()
            .get(key)
            .map(|list| list.iter().map(|c| c.produced_type()).collect())
            .unwrap_or_default()
    }

    /// Returns true if at least one creator is bound to `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All bound keys, in key order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    /// Total number of registered creators (a multi-valued key counts once
    /// per creator).
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, O, A> Default for Registry<K, O, A>
where
    K: Ord + Clone + Display + Send + Sync + 'static,
    O: 'static,
    A: ?Sized + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, O, A> fmt::Debug for Registry<K, O, A>
where
    K: Ord + fmt::Debug,
    O: 'static,
    A: ?Sized + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut map = f.debug_map();
        for (key, creators) in entries.iter() {
            let types: Vec<&str> = creators.iter().map(|c| c.produced_type()).collect();
            map.entry(key, &types);
        }
        map.finish()
    }
}
