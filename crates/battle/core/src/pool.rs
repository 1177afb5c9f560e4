//! Recycled visual effect instances keyed by effect name.
//!
//! The pool only tracks instance lifecycle (active flag, transform, parent);
//! it never touches gameplay state. Instances are addressed by
//! [`EffectInstanceId`] handles that stay valid until the instance is
//! destroyed.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::error::{BattleError, ErrorSeverity};
use crate::state::{CombatantId, Position, Rotation};

/// Handle to one pooled effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstanceId(pub u64);

/// A pooled effect instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    pub id: EffectInstanceId,
    pub key: String,
    pub position: Position,
    pub rotation: Rotation,
    /// Combatant the effect is attached to, if any.
    pub parent: Option<CombatantId>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("no pool registered for effect key '{0}'")]
    UnknownKey(String),
}

impl BattleError for PoolError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKey(_) => "POOL_UNKNOWN_KEY",
        }
    }
}

/// Per-key queues of inactive effect instances.
#[derive(Clone, Debug, Default)]
pub struct EffectObjectPool {
    instances: HashMap<EffectInstanceId, EffectInstance>,
    idle: HashMap<String, VecDeque<EffectInstanceId>>,
    next_id: u64,
}

impl EffectObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` and preallocates `count` inactive instances.
    ///
    /// A key that is already registered is left untouched.
    pub fn initialize_pool(&mut self, key: &str, count: usize) {
        if self.idle.contains_key(key) {
            return;
        }
        let mut queue = VecDeque::with_capacity(count);
        for _ in 0..count {
            queue.push_back(self.create(key));
        }
        self.idle.insert(key.to_string(), queue);
        debug!(target: "battle::pool", key, count, "initialized effect pool");
    }

    /// Activates an instance of `key` at the given transform.
    ///
    /// An exhausted pool grows by one instance instead of failing.
    pub fn get_object(
        &mut self,
        key: &str,
        position: Position,
        rotation: Rotation,
        parent: Option<CombatantId>,
    ) -> Result<EffectInstanceId, PoolError> {
        let queued = match self.idle.get_mut(key) {
            Some(queue) => queue.pop_front(),
            None => return Err(PoolError::UnknownKey(key.to_string())),
        };
        let id = match queued {
            Some(id) => id,
            None => {
                debug!(target: "battle::pool", key, "pool exhausted, creating instance");
                self.create(key)
            }
        };

        if let Some(instance) = self.instances.get_mut(&id) {
            instance.position = position;
            instance.rotation = rotation;
            instance.parent = parent;
            instance.active = true;
        }
        Ok(id)
    }

    /// Deactivates an instance and queues it for reuse.
    ///
    /// Returning an inactive instance is a no-op. Instances whose key no
    /// longer has a pool are destroyed.
    pub fn return_object(&mut self, id: EffectInstanceId) {
        let Some(instance) = self.instances.get_mut(&id) else {
            warn!(target: "battle::pool", ?id, "returned unknown effect instance");
            return;
        };
        if !instance.active {
            debug!(target: "battle::pool", ?id, "effect instance already inactive");
            return;
        }

        match self.idle.get_mut(&instance.key) {
            Some(queue) => {
                instance.active = false;
                instance.parent = None;
                queue.push_back(id);
            }
            None => {
                warn!(
                    target: "battle::pool",
                    key = %instance.key,
                    ?id,
                    "no pool for returned effect, destroying"
                );
                self.instances.remove(&id);
            }
        }
    }

    /// Destroys every idle instance of `key` and unregisters the key.
    ///
    /// Instances of `key` still active are destroyed when returned.
    pub fn clear_pool(&mut self, key: &str) {
        if let Some(queue) = self.idle.remove(key) {
            for id in queue {
                self.instances.remove(&id);
            }
            debug!(target: "battle::pool", key, "cleared effect pool");
        }
    }

    pub fn instance(&self, id: EffectInstanceId) -> Option<&EffectInstance> {
        self.instances.get(&id)
    }

    pub fn is_active(&self, id: EffectInstanceId) -> bool {
        self.instances.get(&id).is_some_and(|i| i.active)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.idle.contains_key(key)
    }

    /// Inactive instances waiting in the queue for `key`.
    pub fn idle_count(&self, key: &str) -> usize {
        self.idle.get(key).map_or(0, VecDeque::len)
    }

    /// All live instances of `key`, active or idle.
    pub fn instance_count(&self, key: &str) -> usize {
        self.instances.values().filter(|i| i.key == key).count()
    }

    pub fn active_count(&self) -> usize {
        self.instances.values().filter(|i| i.active).count()
    }

    fn create(&mut self, key: &str) -> EffectInstanceId {
        let id = EffectInstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(
            id,
            EffectInstance {
                id,
                key: key.to_string(),
                position: Position::ORIGIN,
                rotation: Rotation::IDENTITY,
                parent: None,
                active: false,
            },
        );
        id
    }
}
