// ── Device registry ──
//
// Concurrent storage for device handles with push-based change
// notification. Handles are immutable `Arc`s; every mutation swaps in a new
// handle, rebuilds the snapshot and broadcasts a `RegistryEvent`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, watch};

use super::stream::HandleStream;
use crate::address::ReachabilityEvent;
use crate::model::{Characteristics, DeviceContext, DeviceHandle, LightpadId};

const EVENT_CHANNEL_SIZE: usize = 256;

/// What changed in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Added(LightpadId),
    Updated(LightpadId),
    Removed(LightpadId),
    ReachabilityChanged {
        lpid: LightpadId,
        reachable: bool,
    },
    CharacteristicsChanged {
        lpid: LightpadId,
        characteristics: Characteristics,
    },
}

/// In-memory store of device handles, one per lightpad id.
pub struct DeviceRegistry {
    handles: DashMap<LightpadId, Arc<DeviceHandle>>,
    snapshot: watch::Sender<Arc<Vec<Arc<DeviceHandle>>>>,
    events: broadcast::Sender<RegistryEvent>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            handles: DashMap::new(),
            snapshot,
            events,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Insert a handle. Returns `true` if the id was new; an existing
    /// handle with the same id is replaced.
    pub fn insert(&self, handle: DeviceHandle) -> bool {
        let lpid = handle.lpid.clone();
        let is_new = self.handles.insert(lpid.clone(), Arc::new(handle)).is_none();
        self.rebuild_snapshot();
        self.emit(if is_new {
            RegistryEvent::Added(lpid)
        } else {
            RegistryEvent::Updated(lpid)
        });
        is_new
    }

    /// Seed the registry with handles the host persisted across restarts.
    pub fn restore(&self, handles: impl IntoIterator<Item = DeviceHandle>) -> usize {
        handles.into_iter().map(|h| self.insert(h)).filter(|new| *new).count()
    }

    /// Replace (not merge) a handle's context. Returns `false` for unknown ids.
    pub fn replace_context(&self, lpid: &LightpadId, context: DeviceContext) -> bool {
        let replaced = self.modify(lpid, |handle| handle.context = context);
        if replaced {
            self.emit(RegistryEvent::Updated(lpid.clone()));
        }
        replaced
    }

    pub fn remove(&self, lpid: &LightpadId) -> Option<Arc<DeviceHandle>> {
        let removed = self.handles.remove(lpid).map(|(_, h)| h);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.emit(RegistryEvent::Removed(lpid.clone()));
        }
        removed
    }

    // ── State updates ────────────────────────────────────────────────

    /// Apply a discovery transition. Returns `true` if the flag changed.
    pub fn apply_reachability(&self, event: &ReachabilityEvent) -> bool {
        match event {
            ReachabilityEvent::Reachable(lpid) => self.set_reachable(lpid, true),
        }
    }

    /// Set the reachability flag. Returns `true` if it changed.
    pub fn set_reachable(&self, lpid: &LightpadId, reachable: bool) -> bool {
        let changed = self
            .handles
            .get(lpid)
            .is_some_and(|h| h.reachable != reachable);
        if changed {
            self.modify(lpid, |handle| handle.reachable = reachable);
            self.emit(RegistryEvent::ReachabilityChanged {
                lpid: lpid.clone(),
                reachable,
            });
        }
        changed
    }

    /// Cache a level confirmed by the lightpad along with the derived
    /// characteristics. Returns `false` for unknown ids.
    pub fn record_level(
        &self,
        lpid: &LightpadId,
        device_level: u8,
        characteristics: Characteristics,
    ) -> bool {
        let updated = self.modify(lpid, |handle| {
            handle.context.load.level = Some(device_level);
            handle.characteristics = characteristics;
        });
        if updated {
            self.emit(RegistryEvent::CharacteristicsChanged {
                lpid: lpid.clone(),
                characteristics,
            });
        }
        updated
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn get(&self, lpid: &LightpadId) -> Option<Arc<DeviceHandle>> {
        self.handles.get(lpid).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, lpid: &LightpadId) -> bool {
        self.handles.contains_key(lpid)
    }

    /// Cached characteristics, for answering reads without the lightpad.
    pub fn characteristics(&self, lpid: &LightpadId) -> Option<Characteristics> {
        self.handles.get(lpid).map(|h| h.characteristics)
    }

    pub fn ids(&self) -> Vec<LightpadId> {
        self.handles.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Current handles ordered by name, then id (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<DeviceHandle>>> {
        self.snapshot.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> HandleStream {
        HandleStream::new(self.snapshot.subscribe())
    }

    pub fn events(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Copy-on-write update of one handle. The map guard is released before
    /// the snapshot is rebuilt.
    fn modify(&self, lpid: &LightpadId, f: impl FnOnce(&mut DeviceHandle)) -> bool {
        let found = match self.handles.get_mut(lpid) {
            Some(mut entry) => {
                f(Arc::make_mut(entry.value_mut()));
                true
            }
            None => false,
        };
        if found {
            self.rebuild_snapshot();
        }
        found
    }

    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<DeviceHandle>> =
            self.handles.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.lpid.cmp(&b.lpid)));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn emit(&self, event: RegistryEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
