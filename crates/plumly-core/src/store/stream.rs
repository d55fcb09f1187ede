// ── Reactive handle streams ──
//
// Change notification for consumers that re-render the device list.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::DeviceHandle;

type Snapshot = Arc<Vec<Arc<DeviceHandle>>>;

/// A subscription to registry snapshots.
pub struct HandleStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl HandleStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or the last `changed`).
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the registry has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::model::fixtures::{house, load, room};
    use crate::model::{DeviceContext, DeviceHandle, LightpadId};
    use crate::store::DeviceRegistry;

    #[tokio::test]
    async fn changed_yields_new_snapshot() {
        let registry = DeviceRegistry::new();
        let mut stream = registry.subscribe();
        assert!(stream.current().is_empty());

        registry.insert(DeviceHandle::new(
            LightpadId::from("p1"),
            "Den Lamp".into(),
            DeviceContext {
                room: room("r1", "Den"),
                house: house("h1"),
                load: load("l1", "Lamp", &["p1"]),
            },
        ));

        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);
    }
}
