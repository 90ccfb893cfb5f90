use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Asynchronous operations whose outcome arrives later as a native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Start,
    Opacity,
    Capture,
    Snapshot,
    RecordStart,
    RecordStop,
}

impl OperationKind {
    #[cfg(test)]
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Start,
        OperationKind::Opacity,
        OperationKind::Capture,
        OperationKind::Snapshot,
        OperationKind::RecordStart,
        OperationKind::RecordStop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Start => "start",
            OperationKind::Opacity => "opacity",
            OperationKind::Capture => "capture",
            OperationKind::Snapshot => "snapshot",
            OperationKind::RecordStart => "record-start",
            OperationKind::RecordStop => "record-stop",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a settled call resolves with: an optional string payload (file
/// path, snapshot data) or the rejection.
pub type Outcome = Result<Option<String>>;

struct Slot {
    id: Uuid,
    tx: oneshot::Sender<Outcome>,
}

/// Registry of parked calls, one slot per [`OperationKind`].
///
/// A slot holds at most one waiting caller. Parking into a slot whose
/// caller is still waiting fails with [`Error::OperationPending`]; the
/// waiting caller keeps the slot.
#[derive(Default)]
pub struct PendingCalls {
    slots: Mutex<HashMap<OperationKind, Slot>>,
}

/// Handle held by the caller of a parked operation.
#[derive(Debug)]
pub struct ParkedCall {
    id: Uuid,
    kind: OperationKind,
    rx: oneshot::Receiver<Outcome>,
}

impl ParkedCall {
    /// Waits until the matching native event settles the call.
    pub async fn wait(self) -> Outcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            // Sender dropped without settling: the registry itself went away.
            Err(_) => Err(Error::CameraStopped),
        }
    }
}

impl PendingCalls {
    fn slots(&self) -> MutexGuard<'_, HashMap<OperationKind, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn park(&self, kind: OperationKind) -> Result<ParkedCall> {
        let mut slots = self.slots();
        if let Some(slot) = slots.get(&kind) {
            if !slot.tx.is_closed() {
                return Err(Error::OperationPending(kind));
            }
            log::debug!("reclaiming abandoned {} call {}", kind, slot.id);
        }

        let id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        slots.insert(kind, Slot { id, tx });
        log::debug!("parked {} call {}", kind, id);
        Ok(ParkedCall { id, kind, rx })
    }

    /// Settles the call parked under `kind`. Returns `false` when the slot
    /// was empty.
    pub fn settle(&self, kind: OperationKind, outcome: Outcome) -> bool {
        let Some(slot) = self.slots().remove(&kind) else {
            log::warn!("no pending {} call to settle", kind);
            return false;
        };
        log::debug!("settling {} call {} (ok: {})", kind, slot.id, outcome.is_ok());
        if slot.tx.send(outcome).is_err() {
            log::debug!("{} call {} was abandoned by its caller", kind, slot.id);
        }
        true
    }

    pub fn resolve(&self, kind: OperationKind, value: Option<String>) -> bool {
        self.settle(kind, Ok(value))
    }

    pub fn reject(&self, kind: OperationKind, error: Error) -> bool {
        self.settle(kind, Err(error))
    }

    /// Frees the slot without settling it, if it still belongs to `call`.
    /// Used when the native dispatch failed and the caller reports the
    /// error itself.
    pub fn release(&self, call: &ParkedCall) {
        let mut slots = self.slots();
        if slots.get(&call.kind).is_some_and(|slot| slot.id == call.id) {
            slots.remove(&call.kind);
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.slots()
            .get(&kind)
            .is_some_and(|slot| !slot.tx.is_closed())
    }

    /// Rejects every parked call with the error built by `error`.
    pub fn reject_all(&self, error: impl Fn() -> Error) -> usize {
        let drained: Vec<_> = self.slots().drain().collect();
        let count = drained.len();
        for (kind, slot) in drained {
            log::debug!("rejecting {} call {}", kind, slot.id);
            let _ = slot.tx.send(Err(error()));
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_parked_call() {
        let pending = PendingCalls::default();
        let call = pending.park(OperationKind::Capture).unwrap();
        assert!(pending.is_pending(OperationKind::Capture));

        assert!(pending.resolve(OperationKind::Capture, Some("/tmp/a.jpg".into())));
        assert_eq!(call.wait().await.unwrap().as_deref(), Some("/tmp/a.jpg"));
        assert!(!pending.is_pending(OperationKind::Capture));
    }

    #[tokio::test]
    async fn rejects_parked_call_with_native_message() {
        let pending = PendingCalls::default();
        let call = pending.park(OperationKind::Snapshot).unwrap();
        pending.reject(OperationKind::Snapshot, Error::Native("sensor busy".into()));
        assert_eq!(call.wait().await.unwrap_err().to_string(), "sensor busy");
    }

    #[test]
    fn second_park_fails_fast_and_keeps_first() {
        let pending = PendingCalls::default();
        let first = pending.park(OperationKind::Capture).unwrap();
        let err = pending.park(OperationKind::Capture).unwrap_err();
        assert!(matches!(err, Error::OperationPending(OperationKind::Capture)));

        // Other kinds are independent.
        pending.park(OperationKind::Snapshot).unwrap();

        pending.release(&first);
        assert!(!pending.is_pending(OperationKind::Capture));
    }

    #[test]
    fn abandoned_slot_can_be_reused() {
        let pending = PendingCalls::default();
        let first = pending.park(OperationKind::RecordStop).unwrap();
        drop(first);
        assert!(!pending.is_pending(OperationKind::RecordStop));
        pending.park(OperationKind::RecordStop).unwrap();
    }

    #[test]
    fn settling_empty_slot_is_reported() {
        let pending = PendingCalls::default();
        assert!(!pending.resolve(OperationKind::Start, None));
    }

    #[test]
    fn release_ignores_foreign_call() {
        let pending = PendingCalls::default();
        let stale = pending.park(OperationKind::Opacity).unwrap();
        drop(pending.slots().remove(&OperationKind::Opacity));
        let _current = pending.park(OperationKind::Opacity).unwrap();

        pending.release(&stale);
        assert!(pending.is_pending(OperationKind::Opacity));
    }

    #[tokio::test]
    async fn reject_all_drains_every_slot() {
        let pending = PendingCalls::default();
        let start = pending.park(OperationKind::Start).unwrap();
        let record = pending.park(OperationKind::RecordStop).unwrap();

        assert_eq!(pending.reject_all(|| Error::CameraStopped), 2);
        assert!(matches!(start.wait().await, Err(Error::CameraStopped)));
        assert!(matches!(record.wait().await, Err(Error::CameraStopped)));
        assert!(OperationKind::ALL.iter().all(|kind| !pending.is_pending(*kind)));
    }
}
