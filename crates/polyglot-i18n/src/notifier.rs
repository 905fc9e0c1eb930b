//! Named-event publish/subscribe registry
//!
//! Events carry no payload; they only signal that something changed. Listeners
//! are stored as `(id, callback)` pairs per event name and removed through the
//! [`ListenerHandle`] returned at registration.
//!
//! # Emission semantics
//!
//! - Listeners run synchronously, in registration order.
//! - Each emission works on a snapshot of the listener list taken before the
//!   first callback runs. Listeners added or removed by a callback take effect
//!   from the next emission on.
//! - A panicking listener is logged and skipped; the remaining listeners still
//!   run.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error};

/// Event emitted after every successful language change
pub const TRANSLATION_TREE_CHANGE: &str = "translationTreeChange";

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Unique identifier of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Removal token for a registered listener
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    event: String,
    id: ListenerId,
}

impl ListenerHandle {
    /// Event the listener is registered for
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

/// Registry of listeners keyed by event name
pub struct ChangeNotifier {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<String, Vec<(ListenerId, Callback)>>>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let counts: HashMap<&str, usize> = listeners
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();
        f.debug_struct("ChangeNotifier")
            .field("listeners", &counts)
            .finish()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Register `callback` for `event` and return its removal handle
    pub fn add_event_listener<F>(&self, event: &str, callback: F) -> ListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(callback)));

        debug!(event, listener = id.0, "Registered listener");

        ListenerHandle {
            event: event.to_string(),
            id,
        }
    }

    /// Remove the listener behind `handle`.
    ///
    /// Returns `false` when the listener was already removed.
    pub fn remove_event_listener(&self, handle: &ListenerHandle) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(&handle.event) else {
            return false;
        };

        let before = list.len();
        list.retain(|(id, _)| *id != handle.id);
        let removed = list.len() != before;

        if list.is_empty() {
            listeners.remove(&handle.event);
        }

        if removed {
            debug!(event = %handle.event, listener = handle.id.0, "Removed listener");
        }
        removed
    }

    /// Register a listener that is removed when the returned guard is dropped
    pub fn subscribe<F>(self: &Arc<Self>, event: &str, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handle = self.add_event_listener(event, callback);
        Subscription {
            notifier: Arc::downgrade(self),
            handle,
            active: true,
        }
    }

    /// Invoke every listener registered for `event`.
    ///
    /// Returns the number of listeners that completed without panicking.
    pub fn emit(&self, event: &str) -> usize {
        let snapshot: Vec<(ListenerId, Callback)> = self
            .listeners
            .lock()
            .get(event)
            .cloned()
            .unwrap_or_default();

        debug!(event, listeners = snapshot.len(), "Emitting event");

        let mut completed = 0;
        for (id, callback) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback())) {
                Ok(()) => completed += 1,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(event, listener = id.0, %reason, "Listener panicked");
                }
            }
        }
        completed
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }

    /// Remove every listener for every event
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }
}

/// Scoped listener registration; removes the listener on drop
#[derive(Debug)]
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    notifier: Weak<ChangeNotifier>,
    handle: ListenerHandle,
    active: bool,
}

impl Subscription {
    /// Handle of the underlying listener
    pub fn handle(&self) -> &ListenerHandle {
        &self.handle
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the listener registered past the guard's lifetime
    pub fn detach(mut self) -> ListenerHandle {
        self.active = false;
        self.handle.clone()
    }

    fn release(&mut self) {
        if !std::mem::take(&mut self.active) {
            return;
        }
        if let Some(notifier) = self.notifier.upgrade() {
            notifier.remove_event_listener(&self.handle);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    type Recorded = Box<dyn Fn() + Send + Sync>;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Recorded) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| {
            let sink = sink.clone();
            Box::new(move || sink.lock().push(name)) as Recorded
        };
        (log, make)
    }

    #[test]
    fn test_emit_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let (log, make) = recorder();

        notifier.add_event_listener("change", make("first"));
        notifier.add_event_listener("change", make("second"));
        notifier.add_event_listener("other", make("other"));

        assert_eq!(notifier.emit("change"), 2);
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_emit_without_listeners() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.emit("nothing"), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let notifier = ChangeNotifier::new();
        let (log, make) = recorder();

        let handle = notifier.add_event_listener("change", make("a"));
        notifier.add_event_listener("change", make("b"));

        assert!(notifier.remove_event_listener(&handle));
        assert!(!notifier.remove_event_listener(&handle));
        notifier.emit("change");

        assert_eq!(*log.lock(), vec!["b"]);
        assert_eq!(notifier.listener_count("change"), 1);
    }

    #[test]
    fn test_listener_added_during_emit_waits_for_next_pass() {
        let notifier = Arc::new(ChangeNotifier::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let inner_notifier = notifier.clone();
        let inner_calls = calls.clone();
        notifier.add_event_listener("change", move || {
            let calls = inner_calls.clone();
            inner_notifier.add_event_listener("change", move || {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        });

        notifier.emit("change");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        notifier.emit("change");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_removed_during_emit_still_runs_this_pass() {
        let notifier = Arc::new(ChangeNotifier::new());
        let (log, make) = recorder();

        let victim: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));
        let remover_notifier = notifier.clone();
        let remover_victim = victim.clone();
        notifier.add_event_listener("change", move || {
            if let Some(handle) = remover_victim.lock().take() {
                remover_notifier.remove_event_listener(&handle);
            }
        });
        *victim.lock() = Some(notifier.add_event_listener("change", make("victim")));

        notifier.emit("change");
        notifier.emit("change");

        assert_eq!(*log.lock(), vec!["victim"]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let notifier = ChangeNotifier::new();
        let (log, make) = recorder();

        notifier.add_event_listener("change", || panic!("listener failure"));
        notifier.add_event_listener("change", make("after"));

        assert_eq!(notifier.emit("change"), 1);
        assert_eq!(*log.lock(), vec!["after"]);
    }

    #[test]
    fn test_subscription_guard_removes_on_drop() {
        let notifier = Arc::new(ChangeNotifier::new());
        let (log, make) = recorder();

        {
            let _subscription = notifier.subscribe("change", make("scoped"));
            notifier.emit("change");
        }
        notifier.emit("change");

        assert_eq!(*log.lock(), vec!["scoped"]);
        assert_eq!(notifier.listener_count("change"), 0);
    }

    #[test]
    fn test_detached_subscription_survives() {
        let notifier = Arc::new(ChangeNotifier::new());
        let (log, make) = recorder();

        let handle = notifier.subscribe("change", make("kept")).detach();
        notifier.emit("change");
        assert!(notifier.remove_event_listener(&handle));

        assert_eq!(*log.lock(), vec!["kept"]);
    }
}
