//! Consumer-side view that follows language changes
//!
//! A [`TranslationBinding`] subscribes to translation tree changes, keeps the
//! latest tree snapshot, and memoizes the resolved table for the namespace list
//! it was last asked for. The table is recomputed only when the tree or the
//! namespace list changes.

use crate::manager::Localization;
use crate::notifier::Subscription;
use crate::resolver::{self, TranslationMap};
use crate::tree::TranslationTree;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

struct Memo {
    tree: Arc<TranslationTree>,
    namespaces: Vec<String>,
    map: Arc<TranslationMap>,
}

struct BindingState {
    tree: Arc<TranslationTree>,
    version: u64,
    memo: Option<Memo>,
}

/// Live translation view bound to a [`Localization`]; unsubscribes on drop
pub struct TranslationBinding {
    state: Arc<Mutex<BindingState>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for TranslationBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TranslationBinding")
            .field("language", &state.tree.language())
            .field("version", &state.version)
            .finish()
    }
}

impl TranslationBinding {
    pub fn new(localization: &Arc<Localization>) -> Self {
        let state = Arc::new(Mutex::new(BindingState {
            tree: Arc::default(),
            version: 0,
            memo: None,
        }));

        let source = Arc::downgrade(localization);
        let sink = Arc::downgrade(&state);
        let subscription = localization.subscribe(move || {
            let (Some(localization), Some(state)) = (source.upgrade(), sink.upgrade()) else {
                return;
            };
            let tree = localization.translations();
            let mut state = state.lock();
            state.tree = tree;
            state.version += 1;
            trace!(version = state.version, "Binding received new translation tree");
        });

        // After subscribing: a concurrent change is seen here or by the callback
        {
            let mut guard = state.lock();
            guard.tree = localization.translations();
        }

        Self {
            state,
            _subscription: subscription,
        }
    }

    /// Latest translation tree snapshot
    pub fn tree(&self) -> Arc<TranslationTree> {
        Arc::clone(&self.state.lock().tree)
    }

    /// Number of change notifications observed
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    /// Resolved table for `namespaces`, reused while neither input changes
    pub fn translations<S: AsRef<str>>(&self, namespaces: &[S]) -> Arc<TranslationMap> {
        let mut state = self.state.lock();

        if let Some(memo) = &state.memo {
            let same_namespaces = memo
                .namespaces
                .iter()
                .map(String::as_str)
                .eq(namespaces.iter().map(AsRef::as_ref));
            if same_namespaces && Arc::ptr_eq(&memo.tree, &state.tree) {
                return Arc::clone(&memo.map);
            }
        }

        let map = Arc::new(resolver::resolve(&state.tree, namespaces));
        state.memo = Some(Memo {
            tree: Arc::clone(&state.tree),
            namespaces: namespaces.iter().map(|ns| ns.as_ref().to_string()).collect(),
            map: Arc::clone(&map),
        });
        map
    }
}
