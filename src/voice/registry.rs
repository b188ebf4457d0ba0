//! Numbered registry of interactive targets
//!
//! The presentation layer registers its interactive elements as
//! [`CommandTarget`] capabilities; the listener rebuilds the registry
//! from a snapshot at the start of every session, so indices always
//! reflect one point-in-time view and need no locking.

use std::fmt;
use std::sync::Arc;

/// One activatable element, addressable by its spoken number
#[derive(Clone)]
pub struct CommandTarget {
    id: String,
    action: Arc<dyn Fn() + Send + Sync>,
}

impl CommandTarget {
    /// Create a target with its primary action
    pub fn new(id: impl Into<String>, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            id: id.into(),
            action: Arc::new(action),
        }
    }

    /// Stable identifier, for logging and tests
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Invoke the target's primary action (the spoken-number click)
    pub fn activate(&self) {
        (self.action)();
    }
}

impl fmt::Debug for CommandTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTarget").field("id", &self.id).finish()
    }
}

/// Supplies the current set of interactive targets
///
/// Called once per listening session; the snapshot order defines the
/// spoken 1-based numbering.
pub trait TargetProvider: Send + Sync {
    /// The currently interactive targets, in announcement order
    fn snapshot(&self) -> Vec<CommandTarget>;
}

/// History navigation, decoupled from any rendering technology
pub trait Navigator: Send + Sync {
    /// Go back one step
    fn back(&self);
    /// Go forward one step
    fn forward(&self);
}

/// An ordered, session-scoped view of the targets
///
/// Built once per session and never mutated while the session runs.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<CommandTarget>,
}

impl TargetRegistry {
    /// Build a registry from a provider snapshot
    #[must_use]
    pub fn from_provider(provider: &dyn TargetProvider) -> Self {
        Self {
            targets: provider.snapshot(),
        }
    }

    /// Look up a target by its 1-based spoken number
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&CommandTarget> {
        number.checked_sub(1).and_then(|i| self.targets.get(i))
    }

    /// Number of registered targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry has no targets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticProvider {
        ids: Vec<&'static str>,
    }

    impl TargetProvider for StaticProvider {
        fn snapshot(&self) -> Vec<CommandTarget> {
            self.ids
                .iter()
                .map(|id| CommandTarget::new(*id, || {}))
                .collect()
        }
    }

    #[test]
    fn numbering_is_one_based_snapshot_order() {
        let provider = StaticProvider {
            ids: vec!["notes", "flashcards", "quiz"],
        };
        let registry = TargetRegistry::from_provider(&provider);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(1).unwrap().id(), "notes");
        assert_eq!(registry.get(3).unwrap().id(), "quiz");
        assert!(registry.get(0).is_none());
        assert!(registry.get(4).is_none());
    }

    #[test]
    fn activate_runs_the_primary_action() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let target = CommandTarget::new("go", move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        target.activate();
        target.activate();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
