//! Event listener registries.

use std::collections::BTreeMap;

use crate::callable::RawCallable;

/// Read-only view of registered event listeners.
///
/// Implementations decide the order listeners run in; consumers must keep
/// the order returned by [`listeners`](ListenerRegistry::listeners).
pub trait ListenerRegistry {
    /// Listeners of `event` in execution order, each with the priority it
    /// was registered with. Unknown events have none.
    fn listeners(&self, event: &str) -> Vec<(&RawCallable, i32)>;

    /// Every event with at least one listener, each with its listeners in
    /// execution order. Event order is unspecified.
    fn all_listeners(&self) -> Vec<(&str, Vec<(&RawCallable, i32)>)>;

    /// Whether `event` has any listener.
    fn has_listeners(&self, event: &str) -> bool {
        !self.listeners(event).is_empty()
    }
}

/// Handle of one registration, returned by
/// [`EventDispatcher::add_listener`].
///
/// Equal callables registered twice get distinct handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Registration {
    id: ListenerId,
    listener: RawCallable,
    priority: i32,
}

/// In-memory listener registry.
///
/// Listeners run by descending priority; listeners with equal priority run
/// in registration order.
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    events: BTreeMap<String, Vec<Registration>>,
    next_id: u64,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event` with `priority`.
    pub fn add_listener(
        &mut self,
        event: impl Into<String>,
        listener: impl Into<RawCallable>,
        priority: i32,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let registrations = self.events.entry(event.into()).or_default();
        registrations.push(Registration {
            id,
            listener: listener.into(),
            priority,
        });
        // Stable, so equal priorities keep registration order.
        registrations.sort_by(|a, b| b.priority.cmp(&a.priority));
        id
    }

    /// Remove the registration `id` from `event`.
    ///
    /// Returns `false` if `event` has no such registration.
    pub fn remove_listener(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(registrations) = self.events.get_mut(event) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            self.events.remove(event);
        }
        removed
    }
}

fn entries(registrations: &[Registration]) -> Vec<(&RawCallable, i32)> {
    registrations
        .iter()
        .map(|registration| (&registration.listener, registration.priority))
        .collect()
}

impl ListenerRegistry for EventDispatcher {
    fn listeners(&self, event: &str) -> Vec<(&RawCallable, i32)> {
        self.events
            .get(event)
            .map(|registrations| entries(registrations))
            .unwrap_or_default()
    }

    fn all_listeners(&self) -> Vec<(&str, Vec<(&RawCallable, i32)>)> {
        self.events
            .iter()
            .map(|(event, registrations)| (event.as_str(), entries(registrations)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ClosureRef, ObjectRef};
    use pretty_assertions::assert_eq;

    fn callables<'a>(listeners: &[(&'a RawCallable, i32)]) -> Vec<&'a RawCallable> {
        listeners.iter().map(|(listener, _)| *listener).collect()
    }

    #[test]
    fn test_listeners_ordered_by_descending_priority() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_listener("event1", "low", -1);
        dispatcher.add_listener("event1", "high", 255);
        dispatcher.add_listener("event1", "middle", 0);

        assert_eq!(
            callables(&dispatcher.listeners("event1")),
            vec![
                &RawCallable::from("high"),
                &RawCallable::from("middle"),
                &RawCallable::from("low"),
            ]
        );
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_listener("e", "first", 0);
        dispatcher.add_listener("e", "second", 0);
        dispatcher.add_listener("e", "third", 0);

        assert_eq!(
            callables(&dispatcher.listeners("e")),
            vec![
                &RawCallable::from("first"),
                &RawCallable::from("second"),
                &RawCallable::from("third"),
            ]
        );
    }

    #[test]
    fn test_listeners_carry_priorities() {
        let mut dispatcher = EventDispatcher::new();
        let closure = RawCallable::from(ClosureRef::at("app.rs", 3));
        dispatcher.add_listener("event1", "global_function", 255);
        dispatcher.add_listener("event1", closure.clone(), -1);

        assert_eq!(
            dispatcher.listeners("event1"),
            vec![(&RawCallable::from("global_function"), 255), (&closure, -1)]
        );
    }

    #[test]
    fn test_equal_listeners_keep_their_own_priority() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_listener("kernel.request", ObjectRef::invocable("Handler"), 10);
        dispatcher.add_listener("kernel.request", ObjectRef::invocable("Handler"), -5);

        let priorities: Vec<i32> = dispatcher
            .listeners("kernel.request")
            .into_iter()
            .map(|(_, priority)| priority)
            .collect();
        assert_eq!(priorities, [10, -5]);
    }

    #[test]
    fn test_unknown_event_has_no_listeners() {
        let dispatcher = EventDispatcher::new();
        assert!(dispatcher.listeners("missing").is_empty());
        assert!(!dispatcher.has_listeners("missing"));
    }

    #[test]
    fn test_all_listeners_lists_every_event() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_listener("event2", ObjectRef::invocable("CallableClass"), 0);
        dispatcher.add_listener("event1", "global_function", 255);

        let all = dispatcher.all_listeners();
        let events: Vec<&str> = all.iter().map(|(event, _)| *event).collect();
        assert_eq!(events.len(), 2);
        assert!(events.contains(&"event1"));
        assert!(events.contains(&"event2"));
    }

    #[test]
    fn test_remove_listener() {
        let mut dispatcher = EventDispatcher::new();
        let a = dispatcher.add_listener("e", "a", 0);
        let b = dispatcher.add_listener("e", "b", 0);
        assert!(dispatcher.remove_listener("e", a));
        assert_eq!(callables(&dispatcher.listeners("e")), vec![&RawCallable::from("b")]);

        assert!(!dispatcher.remove_listener("other", b));
        assert!(dispatcher.remove_listener("e", b));
        assert!(dispatcher.all_listeners().is_empty());
    }

    #[test]
    fn test_remove_listener_keeps_equal_registrations() {
        let mut dispatcher = EventDispatcher::new();
        let first = dispatcher.add_listener("e", ObjectRef::invocable("Handler"), 10);
        dispatcher.add_listener("e", ObjectRef::invocable("Handler"), -5);

        assert!(dispatcher.remove_listener("e", first));
        assert_eq!(
            dispatcher.listeners("e"),
            vec![(&RawCallable::from(ObjectRef::invocable("Handler")), -5)]
        );
        assert!(!dispatcher.remove_listener("e", first));
    }
}
