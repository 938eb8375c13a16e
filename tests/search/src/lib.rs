//! Shared helpers for the behavior lock tests.

#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use statewalk_search::{SearchConstraint, SearchListener, SearchView};
use statewalk_vm::StateId;

/// One observed notification, in driver order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started,
    Advanced { id: StateId, is_new: bool },
    Processed { id: StateId },
    Stored { id: StateId },
    Restored { id: StateId, queue_len: usize },
    Backtracked { id: StateId },
    Violated { id: StateId, property: String },
    ConstraintHit { message: String },
    Finished,
}

/// Read handle onto a [`RecordingListener`]'s event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    /// Every event observed so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// StateIds of `Advanced` events.
    #[must_use]
    pub fn advanced_ids(&self) -> Vec<StateId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Advanced { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// StateIds of `Stored` events.
    #[must_use]
    pub fn stored_ids(&self) -> Vec<StateId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Stored { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// `(id, queue_len)` of `Restored` events.
    #[must_use]
    pub fn restored(&self) -> Vec<(StateId, usize)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Restored { id, queue_len } => Some((*id, *queue_len)),
                _ => None,
            })
            .collect()
    }

    /// StateIds of `Restored` events.
    #[must_use]
    pub fn restored_ids(&self) -> Vec<StateId> {
        self.restored().into_iter().map(|(id, _)| id).collect()
    }

    /// Rendered messages of `ConstraintHit` events.
    #[must_use]
    pub fn constraint_messages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::ConstraintHit { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Listener that appends every notification to a shared log.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Rc<RefCell<Vec<Event>>>,
}

impl RecordingListener {
    /// Create a listener with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for reading the log after the driver has consumed the
    /// listener.
    #[must_use]
    pub fn log(&self) -> EventLog {
        EventLog {
            events: Rc::clone(&self.events),
        }
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl SearchListener for RecordingListener {
    fn search_started(&mut self, _view: &SearchView<'_>) {
        self.push(Event::Started);
    }

    fn state_advanced(&mut self, view: &SearchView<'_>) {
        self.push(Event::Advanced {
            id: view.state_id,
            is_new: view.is_new_state,
        });
    }

    fn state_processed(&mut self, view: &SearchView<'_>) {
        self.push(Event::Processed { id: view.state_id });
    }

    fn state_stored(&mut self, view: &SearchView<'_>) {
        self.push(Event::Stored { id: view.state_id });
    }

    fn state_restored(&mut self, view: &SearchView<'_>) {
        self.push(Event::Restored {
            id: view.state_id,
            queue_len: view.queue_len,
        });
    }

    fn state_backtracked(&mut self, view: &SearchView<'_>) {
        self.push(Event::Backtracked { id: view.state_id });
    }

    fn property_violated(&mut self, view: &SearchView<'_>) {
        let property = view
            .error
            .map_or_else(String::new, |e| e.property.clone());
        self.push(Event::Violated {
            id: view.state_id,
            property,
        });
    }

    fn search_constraint_hit(&mut self, _view: &SearchView<'_>, constraint: &SearchConstraint) {
        self.push(Event::ConstraintHit {
            message: constraint.to_string(),
        });
    }

    fn search_finished(&mut self, _view: &SearchView<'_>) {
        self.push(Event::Finished);
    }
}
