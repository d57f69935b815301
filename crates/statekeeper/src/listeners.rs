//! Copy-on-write listener registry
//!
//! `current` is what a notification pass iterates, `next` collects
//! subscribe/unsubscribe edits. Both point at the same list until the first
//! edit after a snapshot, so edits made while listeners run only take effect
//! on the next dispatch.

use std::rc::Rc;

pub(crate) type Listener = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerId(u64);

type Entries = Rc<Vec<(ListenerId, Listener)>>;

pub(crate) struct ListenerRegistry {
    current: Entries,
    next: Entries,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        let empty: Entries = Rc::new(Vec::new());
        Self {
            current: Rc::clone(&empty),
            next: empty,
            next_id: 0,
        }
    }

    fn ensure_can_mutate_next(&mut self) {
        if Rc::ptr_eq(&self.next, &self.current) {
            self.next = Rc::new(self.current.as_ref().clone());
        }
    }

    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        self.ensure_can_mutate_next();
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        Rc::make_mut(&mut self.next).push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) {
        self.ensure_can_mutate_next();
        Rc::make_mut(&mut self.next).retain(|(existing, _)| *existing != id);
    }

    /// Promote `next` to `current` and hand out the list to notify
    pub(crate) fn snapshot(&mut self) -> Entries {
        self.current = Rc::clone(&self.next);
        Rc::clone(&self.current)
    }
}
