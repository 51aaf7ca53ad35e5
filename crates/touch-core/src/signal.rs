//! Synchronous, single-threaded notification fan-out.
//!
//! A [`Signal`] is shared by reference (usually behind an `Rc`) between the
//! code that fires it and the listeners. Listeners may connect or disconnect
//! while the signal is being emitted: every emission iterates a snapshot taken
//! when it started, so a listener removed mid-emission still receives that
//! emission and a listener added mid-emission first hears the next one.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<A> = Rc<RefCell<dyn FnMut(&A)>>;

pub struct Signal<A> {
    listeners: RefCell<Vec<(ListenerId, Listener<A>)>>,
    next_id: Cell<u64>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&A) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(listener))));
        id
    }

    /// Returns false if the listener was not connected.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(lid, _)| *lid == id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|(lid, _)| *lid == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn emit(&self, args: &A) {
        let snapshot: SmallVec<[Listener<A>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            // A listener that re-fires the signal it is handling would alias itself.
            match listener.try_borrow_mut() {
                Ok(mut call) => call(args),
                Err(_) => log::warn!("[signal] skipped re-entrant listener"),
            }
        }
    }
}
