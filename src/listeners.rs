//! Window-level event listeners with scoped registration.
//!
//! Scroll and resize listeners are attached to the whole window, so a
//! component that forgets to detach keeps receiving events after it is gone.
//! Here registration hands back a [`Subscription`]; dropping it detaches the
//! listener, whatever path the owner takes out of scope.

use crate::types::Viewport;
use std::cell::RefCell;
use std::rc::Rc;

/// Events the host window delivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Scroll { scroll_y: f64 },
    Resize(Viewport),
    /// The browser finished a smooth scroll (`scrollend`), where supported.
    ScrollEnd,
}

type Listener = Rc<dyn Fn(&WindowEvent, u64)>;

/// Registry the host emits window events into.
#[derive(Clone, Default)]
pub struct WindowListeners {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` until the returned subscription is dropped.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&WindowEvent, u64) + 'static) -> Subscription {
        let listener: Listener = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::clone(&listener));
        Subscription {
            listener,
            listeners: Rc::clone(&self.listeners),
        }
    }

    /// Deliver `event` to every attached listener.
    ///
    /// Listeners may subscribe or drop subscriptions while being notified;
    /// changes take effect from the next event.
    pub fn emit(&self, event: &WindowEvent, now_ms: u64) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            (listener)(event, now_ms);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// Detaches its listener on drop.
pub struct Subscription {
    listener: Listener,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|item| !Rc::ptr_eq(item, &self.listener));
    }
}
