//! Pointer observer definitions
//!
//! Overlays consume every pointer event they receive for drag handling, then
//! forward the raw event to any observers registered on them.

use super::events::PointerEvent;
use crate::host::OverlayId;

/// Receives every pointer event dispatched to an overlay, after drag handling
pub trait PointerObserver: Send {
    fn on_pointer_event(&mut self, overlay: OverlayId, event: &PointerEvent);
}

impl<F> PointerObserver for F
where
    F: FnMut(OverlayId, &PointerEvent) + Send,
{
    fn on_pointer_event(&mut self, overlay: OverlayId, event: &PointerEvent) {
        self(overlay, event)
    }
}

/// Ordered set of observers attached to one overlay
#[derive(Default)]
pub struct ObserverChain {
    observers: Vec<Box<dyn PointerObserver>>,
}

impl ObserverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; observers are notified in registration order
    pub fn push(&mut self, observer: Box<dyn PointerObserver>) {
        self.observers.push(observer);
    }

    pub fn notify(&mut self, overlay: OverlayId, event: &PointerEvent) {
        for observer in &mut self.observers {
            observer.on_pointer_event(overlay, event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }
}

impl std::fmt::Debug for ObserverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverChain")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_observers_notified_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = ObserverChain::new();

        for tag in ["first", "second"] {
            let seen = seen.clone();
            chain.push(Box::new(move |_: OverlayId, _: &PointerEvent| {
                seen.lock().unwrap().push(tag);
            }));
        }

        chain.notify(OverlayId(1), &PointerEvent::down(0.0, 0.0, 0.0, 0.0));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(chain.len(), 2);
    }
}
