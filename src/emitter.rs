use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Listener<E> = Rc<dyn Fn(&E)>;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct Subscription(u64);

pub struct Emitter<E> {
    inner: Rc<RefCell<Listeners<E>>>,
}

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Emitter {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Rc::new(listener)));
        Subscription(id)
    }

    pub fn once(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        self.once_if(|_| true, listener)
    }

    /// Like [`Emitter::once`], but only events accepted by `filter` count.
    pub fn once_if(
        &self,
        filter: impl Fn(&E) -> bool + 'static,
        listener: impl Fn(&E) + 'static,
    ) -> Subscription {
        let fired = Rc::new(Cell::new(false));
        let slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));
        let weak = Rc::downgrade(&self.inner);

        let sub = {
            let slot = slot.clone();
            self.subscribe(move |event| {
                if !filter(event) || fired.replace(true) {
                    return;
                }
                if let (Some(inner), Some(sub)) = (weak.upgrade(), slot.get()) {
                    inner.borrow_mut().entries.retain(|(id, _)| *id != sub.0);
                }
                listener(event);
            })
        };
        slot.set(Some(sub));
        sub
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, sub: Subscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|(id, _)| *id != sub.0);
        inner.entries.len() != before
    }

    pub fn emit(&self, event: &E) {
        // Snapshot so listeners can (un)subscribe while we dispatch.
        let listeners: Vec<Listener<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Emitter {
            inner: self.inner.clone(),
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.inner.borrow().entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_in_subscription_order() {
        let emitter = Emitter::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            emitter.subscribe(move |n| log.borrow_mut().push(format!("{tag}{n}")));
        }
        emitter.emit(&1);

        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = hits.clone();
            emitter.subscribe(move |_| hits.set(hits.get() + 1))
        };

        emitter.emit(&());
        assert!(emitter.unsubscribe(sub));
        assert!(!emitter.unsubscribe(sub));
        emitter.emit(&());

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn once_fires_a_single_time() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            emitter.once(move |_| hits.set(hits.get() + 1));
        }

        emitter.emit(&());
        emitter.emit(&());

        assert_eq!(hits.get(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn listener_may_subscribe_during_dispatch() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        {
            let inner = emitter.clone();
            let hits = hits.clone();
            emitter.subscribe(move |_| {
                let hits = hits.clone();
                inner.subscribe(move |_| hits.set(hits.get() + 1));
            });
        }

        emitter.emit(&());
        assert_eq!(hits.get(), 0);
        emitter.emit(&());
        assert_eq!(hits.get(), 1);
    }
}
