use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use crate::observer::PartialObserver;

/// Cleanup action returned by a producer.
///
/// Runs at most once, when the subscription it belongs to is closed.
#[derive(Default)]
pub struct Teardown(Option<Box<dyn FnOnce()>>);

impl Teardown {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Teardown(Some(Box::new(action)))
    }

    /// The producer has nothing to clean up.
    pub fn none() -> Self {
        Teardown(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    fn run(self) {
        if let Some(action) = self.0 {
            action();
        }
    }
}

impl<F> From<F> for Teardown
where
    F: FnOnce() + 'static,
{
    fn from(action: F) -> Self {
        Teardown::new(action)
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Teardown").field(&!self.is_none()).finish()
    }
}

trait Close {
    fn close(&self);

    fn is_closed(&self) -> bool;
}

struct SubscriptionImpl<T, E> {
    destination: PartialObserver<T, E>,
    closed: Cell<bool>,
    teardown: RefCell<Option<Teardown>>,
}

impl<T, E> Close for SubscriptionImpl<T, E> {
    fn close(&self) {
        if !self.closed.replace(true) {
            log::debug!("subscription closed");
        }

        // the borrow ends before the action runs, so it may re-enter
        let teardown = self.teardown.borrow_mut().take();

        if let Some(teardown) = teardown {
            log::debug!("running teardown");
            teardown.run();
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

/// Per-subscription mediator between a producer and the subscriber's observer.
///
/// Forwards `next`/`error`/`complete` to the destination until the
/// subscription is closed by `error`, `complete` or `unsubscribe`; after that
/// every notification is dropped. Clones share the same state, so a producer
/// can hold on to one for asynchronous delivery.
pub struct SubscriptionObserver<T, E> {
    inner: Rc<SubscriptionImpl<T, E>>,
}

impl<T, E> SubscriptionObserver<T, E> {
    pub fn new(destination: PartialObserver<T, E>) -> Self {
        SubscriptionObserver {
            inner: Rc::new(SubscriptionImpl {
                destination,
                closed: Cell::new(false),
                teardown: RefCell::new(None),
            }),
        }
    }

    pub fn destination(&self) -> &PartialObserver<T, E> {
        &self.inner.destination
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn next(&self, value: T) {
        if self.is_closed() {
            return;
        }

        self.inner.destination.deliver_next(value);
    }

    /// Forward `err` and close. A second terminal notification is dropped.
    pub fn error(&self, err: E) {
        if self.is_closed() {
            return;
        }

        self.inner.destination.deliver_error(err);
        self.unsubscribe();
    }

    pub fn complete(&self) {
        if self.is_closed() {
            return;
        }

        self.inner.destination.deliver_complete();
        self.unsubscribe();
    }

    /// Close the subscription and run the teardown if one is attached.
    ///
    /// Safe to call any number of times; the teardown runs at most once.
    pub fn unsubscribe(&self) {
        self.inner.close();
    }

    /// Attach the producer's teardown.
    ///
    /// A producer that closed the subscription before returning gets its
    /// teardown run right away.
    pub(crate) fn set_teardown(&self, teardown: Teardown) {
        if teardown.is_none() {
            return;
        }

        if self.is_closed() {
            log::debug!("subscription closed before teardown was attached");
            teardown.run();
            return;
        }

        *self.inner.teardown.borrow_mut() = Some(teardown);
    }
}

impl<T, E> SubscriptionObserver<T, E>
where
    T: 'static,
    E: 'static,
{
    pub fn unsubscribe_handle(&self) -> Unsubscribe {
        Unsubscribe {
            subscription: self.inner.clone(),
        }
    }
}

impl<T, E> Clone for SubscriptionObserver<T, E> {
    fn clone(&self) -> Self {
        SubscriptionObserver {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> fmt::Debug for SubscriptionObserver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionObserver")
            .field("destination", &self.inner.destination)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it leaves the subscription running; call [`Unsubscribe::unsubscribe`]
/// to close it.
#[derive(Clone)]
pub struct Unsubscribe {
    subscription: Rc<dyn Close>,
}

impl Unsubscribe {
    pub fn unsubscribe(&self) {
        self.subscription.close();
    }

    pub fn is_closed(&self) -> bool {
        self.subscription.is_closed()
    }

    /// Turn the handle into a plain zero-argument closure.
    pub fn into_fn(self) -> impl Fn() {
        move || self.unsubscribe()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("closed", &self.is_closed())
            .finish()
    }
}
