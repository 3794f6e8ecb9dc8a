use std::{fmt, rc::Rc};

/// An observer that handles every notification an observable can push.
///
/// Implementors receive `&self`, so any state they keep must live behind a
/// `Cell`/`RefCell`. Handlers may be re-entered from inside one another.
pub trait Observer<T, E> {
    fn next(&self, value: T);

    fn error(&self, err: E);

    fn complete(&self);
}

type NextHandler<T> = Box<dyn Fn(T)>;
type ErrorHandler<E> = Box<dyn Fn(E)>;
type CompleteHandler = Box<dyn Fn()>;

/// Observer-like object handed to [`Observable::subscribe`](crate::Observable::subscribe).
///
/// Each handler is optional. A missing `error` or `complete` handler means the
/// notification is dropped; a missing `next` handler is rejected by `subscribe`.
pub struct PartialObserver<T, E> {
    next: Option<NextHandler<T>>,
    error: Option<ErrorHandler<E>>,
    complete: Option<CompleteHandler>,
}

impl<T, E> PartialObserver<T, E> {
    /// Observer without any handler.
    pub fn new() -> Self {
        PartialObserver {
            next: None,
            error: None,
            complete: None,
        }
    }

    pub fn next_only<F>(on_next: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        Self::new().with_next(on_next)
    }

    /// Wrap a full [`Observer`] implementation, forwarding all three notifications.
    pub fn from_observer<O>(observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
        T: 'static,
        E: 'static,
    {
        Rc::new(observer).into()
    }

    pub fn with_next<F>(mut self, on_next: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        self.next = Some(Box::new(on_next));
        self
    }

    pub fn with_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(E) + 'static,
    {
        self.error = Some(Box::new(on_error));
        self
    }

    pub fn with_complete<F>(mut self, on_complete: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.complete = Some(Box::new(on_complete));
        self
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_complete(&self) -> bool {
        self.complete.is_some()
    }

    pub(crate) fn deliver_next(&self, value: T) {
        if let Some(next) = &self.next {
            next(value);
        }
    }

    pub(crate) fn deliver_error(&self, err: E) {
        if let Some(error) = &self.error {
            error(err);
        }
    }

    pub(crate) fn deliver_complete(&self) {
        if let Some(complete) = &self.complete {
            complete();
        }
    }
}

impl<T, E> Default for PartialObserver<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for PartialObserver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialObserver")
            .field("next", &self.has_next())
            .field("error", &self.has_error())
            .field("complete", &self.has_complete())
            .finish()
    }
}

impl<T, E, O> From<Rc<O>> for PartialObserver<T, E>
where
    O: Observer<T, E> + 'static,
    T: 'static,
    E: 'static,
{
    fn from(observer: Rc<O>) -> Self {
        let on_error = observer.clone();
        let on_complete = observer.clone();

        PartialObserver::new()
            .with_next(move |value| observer.next(value))
            .with_error(move |err| on_error.error(err))
            .with_complete(move || on_complete.complete())
    }
}
