use std::{fmt, rc::Rc};

use crate::{
    error::Error,
    for_each::ForEach,
    observer::PartialObserver,
    subscription::{SubscriptionObserver, Teardown, Unsubscribe},
};

mod factory;

type Producer<T, E> = dyn Fn(SubscriptionObserver<T, E>) -> Teardown;

/// Interop marker for anything that can present itself as an [`Observable`].
///
/// This is the trait behind [`Observable::SYMBOL`]: `from_source` looks for
/// it instead of a concrete type.
pub trait IntoObservable<T, E> {
    fn into_observable(self) -> Observable<T, E>;
}

/// A lazy push-based sequence of `T` that may fail with `E`.
///
/// The producer runs once per `subscribe` call, each time with a fresh
/// [`SubscriptionObserver`]. Cloning shares the producer.
pub struct Observable<T, E = ()> {
    producer: Rc<Producer<T, E>>,
}

impl<T, E> Observable<T, E>
where
    T: 'static,
    E: 'static,
{
    /// Well-known key under which observable interop is advertised.
    pub const SYMBOL: &'static str = "@@observable";

    pub fn new<P>(producer: P) -> Self
    where
        P: Fn(SubscriptionObserver<T, E>) -> Teardown + 'static,
    {
        Observable {
            producer: Rc::new(producer),
        }
    }

    /// Build from a producer that may be missing, e.g. one looked up at runtime.
    pub fn try_new<P>(producer: Option<P>) -> Result<Self, Error>
    where
        P: Fn(SubscriptionObserver<T, E>) -> Teardown + 'static,
    {
        producer.map(Self::new).ok_or_else(|| {
            Error::InvalidArgument(
                "Observable must be instantiated with a subscription function".into(),
            )
        })
    }

    /// Run the producer against `observer`.
    ///
    /// The producer is invoked before this returns; synchronous producers have
    /// already delivered everything by then. The returned handle closes the
    /// subscription and runs the producer's teardown.
    pub fn subscribe<O>(&self, observer: O) -> Result<Unsubscribe, Error>
    where
        O: Into<PartialObserver<T, E>>,
    {
        let observer = observer.into();

        if !observer.has_next() {
            return Err(Error::InvalidArgument(
                "subscribe requires an observer with a next handler".into(),
            ));
        }

        log::trace!("subscribing {:?}", observer);

        let subscription = SubscriptionObserver::new(observer);
        let teardown = (self.producer)(subscription.clone());
        subscription.set_teardown(teardown);

        Ok(subscription.unsubscribe_handle())
    }

    /// Feed every value to `on_next`; the returned future settles on completion
    /// or on the stream error.
    pub fn for_each<F>(&self, on_next: F) -> Result<ForEach<E>, Error>
    where
        F: Fn(T) + 'static,
    {
        let (observer, receiver) = ForEach::<E>::observer(on_next);
        let subscription = self.subscribe(observer)?;

        Ok(ForEach::new(receiver, subscription))
    }

    /// Whether both handles share one producer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.producer, &other.producer)
    }
}

impl<T, E> Clone for Observable<T, E> {
    fn clone(&self) -> Self {
        Observable {
            producer: self.producer.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Observable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T, E> IntoObservable<T, E> for Observable<T, E> {
    fn into_observable(self) -> Observable<T, E> {
        self
    }
}

impl<T, E> IntoObservable<T, E> for &Observable<T, E> {
    fn into_observable(self) -> Observable<T, E> {
        self.clone()
    }
}

impl<T, E> IntoObservable<T, E> for Vec<T>
where
    T: Clone + 'static,
    E: 'static,
{
    fn into_observable(self) -> Observable<T, E> {
        Observable::from_iterable(self)
    }
}

impl<T, E, const N: usize> IntoObservable<T, E> for [T; N]
where
    T: Clone + 'static,
    E: 'static,
{
    fn into_observable(self) -> Observable<T, E> {
        Observable::from_iterable(self)
    }
}
