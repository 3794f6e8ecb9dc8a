use crate::{
    scheduler::{CurrentThread, Scheduler},
    subscription::Teardown,
};

use super::{IntoObservable, Observable};

impl<T, E> Observable<T, E>
where
    T: 'static,
    E: 'static,
{
    /// Emit `values` in order on a later turn of the current thread's queue,
    /// then complete.
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        Self::of_on(CurrentThread, values)
    }

    pub fn of_on<S, I>(scheduler: S, values: I) -> Self
    where
        S: Scheduler + 'static,
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        Self::from_iterable_on(scheduler, values.into_iter().collect::<Vec<_>>())
    }

    /// Convert anything observable-capable. An existing [`Observable`] comes
    /// back as-is, sharing its producer.
    pub fn from_source<S>(source: S) -> Self
    where
        S: IntoObservable<T, E>,
    {
        source.into_observable()
    }

    /// Emit every element of `iterable` on a later turn, then complete.
    ///
    /// Each subscription walks its own clone of `iterable`.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
    {
        Self::from_iterable_on(CurrentThread, iterable)
    }

    pub fn from_iterable_on<S, I>(scheduler: S, iterable: I) -> Self
    where
        S: Scheduler + 'static,
        I: IntoIterator<Item = T> + Clone + 'static,
    {
        Observable::new(move |observer| {
            let items = iterable.clone();

            scheduler.schedule(Box::new(move || {
                log::trace!("delivering scheduled values");

                for item in items {
                    if observer.is_closed() {
                        log::trace!("subscription closed before delivery finished");
                        return;
                    }

                    observer.next(item);
                }

                observer.complete();
            }));

            Teardown::none()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{observer::PartialObserver, scheduler};

    use super::*;
    use futures::executor::LocalPool;
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    fn collect<T: 'static, E: 'static>(
        observable: &Observable<T, E>,
    ) -> (Rc<RefCell<Vec<T>>>, crate::ForEach<E>) {
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();

        let future = observable
            .for_each(move |v| sink.borrow_mut().push(v))
            .unwrap();

        (seen, future)
    }

    #[test]
    fn test_of_delivers_in_order_after_subscribe_returns() {
        let observable = Observable::<i32, ()>::of([1, 2, 3]);

        let (seen, future) = collect(&observable);
        assert!(seen.borrow().is_empty());
        assert!(!future.is_closed());

        assert_eq!(scheduler::block_on(future), Ok(()));
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_of_empty_completes() {
        let completed = Rc::new(Cell::new(false));
        let flag = completed.clone();

        Observable::<i32, ()>::of(Vec::new())
            .subscribe(PartialObserver::next_only(|_| {}).with_complete(move || flag.set(true)))
            .unwrap();

        assert!(!completed.get());
        scheduler::run_pending();
        assert!(completed.get());
    }

    #[test]
    fn test_of_can_be_resubscribed() {
        let observable = Observable::<&str, ()>::of(["a", "b"]);

        let (first, first_done) = collect(&observable);
        let (second, second_done) = collect(&observable);

        assert_eq!(scheduler::block_on(first_done), Ok(()));
        assert_eq!(scheduler::block_on(second_done), Ok(()));
        assert_eq!(*first.borrow(), vec!["a", "b"]);
        assert_eq!(*second.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_before_delivery_suppresses_next() {
        let called = Rc::new(Cell::new(false));
        let completed = Rc::new(Cell::new(false));
        let on_next = called.clone();
        let on_complete = completed.clone();

        let unsubscribe = Observable::<&str, ()>::of(["a"])
            .subscribe(
                PartialObserver::next_only(move |_| on_next.set(true))
                    .with_complete(move || on_complete.set(true)),
            )
            .unwrap();
        unsubscribe.unsubscribe();

        assert_eq!(scheduler::run_pending(), 1);
        assert!(!called.get());
        assert!(!completed.get());
    }

    #[test]
    fn test_from_vec_matches_of() {
        let from: Observable<char, ()> = Observable::from_source(vec!['a', 'b']);
        let of: Observable<char, ()> = Observable::of(['a', 'b']);

        let (from_seen, from_done) = collect(&from);
        let (of_seen, of_done) = collect(&of);

        assert_eq!(scheduler::block_on(from_done), Ok(()));
        assert_eq!(scheduler::block_on(of_done), Ok(()));
        assert_eq!(*from_seen.borrow(), *of_seen.borrow());
    }

    #[test]
    fn test_from_source_does_not_rewrap() {
        let existing = Observable::<i32, ()>::of([1]);

        assert!(Observable::from_source(&existing).ptr_eq(&existing));
        assert!(Observable::from_source(existing.clone()).ptr_eq(&existing));
    }

    #[test]
    fn test_from_source_custom_interop() {
        struct Countdown(u32);

        impl IntoObservable<u32, ()> for Countdown {
            fn into_observable(self) -> Observable<u32, ()> {
                Observable::from_iterable((1..=self.0).rev())
            }
        }

        let (seen, done) = collect(&Observable::from_source(Countdown(3)));

        assert_eq!(scheduler::block_on(done), Ok(()));
        assert_eq!(*seen.borrow(), vec![3, 2, 1]);
    }

    #[test]
    fn test_from_iterable_stops_after_unsubscribe() {
        let slot: Rc<RefCell<Option<crate::Unsubscribe>>> = Rc::default();
        let seen = Rc::new(RefCell::new(vec![]));

        let on_next_slot = slot.clone();
        let on_next_seen = seen.clone();
        let unsubscribe = Observable::<u64, ()>::from_iterable(0..)
            .subscribe(PartialObserver::next_only(move |v| {
                on_next_seen.borrow_mut().push(v);

                if v == 2 {
                    if let Some(unsubscribe) = on_next_slot.borrow().as_ref() {
                        unsubscribe.unsubscribe();
                    }
                }
            }))
            .unwrap();
        *slot.borrow_mut() = Some(unsubscribe);

        scheduler::run_pending();

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_of_on_local_pool() {
        let mut pool = LocalPool::new();
        let observable = Observable::<i32, ()>::of_on(pool.spawner(), [4, 5]);

        let (seen, future) = collect(&observable);
        assert!(seen.borrow().is_empty());

        assert_eq!(pool.run_until(future), Ok(()));
        assert_eq!(*seen.borrow(), vec![4, 5]);
        assert_eq!(scheduler::pending(), 0);
    }
}
