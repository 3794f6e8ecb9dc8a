//! A minimal push-based observable.
//!
//! An [`Observable`] wraps a producer function. Every [`Observable::subscribe`]
//! call runs the producer with a fresh [`SubscriptionObserver`], which forwards
//! values to the subscriber's [`PartialObserver`] until the subscription is
//! closed by an error, completion or [`Unsubscribe::unsubscribe`].
//!
//! ```
//! use futures_observable::{scheduler, Observable, PartialObserver, Teardown};
//!
//! let ticks: Observable<u32> = Observable::new(|observer| {
//!     observer.next(1);
//!     observer.next(2);
//!     observer.complete();
//!     Teardown::none()
//! });
//!
//! ticks
//!     .subscribe(PartialObserver::next_only(|tick| println!("tick {}", tick)))
//!     .unwrap();
//!
//! let letters = Observable::<&str>::of(["a", "b"]);
//! let done = letters.for_each(|letter| println!("{}", letter)).unwrap();
//! assert_eq!(scheduler::block_on(done), Ok(()));
//! ```

mod error;
mod for_each;
mod observable;
mod observer;
pub mod scheduler;
mod subscription;

pub use error::*;
pub use for_each::ForEach;
pub use observable::{IntoObservable, Observable};
pub use observer::{Observer, PartialObserver};
pub use subscription::{SubscriptionObserver, Teardown, Unsubscribe};
