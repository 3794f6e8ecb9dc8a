use std::{
    cell::RefCell,
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use futures::{channel::oneshot, FutureExt};

use crate::{observer::PartialObserver, subscription::Unsubscribe};

type Settle<E> = Rc<RefCell<Option<oneshot::Sender<Result<(), E>>>>>;

/// Future returned by [`Observable::for_each`](crate::Observable::for_each).
///
/// Resolves with `Ok(())` once the stream completes, or with the stream error.
/// Dropping it before then unsubscribes.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ForEach<E> {
    receiver: oneshot::Receiver<Result<(), E>>,
    subscription: Unsubscribe,
}

impl<E> ForEach<E> {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<(), E>>, subscription: Unsubscribe) -> Self {
        ForEach {
            receiver,
            subscription,
        }
    }

    /// Observer feeding `on_next` and settling the returned receiver.
    pub(crate) fn observer<T, F>(
        on_next: F,
    ) -> (PartialObserver<T, E>, oneshot::Receiver<Result<(), E>>)
    where
        F: Fn(T) + 'static,
        E: 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let on_error: Settle<E> = Rc::new(RefCell::new(Some(sender)));
        let on_complete = on_error.clone();

        let observer = PartialObserver::new()
            .with_next(on_next)
            .with_error(move |err| settle(&on_error, Err(err)))
            .with_complete(move || settle(&on_complete, Ok(())));

        (observer, receiver)
    }

    /// Whether the underlying subscription is closed, by a terminal
    /// notification or by an unsubscribe.
    pub fn is_closed(&self) -> bool {
        self.subscription.is_closed()
    }
}

fn settle<E>(sender: &Settle<E>, result: Result<(), E>) {
    let sender = sender.borrow_mut().take();

    if let Some(sender) = sender {
        // the receiver is gone when the ForEach was dropped mid-stream
        let _ = sender.send(result);
    }
}

impl<E> Future for ForEach<E> {
    type Output = Result<(), E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // the sender is owned by the subscription this future holds
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}

impl<E> Drop for ForEach<E> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl<E> fmt::Debug for ForEach<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForEach")
            .field("subscription", &self.subscription)
            .finish()
    }
}
