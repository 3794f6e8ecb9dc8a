//! Deferred task execution for the factory observables.
//!
//! A [`Scheduler`] runs a task on a later turn, never inside the call that
//! scheduled it. [`CurrentThread`] keeps a per-thread FIFO queue that is
//! drained by [`run_pending`] or [`block_on`]; a `futures` [`LocalSpawner`]
//! can be used instead when a `LocalPool` already drives the thread.

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::pin, rc::Rc, task::Poll};

use futures::{executor::LocalSpawner, task::LocalSpawnExt};

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Queue `task` to run after the current synchronous work.
    fn schedule(&self, task: Task);
}

thread_local! {
    static QUEUE: RefCell<VecDeque<Task>> = RefCell::new(VecDeque::new());
}

/// Default scheduler backed by the calling thread's task queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentThread;

impl Scheduler for CurrentThread {
    fn schedule(&self, task: Task) {
        QUEUE.with(|queue| queue.borrow_mut().push_back(task));
    }
}

/// Number of tasks waiting in this thread's queue.
pub fn pending() -> usize {
    QUEUE.with(|queue| queue.borrow().len())
}

/// Run queued tasks until the queue is empty, including tasks queued while
/// draining. Returns how many tasks ran.
pub fn run_pending() -> usize {
    let mut ran = 0;

    loop {
        let task = QUEUE.with(|queue| queue.borrow_mut().pop_front());

        match task {
            Some(task) => {
                task();
                ran += 1;
            }
            None => break,
        }
    }

    if ran > 0 {
        log::trace!("ran {} queued tasks", ran);
    }

    ran
}

/// Drive `future` to completion on this thread, draining the task queue
/// whenever the future is not ready yet.
pub fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);

    futures::executor::block_on(futures::future::poll_fn(move |cx| loop {
        if let Poll::Ready(output) = future.as_mut().poll(cx) {
            return Poll::Ready(output);
        }

        if run_pending() == 0 {
            return Poll::Pending;
        }
    }))
}

impl Scheduler for LocalSpawner {
    fn schedule(&self, task: Task) {
        if let Err(err) = self.spawn_local(async move { task() }) {
            log::warn!("dropping task, spawn failed: {}", err);
        }
    }
}

impl<S> Scheduler for Rc<S>
where
    S: Scheduler + ?Sized,
{
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}
