// src/crawl/frontier.rs
// =============================================================================
// This module implements the URL frontier: the queue of pages we know about
// but have not fetched yet.
//
// The frontier is shared by every worker thread, so it has to be:
// - Thread-safe: many producers and many consumers at once
// - Blocking: a worker with nothing to do should sleep, not spin
// - Stoppable: when the crawl is over, every sleeping worker must wake up
//   and be told there is nothing left
//
// We build it as a classic monitor: a Mutex protecting the queue state plus
// a Condvar that consumers wait on. push() wakes one sleeper, request_stop()
// wakes all of them.
//
// Rust concepts:
// - Mutex<T>: Mutual exclusion - only one thread can touch T at a time
// - Condvar: Condition variable - lets threads sleep until something changes
// - VecDeque: Double-ended queue, push_back/pop_front gives us FIFO order
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

// The state protected by the mutex
//
// Both fields live under one lock because pop() needs to look at them
// together: "is there an item?" and "are we stopping?" must be answered
// in the same critical section.
#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    stopped: bool,
}

// The frontier itself
//
// Workers share it behind an Arc (see session.rs); the frontier never hands
// out references to its internals, only owned Strings.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    available: Condvar,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends a URL to the tail of the queue and wakes one waiting consumer.
    //
    // Never blocks (the queue is unbounded) and always succeeds. Pushing
    // after request_stop() is allowed but pointless: consumers will still
    // drain whatever is queued before they exit.
    pub fn push(&self, url: String) {
        let mut state = self.state.lock().unwrap();
        state.queue.push_back(url);
        // One new item can satisfy at most one consumer
        self.available.notify_one();
    }

    // Removes and returns the head of the queue, blocking until an item is
    // available or the frontier has been stopped.
    //
    // Returns:
    //   Some(url) - an item; this caller now owns it exclusively
    //   None      - the frontier is stopped AND empty; the worker should exit
    //
    // Note the order of the checks: even after stop we keep handing out
    // queued items until the queue drains. None means "permanently done",
    // never "momentarily empty".
    pub fn pop(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        // Condvars can wake spuriously, so we re-check the predicate in a loop
        while state.queue.is_empty() && !state.stopped {
            state = self.available.wait(state).unwrap();
        }
        // Either there's an item, or we're stopped (or both - drain first)
        state.queue.pop_front()
    }

    // Marks the frontier as permanently stopping and wakes ALL blocked
    // consumers.
    //
    // notify_all (not notify_one) matters here: every sleeping worker must
    // individually observe the stop flag and exit its loop. Idempotent -
    // calling it twice is harmless.
    pub fn request_stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.stopped = true;
        self.available.notify_all();
    }

    // Point-in-time snapshot of whether the queue is empty.
    //
    // For progress reporting only. By the time the caller looks at the
    // result another thread may have pushed or popped, so this must never
    // be used on its own to decide termination (the pending-work counter
    // in session.rs does that).
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().queue.is_empty()
    }

    // Point-in-time number of queued URLs, also for reporting only.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a monitor?
//    - A pattern that pairs a lock with a condition variable
//    - Threads that find nothing to do wait() on the condvar, which
//      atomically releases the lock and puts them to sleep
//    - Producers notify() to wake them back up after changing the state
//
// 2. Why .unwrap() on lock()?
//    - lock() only fails if another thread panicked while holding the lock
//      (a "poisoned" mutex)
//    - There is no sensible way to continue crawling in that case, so
//      propagating the panic is the standard choice
//
// 3. Why a loop around wait()?
//    - wait() can return spuriously (no notify happened)
//    - Two consumers can also race for one item: both wake, one wins
//    - Re-checking the predicate after every wakeup handles both cases
//
// 4. Why Option<String> instead of a custom enum?
//    - The only two answers pop() can give are "here is a URL" and
//      "we are done forever" - exactly what Option expresses
// -----------------------------------------------------------------------------
