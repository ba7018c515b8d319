/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};

use super::lock;

/// A blocking FIFO queue of tasks with a stop flag.
///
/// Consumers calling [`pop`](TaskQueue::pop) sleep while the queue is empty.
/// After [`stop`](TaskQueue::stop) has been called, consumers drain the tasks
/// still in the queue, and then [`pop`](TaskQueue::pop) returns `None`.
#[derive(Debug)]
pub struct TaskQueue<T> {
    state: Mutex<State<T>>,
    /// Signalled when a task is pushed, broadcast when the queue is stopped.
    available: Condvar,
}

#[derive(Debug)]
struct State<T> {
    tasks: VecDeque<T>,
    stopped: bool,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends a task and wakes up one consumer.
    ///
    /// Tasks pushed after [`stop`](TaskQueue::stop) are still handed out to
    /// consumers that have not exited yet.
    pub fn push(&self, task: T) {
        lock(&self.state).tasks.push_back(task);
        self.available.notify_one();
    }

    /// Removes the oldest task, blocking while the queue is empty and has not
    /// been stopped.
    ///
    /// Returns `None` if the queue has been stopped and is empty.
    pub fn pop(&self) -> Option<T> {
        let mut state = self
            .available
            .wait_while(lock(&self.state), |state| {
                state.tasks.is_empty() && !state.stopped
            })
            .unwrap_or_else(PoisonError::into_inner);
        state.tasks.pop_front()
    }

    /// Stops the queue and wakes up all consumers.
    pub fn stop(&self) {
        lock(&self.state).stopped = true;
        self.available.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        lock(&self.state).stopped
    }

    /// Returns the number of tasks waiting in the queue.
    pub fn len(&self) -> usize {
        lock(&self.state).tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
