// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress reporting hooks for long embedding runs.
//!
//! An observer is shared by every call on an adapter; each call gets its own
//! [`ProgressRun`] from [`ProgressObserver::start`], so concurrent calls never
//! see each other's counts.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates per-call progress trackers.
pub trait ProgressObserver: Send + Sync {
    /// Called once per call before the first unit with the number of units.
    fn start(&self, total: usize) -> Box<dyn ProgressRun + '_>;
}

/// Progress state of a single call.
pub trait ProgressRun {
    /// Called after each completed unit.
    fn advance(&mut self);

    /// Called once after the last unit succeeded.
    fn finish(self: Box<Self>) {}

    /// Called instead of `finish` when the call aborts.
    fn abandon(self: Box<Self>) {}
}

/// Terminal progress bar on stderr, one bar per call.
pub struct BarProgress {
    message: &'static str,
}

impl BarProgress {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl ProgressObserver for BarProgress {
    fn start(&self, total: usize) -> Box<dyn ProgressRun + '_> {
        let pb = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar().template("{msg}: [{bar:40.cyan/blue}] {pos}/{len}") {
            Ok(style) => pb.set_style(style.progress_chars("##.")),
            Err(err) => tracing::debug!(%err, "invalid progress template"),
        }
        pb.set_message(self.message);
        Box::new(BarRun(pb))
    }
}

struct BarRun(ProgressBar);

impl ProgressRun for BarRun {
    fn advance(&mut self) {
        self.0.inc(1);
    }

    fn finish(self: Box<Self>) {
        self.0.finish_and_clear();
    }

    fn abandon(self: Box<Self>) {
        self.0.abandon();
    }
}

/// Calls `f(completed, total)` after every completed unit of a call.
pub struct CallbackProgress<F> {
    callback: F,
}

impl<F> CallbackProgress<F>
where
    F: Fn(usize, usize) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressObserver for CallbackProgress<F>
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn start(&self, total: usize) -> Box<dyn ProgressRun + '_> {
        Box::new(CallbackRun {
            callback: &self.callback,
            total,
            completed: 0,
        })
    }
}

struct CallbackRun<'a, F> {
    callback: &'a F,
    total: usize,
    completed: usize,
}

impl<F: Fn(usize, usize)> ProgressRun for CallbackRun<'_, F> {
    fn advance(&mut self) {
        self.completed += 1;
        (self.callback)(self.completed, self.total);
    }
}
