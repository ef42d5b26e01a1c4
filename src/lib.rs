#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]
#![warn(clippy::pedantic)]
#![warn(
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
#![allow(
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::match_same_arms
)]

mod builder;
mod config;
mod errors;
mod manager;
mod object;
mod pool;

pub use self::{
    builder::PoolBuilder,
    config::PoolConfig,
    errors::{BuildError, PoolError},
    manager::{FnManager, Manager},
    object::Object,
    pool::Pool,
};

use crossbeam_queue::ArrayQueue;
use tokio::sync::Semaphore;

/// The current pool status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Maximum number of connections that may be checked out at once.
    pub max_active: usize,

    /// Maximum number of idle connections kept for reuse.
    pub max_idle: usize,

    /// Connections currently idle in the pool.
    pub idle: usize,

    /// Connections currently checked out.
    pub active: usize,

    /// Permits still available for checking out connections.
    pub available: usize,
}

/// Idle queue and admission semaphore of a pool.
///
/// A permit of `semaphore` is held for every checked out connection. The
/// semaphore being closed is the pool's closed state.
#[derive(Debug)]
struct Slots<T> {
    idle: ArrayQueue<T>,
    semaphore: Semaphore,
    max_active: usize,
}

impl<T> Slots<T> {
    fn new(max_idle: usize, max_active: usize) -> Self {
        Self {
            idle: ArrayQueue::new(max_idle),
            semaphore: Semaphore::new(max_active),
            max_active,
        }
    }

    fn active(&self) -> usize {
        self.max_active
            .saturating_sub(self.semaphore.available_permits())
    }
}
