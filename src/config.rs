use tokio::sync::Semaphore;

use crate::BuildError;

/// [`Pool`] configuration.
///
/// [`Pool`]: super::Pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Number of connections created while building the [`Pool`]. They are
    /// placed in the idle queue, so this must not exceed `max_idle`.
    ///
    /// [`Pool`]: super::Pool
    pub initial_size: usize,

    /// Maximum number of idle connections kept for reuse.
    pub max_idle: usize,

    /// Maximum number of connections checked out at the same time.
    pub max_active: usize,
}

impl PoolConfig {
    /// Creates a new [`PoolConfig`] without pre-created connections and with
    /// both `max_idle` and `max_active` set to `max_size`.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            initial_size: 0,
            max_idle: max_size,
            max_active: max_size,
        }
    }

    /// Checks that the capacities describe a usable pool.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidCapacity`] if `max_idle` or `max_active`
    /// is zero, if `initial_size` exceeds `max_idle` or if `max_active` is
    /// larger than the semaphore can count.
    pub fn validate<E>(&self) -> Result<(), BuildError<E>> {
        if self.max_idle == 0
            || self.max_active == 0
            || self.max_active > Semaphore::MAX_PERMITS
            || self.initial_size > self.max_idle
        {
            return Err(BuildError::InvalidCapacity {
                initial_size: self.initial_size,
                max_idle: self.max_idle,
                max_active: self.max_active,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    /// Creates a new [`PoolConfig`] with `max_idle` and `max_active` being set
    /// to `cpu_count * 4` ignoring any logical CPUs (Hyper-Threading).
    fn default() -> Self {
        Self::new(num_cpus::get_physical() * 4)
    }
}
