use std::fmt;

use super::{BuildError, Manager, Pool, PoolConfig};

/// Builder for [`Pool`]s.
///
/// Instances of this are created by calling the [`Pool::builder()`] method.
#[must_use = "builder does nothing itself, use `.build()` to build it"]
pub struct PoolBuilder<M: Manager> {
    pub(crate) manager: M,
    pub(crate) config: PoolConfig,
}

// Implemented manually to avoid unnecessary trait bound on `M::Type`.
impl<M> fmt::Debug for PoolBuilder<M>
where
    M: fmt::Debug + Manager,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("manager", &self.manager)
            .field("config", &self.config)
            .finish()
    }
}

impl<M: Manager> PoolBuilder<M> {
    pub(crate) fn new(manager: M) -> Self {
        Self {
            manager,
            config: PoolConfig::default(),
        }
    }

    /// Builds the [`Pool`], creating [`PoolConfig::initial_size`] connections
    /// up front.
    ///
    /// # Errors
    ///
    /// See [`BuildError`] for details.
    pub async fn build(self) -> Result<Pool<M>, BuildError<M::Error>> {
        self.config.validate::<M::Error>()?;
        Pool::from_builder(self).await
    }

    /// Sets a [`PoolConfig`] to build the [`Pool`] with.
    pub fn config(mut self, value: PoolConfig) -> Self {
        self.config = value;
        self
    }

    /// Sets the [`PoolConfig::initial_size`].
    pub fn initial_size(mut self, value: usize) -> Self {
        self.config.initial_size = value;
        self
    }

    /// Sets the [`PoolConfig::max_idle`].
    pub fn max_idle(mut self, value: usize) -> Self {
        self.config.max_idle = value;
        self
    }

    /// Sets the [`PoolConfig::max_active`].
    pub fn max_active(mut self, value: usize) -> Self {
        self.config.max_active = value;
        self
    }
}
