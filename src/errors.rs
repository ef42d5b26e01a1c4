use thiserror::Error;

/// Possible errors returned by [`Pool::get()`] and [`Pool::try_get()`].
///
/// [`Pool::get()`]: super::Pool::get
/// [`Pool::try_get()`]: super::Pool::try_get
#[derive(Debug, Error)]
pub enum PoolError<E> {
    /// [`Pool`] has been closed, either before or while waiting for a slot.
    ///
    /// [`Pool`]: super::Pool
    #[error("Pool has been closed")]
    Closed,

    /// [`Pool::try_get()`] found every active slot in use.
    ///
    /// [`Pool::try_get()`]: super::Pool::try_get
    #[error("Active connection limit reached")]
    ConnLimitReached,

    /// Backend reported an error while creating a new connection.
    #[error("Error occurred while creating a new connection: {0}")]
    Backend(#[source] E),
}

impl<E> From<E> for PoolError<E> {
    fn from(e: E) -> Self {
        Self::Backend(e)
    }
}

/// Possible errors returned when building a [`Pool`].
///
/// [`Pool`]: super::Pool
#[derive(Debug, Error)]
pub enum BuildError<E> {
    /// The capacity settings can never describe a working pool.
    #[error(
        "Invalid pool capacity: initial_size={initial_size}, max_idle={max_idle}, \
         max_active={max_active}"
    )]
    InvalidCapacity {
        /// Requested number of pre-created connections.
        initial_size: usize,
        /// Requested idle capacity.
        max_idle: usize,
        /// Requested active capacity.
        max_active: usize,
    },

    /// Creating one of the initial connections failed.
    #[error("Error occurred while creating the initial connections: {0}")]
    FactoryInit(#[source] E),
}
