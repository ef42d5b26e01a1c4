use std::{fmt, future::Future};

use async_trait::async_trait;

/// Manager responsible for creating new connections and tearing down the
/// ones the pool no longer keeps.
#[async_trait]
pub trait Manager: Sync + Send {
    /// Type of connections that this [`Manager`] creates.
    type Type: Send;
    /// Error that this [`Manager`] can return when creating connections.
    type Error;

    /// Creates a new instance of [`Manager::Type`].
    async fn create(&self) -> Result<Self::Type, Self::Error>;

    /// Tears down a connection the pool is discarding.
    ///
    /// Called exactly once for every connection that is closed by the pool,
    /// either because the idle queue was full, the connection was marked
    /// unusable or the pool shut down. The default implementation drops it.
    ///
    /// Connections released after every [`Pool`] handle was dropped cannot
    /// reach the manager any more and are dropped without a teardown call.
    ///
    /// [`Pool`]: crate::Pool
    fn teardown(&self, conn: Self::Type) {
        drop(conn);
    }
}

/// [`Manager`] backed by a plain factory closure.
///
/// Teardown drops the connection, so connection types that need an explicit
/// close should implement [`Manager`] themselves or close in their [`Drop`].
pub struct FnManager<F> {
    factory: F,
}

impl<F> FnManager<F> {
    /// Wraps the given `factory`.
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> fmt::Debug for FnManager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("FnManager { .. }")
    }
}

#[async_trait]
impl<F, Fut, T, E> Manager for FnManager<F>
where
    F: Fn() -> Fut + Sync + Send,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: 'static,
{
    type Type = T;
    type Error = E;

    async fn create(&self) -> Result<T, E> {
        (self.factory)().await
    }
}
