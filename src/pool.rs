use std::{
    fmt,
    sync::{
        atomic::{fence, Ordering},
        Arc,
    },
};

use tokio::sync::TryAcquireError;
use tracing::{debug, trace, warn};

use crate::{
    BuildError, Manager, Object, PoolBuilder, PoolConfig, PoolError, Slots, Status,
};

/// Bounded connection pool.
///
/// This struct can be cloned and transferred across thread boundaries and uses
/// reference counting for its internal state.
///
/// At most [`PoolConfig::max_active`] connections are checked out at any
/// time and at most [`PoolConfig::max_idle`] released connections are kept
/// for reuse. Connections are only created when no idle one is available.
pub struct Pool<M: Manager> {
    pub(crate) inner: Arc<PoolInner<M>>,
}

impl<M> fmt::Debug for Pool<M>
where
    M: fmt::Debug + Manager,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("inner", &self.inner).finish()
    }
}

impl<M: Manager> Clone for Pool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: Manager> Pool<M> {
    /// Instantiates a builder for a new [`Pool`].
    pub fn builder(manager: M) -> PoolBuilder<M> {
        PoolBuilder::new(manager)
    }

    /// Creates a [`Pool`] with `initial_size` connections already idle.
    ///
    /// Shorthand for building with a [`PoolConfig`] holding the given
    /// capacities.
    ///
    /// # Errors
    ///
    /// See [`BuildError`] for details.
    pub async fn new(
        manager: M,
        initial_size: usize,
        max_idle: usize,
        max_active: usize,
    ) -> Result<Self, BuildError<M::Error>> {
        Self::builder(manager)
            .config(PoolConfig {
                initial_size,
                max_idle,
                max_active,
            })
            .build()
            .await
    }

    pub(crate) async fn from_builder(
        builder: PoolBuilder<M>,
    ) -> Result<Self, BuildError<M::Error>> {
        let PoolBuilder { manager, config } = builder;
        let slots = Slots::new(config.max_idle, config.max_active);

        for created in 0..config.initial_size {
            match manager.create().await {
                Ok(conn) => {
                    if let Err(conn) = slots.idle.push(conn) {
                        manager.teardown(conn);
                    }
                }
                Err(e) => {
                    warn!(
                        created,
                        initial_size = config.initial_size,
                        "failed to create initial connection"
                    );
                    while let Some(conn) = slots.idle.pop() {
                        manager.teardown(conn);
                    }
                    return Err(BuildError::FactoryInit(e));
                }
            }
        }

        debug!(
            initial_size = config.initial_size,
            max_idle = config.max_idle,
            max_active = config.max_active,
            "connection pool created"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                manager,
                slots,
                config,
            }),
        })
    }

    /// Retrieves an [`Object`] from this [`Pool`] or waits for an active slot
    /// to become available.
    ///
    /// Waiting ends with [`PoolError::Closed`] once the pool is closed.
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn get(&self) -> Result<Object<M>, PoolError<M::Error>> {
        self.acquire(false).await
    }

    /// Retrieves an [`Object`] from this [`Pool`] without waiting for an
    /// active slot.
    ///
    /// Creating a new connection is still awaited when no idle one exists.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ConnLimitReached`] if every active slot is taken.
    /// See [`PoolError`] for the other cases.
    pub async fn try_get(&self) -> Result<Object<M>, PoolError<M::Error>> {
        self.acquire(true).await
    }

    async fn acquire(&self, non_blocking: bool) -> Result<Object<M>, PoolError<M::Error>> {
        let slots = &self.inner.slots;

        let permit = if non_blocking {
            slots.semaphore.try_acquire().map_err(|e| match e {
                TryAcquireError::Closed => PoolError::Closed,
                TryAcquireError::NoPermits => PoolError::ConnLimitReached,
            })?
        } else {
            slots
                .semaphore
                .acquire()
                .await
                .map_err(|_| PoolError::Closed)?
        };

        if slots.semaphore.is_closed() {
            return Err(PoolError::Closed);
        }

        let conn = if let Some(conn) = slots.idle.pop() {
            trace!("reusing idle connection");
            conn
        } else {
            // The permit is released when dropped here on failure.
            let conn = self.inner.manager.create().await?;
            trace!("created new connection");
            conn
        };

        permit.forget();
        Ok(Object::new(conn, &self.inner))
    }

    /// Closes this [`Pool`].
    ///
    /// All current and future tasks waiting for [`Object`]s will return
    /// [`PoolError::Closed`] immediately and every idle connection is torn
    /// down. Checked out connections are torn down when they are released.
    ///
    /// Closing an already closed pool does nothing.
    pub fn close(&self) {
        let slots = &self.inner.slots;
        if slots.semaphore.is_closed() {
            return;
        }
        slots.semaphore.close();
        // Pairs with the fence in `PoolInner::return_object`.
        fence(Ordering::SeqCst);
        let closed = self.inner.drain_idle();
        debug!(closed, "connection pool closed");
    }

    /// Indicates whether this [`Pool`] has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.slots.semaphore.is_closed()
    }

    /// Number of connections currently idle in this [`Pool`].
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.inner.slots.idle.len()
    }

    /// Number of connections currently checked out of this [`Pool`].
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.slots.active()
    }

    /// Retrieves [`Status`] of this [`Pool`].
    #[must_use]
    pub fn status(&self) -> Status {
        let slots = &self.inner.slots;
        Status {
            max_active: slots.max_active,
            max_idle: slots.idle.capacity(),
            idle: slots.idle.len(),
            active: slots.active(),
            available: slots.semaphore.available_permits(),
        }
    }

    /// Returns [`Manager`] of this [`Pool`].
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.inner.manager
    }
}

pub(crate) struct PoolInner<M: Manager> {
    pub(crate) slots: Slots<M::Type>,
    config: PoolConfig,
    manager: M,
}

impl<M> fmt::Debug for PoolInner<M>
where
    M: fmt::Debug + Manager,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolInner")
            .field("config", &self.config)
            .field("manager", &self.manager)
            .field("idle", &self.slots.idle.len())
            .field("active", &self.slots.active())
            .field("closed", &self.slots.semaphore.is_closed())
            .finish()
    }
}

impl<M: Manager> PoolInner<M> {
    /// Takes back a checked out connection and frees its active slot.
    ///
    /// Usable connections go to the idle queue unless it is full or the pool
    /// is closed; everything else is torn down.
    pub(crate) fn return_object(&self, conn: M::Type, usable: bool) {
        if !usable {
            trace!("tearing down unusable connection");
            self.manager.teardown(conn);
        } else if self.slots.semaphore.is_closed() {
            trace!("tearing down connection released after close");
            self.manager.teardown(conn);
        } else {
            match self.slots.idle.push(conn) {
                Ok(()) => {
                    // `close` may have drained the queue between the check
                    // above and the push.
                    fence(Ordering::SeqCst);
                    if self.slots.semaphore.is_closed() {
                        let _ = self.drain_idle();
                    }
                }
                Err(conn) => {
                    trace!("idle queue full, tearing down connection");
                    self.manager.teardown(conn);
                }
            }
        }
        self.slots.semaphore.add_permits(1);
    }

    /// Frees the active slot of a connection that left the pool for good.
    pub(crate) fn detach_object(&self) {
        self.slots.semaphore.add_permits(1);
    }

    fn drain_idle(&self) -> usize {
        let mut closed = 0;
        while let Some(conn) = self.slots.idle.pop() {
            self.manager.teardown(conn);
            closed += 1;
        }
        closed
    }
}

impl<M: Manager> Drop for PoolInner<M> {
    fn drop(&mut self) {
        let _ = self.drain_idle();
    }
}
