use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::{Arc, Weak},
};

use crate::{pool::PoolInner, Manager, Pool};

/// Wrapper around a pooled connection which implements [`Deref`],
/// [`DerefMut`] and [`Drop`] traits.
///
/// Use this object just as if it was of type `M::Type` and upon leaving a
/// scope the [`Drop::drop()`] will take care of returning it to the pool.
/// A connection found to be broken should be marked with
/// [`Object::invalidate()`] so the pool tears it down instead of reusing it.
#[must_use]
pub struct Object<M: Manager> {
    /// The actual connection, `None` once released.
    conn: Option<M::Type>,

    /// Cleared by [`Object::invalidate()`].
    usable: bool,

    /// Pool to return the connection to.
    pool: Weak<PoolInner<M>>,
}

impl<M> fmt::Debug for Object<M>
where
    M: fmt::Debug + Manager,
    M::Type: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("conn", &self.conn)
            .field("usable", &self.usable)
            .finish()
    }
}

impl<M: Manager> Object<M> {
    pub(crate) fn new(conn: M::Type, pool: &Arc<PoolInner<M>>) -> Self {
        Self {
            conn: Some(conn),
            usable: true,
            pool: Arc::downgrade(pool),
        }
    }

    /// Marks the connection as broken. Releasing it afterwards tears it
    /// down instead of putting it back into the idle queue.
    ///
    /// There is no way back to the usable state.
    pub fn invalidate(this: &mut Self) {
        this.usable = false;
    }

    /// Indicates whether the connection will be offered for reuse on release.
    #[must_use]
    pub fn is_usable(this: &Self) -> bool {
        this.usable
    }

    /// Hands the connection back to its [`Pool`].
    ///
    /// This is the same as dropping the [`Object`], spelled out.
    pub fn release(this: Self) {
        drop(this);
    }

    /// Takes this [`Object`] from its [`Pool`] permanently. The active slot
    /// it occupied becomes available again and the pool will never tear
    /// this connection down.
    #[must_use]
    pub fn take(mut this: Self) -> M::Type {
        let conn = this.conn.take().unwrap();
        if let Some(pool) = this.pool.upgrade() {
            pool.detach_object();
        }
        conn
    }

    /// Returns the [`Pool`] this [`Object`] belongs to.
    ///
    /// Since [`Object`]s only hold a [`Weak`] reference to the [`Pool`] they
    /// come from, this can fail and return [`None`] instead.
    pub fn pool(this: &Self) -> Option<Pool<M>> {
        this.pool.upgrade().map(|inner| Pool { inner })
    }
}

impl<M: Manager> Drop for Object<M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Some(pool) = self.pool.upgrade() {
                pool.return_object(conn, self.usable);
            }
        }
    }
}

impl<M: Manager> Deref for Object<M> {
    type Target = M::Type;
    fn deref(&self) -> &M::Type {
        self.conn.as_ref().unwrap()
    }
}

impl<M: Manager> DerefMut for Object<M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().unwrap()
    }
}

impl<M: Manager> AsRef<M::Type> for Object<M> {
    fn as_ref(&self) -> &M::Type {
        self
    }
}

impl<M: Manager> AsMut<M::Type> for Object<M> {
    fn as_mut(&mut self) -> &mut M::Type {
        self
    }
}
