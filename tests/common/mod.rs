use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

pub type Pool = connpool::Pool<Manager>;

/// Routes pool events to the test output, filtered by `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hands out numbered connections and records which ones were torn down.
///
/// Clones share their counters, so a test can keep one around after moving
/// another into a pool.
#[derive(Clone, Debug, Default)]
pub struct Manager {
    state: Arc<State>,
    fail_after: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    created: AtomicUsize,
    torn_down: Mutex<Vec<usize>>,
}

#[allow(dead_code)]
impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `create` call after the first `n` successful ones fails.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub fn torn_down(&self) -> Vec<usize> {
        let mut ids = self.state.torn_down.lock().unwrap().clone();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl connpool::Manager for Manager {
    type Type = usize;
    type Error = &'static str;

    async fn create(&self) -> Result<usize, &'static str> {
        if let Some(n) = self.fail_after {
            if self.created() >= n {
                return Err("connection refused");
            }
        }
        Ok(self.state.created.fetch_add(1, Ordering::SeqCst))
    }

    fn teardown(&self, conn: usize) {
        self.state.torn_down.lock().unwrap().push(conn);
    }
}
