//! Redis-backed counter store
//!
//! Implements [`CounterStore`] over a shared Redis instance. The increment
//! and the create-only expiry run inside one `MULTI`/`EXEC` transaction, so
//! concurrent limiter instances sharing the store can neither lose an
//! increment nor push out a window that an earlier request already opened.
//!
//! `EXPIRE ... NX` requires Redis 7.0 or later.

use std::time::Duration;

use redis::aio::ConnectionManager;

use crate::rate_limit::{CounterError, CounterStore};

/// Counter store over a multiplexed Redis connection.
///
/// The connection manager reconnects on its own and is cheap to clone; one
/// instance is shared by every request task.
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    /// Connect to Redis at `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self, CounterError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(url = %url, "Connected to counter store");
        Ok(Self { conn })
    }
}

impl CounterStore for RedisCounterStore {
    async fn incr_with_window(&self, key: &str, window: Duration) -> Result<i64, CounterError> {
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        pipe.atomic().incr(key, 1i64);
        // NX: attach the TTL only when the key has none, keeping the window
        // fixed rather than sliding.
        pipe.cmd("EXPIRE")
            .arg(key)
            .arg(window.as_secs().max(1))
            .arg("NX")
            .ignore();

        let (count,): (i64,) = pipe.query_async(&mut conn).await?;
        Ok(count)
    }
}
