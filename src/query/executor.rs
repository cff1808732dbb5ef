//! Asynchronous statement execution.
//!
//! A statement is submitted without waiting for its result, then the
//! operation status is polled until it reaches a terminal state. While the
//! operation is pending, server-side log lines are drained and forwarded at
//! `info` level before the next poll, so logs always precede the status
//! change they belong to.

use crate::config::PollConfig;
use crate::connection::Connection;
use crate::error::{ConnectionError, HiveResult, QueryError};
use crate::query::statement::{bind_parameters, Parameter};
use crate::transport::{HiveSession, OperationStatus, ResultData};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs statements on open connections.
#[derive(Debug, Clone, Default)]
pub struct StatementExecutor {
    poll: PollConfig,
    cancel: Option<CancellationToken>,
}

impl StatementExecutor {
    /// Create an executor with the given polling behaviour.
    pub fn new(poll: PollConfig) -> Self {
        Self { poll, cancel: None }
    }

    /// Stop polling, with `QueryError::Canceled`, once `token` is canceled.
    ///
    /// The server-side operation is not interrupted.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get the polling configuration.
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Execute `sql` on `connection` and wait for it to finish.
    ///
    /// If `auto_begin` is set and no transaction is open, one is marked open
    /// first. The returned [`Cursor`] borrows the connection's session so the
    /// caller can fetch rows.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::ConnectionClosed` if the connection is not open;
    ///   nothing is sent in that case.
    /// - `QueryError::ParameterBindingError` for bad bindings.
    /// - `QueryError::DatabaseException` for any driver failure or an
    ///   operation that ends in an error state.
    /// - `QueryError::Timeout` / `QueryError::Canceled` when a deadline or
    ///   cancellation token is configured and fires.
    pub async fn execute<'c>(
        &self,
        connection: &'c mut Connection,
        sql: &str,
        bindings: &[Parameter],
        auto_begin: bool,
    ) -> HiveResult<Cursor<'c>> {
        if !connection.state().is_open() {
            return Err(ConnectionError::ConnectionClosed(connection.name().to_string()).into());
        }

        let sql = bind_parameters(sql, bindings)?;

        if auto_begin && !connection.transaction_open() {
            debug!(connection = connection.name(), "BEGIN (no-op for hive)");
            connection.set_transaction_open(true);
        }

        let name = connection.name().to_string();
        debug!("Using hive connection \"{}\".", name);
        debug!("On {}: {}", name, sql);

        let started = Instant::now();
        let session = connection.handle_mut()?;
        session
            .execute_async(&sql)
            .await
            .map_err(QueryError::from)?;
        let status = self.wait_for_completion(&mut *session).await?;
        let elapsed = started.elapsed();

        debug!(
            "SQL status: {} in {:.2} seconds",
            status,
            elapsed.as_secs_f64()
        );

        Ok(Cursor {
            session,
            status,
            elapsed,
        })
    }

    async fn wait_for_completion(
        &self,
        session: &mut dyn HiveSession,
    ) -> Result<OperationStatus, QueryError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;
        let mut response = session.poll_status().await?;

        while response.status.is_pending() {
            for line in session.fetch_logs().await? {
                info!("{}", line);
            }

            if self.is_canceled() {
                return Err(QueryError::Canceled);
            }

            let remaining = match self.poll.deadline() {
                Some(deadline) => {
                    let elapsed = started.elapsed();
                    if elapsed >= deadline {
                        return Err(QueryError::Timeout {
                            timeout_ms: deadline.as_millis() as u64,
                        });
                    }
                    Some(deadline - elapsed)
                }
                None => None,
            };

            match self.poll.delay_for(attempt) {
                Some(delay) => {
                    let delay = remaining.map_or(delay, |r| delay.min(r));
                    self.sleep(delay).await?;
                }
                None => tokio::task::yield_now().await,
            }

            attempt = attempt.saturating_add(1);
            response = session.poll_status().await?;
        }

        if response.status.is_success() {
            Ok(response.status)
        } else {
            let message = response
                .error_message
                .unwrap_or_else(|| format!("Operation ended in state {}", response.status));
            Err(QueryError::DatabaseException(message))
        }
    }

    fn is_canceled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    async fn sleep(&self, delay: Duration) -> Result<(), QueryError> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(QueryError::Canceled),
                    _ = tokio::time::sleep(delay) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

/// A finished statement whose rows can still be fetched.
pub struct Cursor<'c> {
    session: &'c mut (dyn HiveSession + 'static),
    status: OperationStatus,
    elapsed: Duration,
}

impl<'c> Cursor<'c> {
    /// Terminal status of the operation.
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// Time between submission and the terminal status.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fetch every remaining row.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::DatabaseException` if the driver fails.
    pub async fn fetch_all(self) -> Result<ResultData, QueryError> {
        Ok(self.session.fetch_all().await?)
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("status", &self.status)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
