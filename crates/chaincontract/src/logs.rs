//! Continuous log feed.
//!
//! Each round long-polls `waitforlogs` from the cursor, hands the decoded
//! entries to the handler in order, then moves the cursor to the node's
//! `nextblock`. Rounds never overlap. The long-poll is raced against a
//! shutdown signal so a stop request does not wait for new blocks.

use std::future::Future;

use async_trait::async_trait;
use chaincontract_core::{BlockPosition, ContractError, ContractLogEntry, LogCursor};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::contract::Contract;
use crate::options::LogOptions;

/// Receives decoded log entries from the poll loop.
#[async_trait]
pub trait LogHandler: Send + 'static {
    async fn handle(&mut self, entry: ContractLogEntry);
}

/// Blanket impl so closures can be used as handlers.
#[async_trait]
impl<F> LogHandler for F
where
    F: FnMut(ContractLogEntry) + Send + 'static,
{
    async fn handle(&mut self, entry: ContractLogEntry) {
        self(entry)
    }
}

/// One contract's poll loop. Owns its cursor; two pollers on the same
/// contract do not share progress.
pub struct LogPoller<H: LogHandler> {
    contract: Contract,
    handler: H,
    opts: LogOptions,
    cursor: LogCursor,
    position: watch::Sender<BlockPosition>,
}

impl<H: LogHandler> LogPoller<H> {
    pub fn new(contract: Contract, handler: H, opts: LogOptions) -> Self {
        let cursor = LogCursor::new(opts.from.unwrap_or_default());
        let (position, _) = watch::channel(cursor.position());
        Self {
            contract,
            handler,
            opts,
            cursor,
            position,
        }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> BlockPosition {
        self.cursor.position()
    }

    /// A view of the cursor that follows every advance.
    pub fn watch_cursor(&self) -> watch::Receiver<BlockPosition> {
        self.position.subscribe()
    }

    /// Run one round. Returns the number of entries delivered.
    pub async fn poll_once(&mut self) -> Result<usize, ContractError> {
        let logs = self.contract.logs(self.round_options()).await?;
        self.deliver(logs).await
    }

    fn round_options(&self) -> LogOptions {
        LogOptions {
            from: Some(self.cursor.position()),
            ..self.opts.clone()
        }
    }

    async fn deliver(&mut self, logs: chaincontract_core::ContractLogs) -> Result<usize, ContractError> {
        let delivered = logs.entries.len();
        for entry in logs.entries {
            self.handler.handle(entry).await;
        }

        match logs.nextblock {
            Some(next) if self.cursor.advance(next) => {
                self.position.send_replace(self.cursor.position());
            }
            Some(next) => {
                tracing::warn!(
                    address = %self.contract.address(),
                    cursor = %self.cursor.position(),
                    nextblock = next,
                    "node reported an earlier nextblock, cursor kept"
                );
            }
            None => {
                tracing::debug!(address = %self.contract.address(), "empty round, cursor kept");
            }
        }

        tracing::debug!(
            address = %self.contract.address(),
            delivered,
            cursor = %self.cursor.position(),
            "log round complete"
        );
        Ok(delivered)
    }

    /// Poll until `shutdown` resolves or the transport fails.
    pub async fn run_until<S>(mut self, shutdown: S) -> Result<(), ContractError>
    where
        S: Future + Send,
    {
        tokio::pin!(shutdown);
        tracing::info!(
            address = %self.contract.address(),
            from = %self.cursor.position(),
            "log loop started"
        );

        loop {
            let round = self.round_options();
            let logs = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!(
                        address = %self.contract.address(),
                        cursor = %self.cursor.position(),
                        "log loop stopped"
                    );
                    return Ok(());
                }
                res = self.contract.logs(round) => res?,
            };
            self.deliver(logs).await?;
        }
    }
}

/// Handle to a spawned poll loop.
///
/// Dropping it stops the loop at its next suspension point.
pub struct LogSubscription {
    stop: Option<oneshot::Sender<()>>,
    cursor: watch::Receiver<BlockPosition>,
    task: Option<JoinHandle<Result<(), ContractError>>>,
}

impl LogSubscription {
    pub(crate) fn spawn<H: LogHandler>(poller: LogPoller<H>) -> Self {
        let (stop, stopped) = oneshot::channel::<()>();
        let cursor = poller.watch_cursor();
        let task = tokio::spawn(async move {
            let res = poller.run_until(stopped).await;
            if let Err(e) = &res {
                tracing::error!(error = %e, "log loop terminated");
            }
            res
        });
        Self {
            stop: Some(stop),
            cursor,
            task: Some(task),
        }
    }

    /// Where the next round will start.
    pub fn cursor(&self) -> BlockPosition {
        *self.cursor.borrow()
    }

    pub fn watch_cursor(&self) -> watch::Receiver<BlockPosition> {
        self.cursor.clone()
    }

    /// `true` once the loop has exited (stopped or failed).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the loop and wait for it to exit.
    pub async fn cancel(mut self) -> Result<(), ContractError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.join_inner().await
    }

    /// Wait for the loop to exit on its own (transport failure).
    pub async fn join(mut self) -> Result<(), ContractError> {
        self.join_inner().await
    }

    async fn join_inner(&mut self) -> Result<(), ContractError> {
        match self.task.take() {
            Some(task) => match task.await {
                Ok(res) => res,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Ok(()),
            },
            None => Ok(()),
        }
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
