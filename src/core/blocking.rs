// src/core/blocking.rs

//! Manages clients that are blocked waiting for data on list keys.
//!
//! A push onto a watched key is handed straight to the oldest waiting client
//! instead of entering the list. A waiter registered with a target key
//! (`BRPOPLPUSH`) completes the second half of the move itself on wake: it
//! pushes the element into the target through the normal push path, which
//! consults the target's own waiters and so chains the rendezvous, and only
//! then replies. A wrong-typed target surfaces the type error to that waiter
//! and re-offers the element to the source key, so the next waiter in FIFO
//! order gets its chance.

use crate::core::commands::command_trait::{CommandExt, WriteOutcome};
use crate::core::commands::list;
use crate::core::commands::list::logic::{list_pop_logic, rpoplpush_logic};
use crate::core::events::UnitOfWork;
use crate::core::state::ServerState;
use crate::core::storage::db::{Db, ExecutionContext, PopDirection};
use crate::core::{Command, RespValue, ZirconError};
use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

/// The value handed to a woken client: the key that was pushed and the pushed
/// element in decoded form.
#[derive(Debug, Clone)]
pub struct PoppedValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// The result of a blocking wait.
#[derive(Debug)]
enum BlockerOutcome {
    /// The client was woken up with data.
    Woken(PoppedValue),
    /// The operation timed out before any data arrived.
    TimedOut,
}

/// The waker sends the woken value, eliminating the need for a re-read.
type Waker = oneshot::Sender<PoppedValue>;

/// A shareable waker struct. The `Option` allows it to be `take()`-n to prevent multiple sends.
type SharedWaker = Arc<Mutex<Option<Waker>>>;

/// Holds information about a waiting client, including its session ID for cleanup.
/// A pop-and-push waiter keeps its target key on its own stack and completes
/// the push half itself after wake-up, so the registry entry stays minimal.
#[derive(Clone, Debug)]
struct WaiterInfo {
    session_id: u64,
    waker: SharedWaker,
}

/// Manages all clients currently blocked on list operations.
///
/// Key: the name of the key being watched. Value: a FIFO queue of waiters,
/// oldest first; delivery order is strict block-time order.
#[derive(Debug, Default)]
pub struct BlockerManager {
    waiters: DashMap<Bytes, VecDeque<WaiterInfo>>,
}

impl BlockerManager {
    /// Creates a new, empty `BlockerManager`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Orchestrates blocking list pop operations (`BLPOP`, `BRPOP`).
    /// `wait_timeout` of `None` blocks indefinitely.
    pub async fn orchestrate_blocking_pop(
        self: &Arc<Self>,
        ctx: &mut ExecutionContext<'_>,
        keys: &[Bytes],
        direction: PopDirection,
        wait_timeout: Option<Duration>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        // 1. Attempt a non-blocking pop across all keys first.
        for key in keys {
            let (resp, outcome) = list_pop_logic(ctx, key, direction).await?;
            if resp != RespValue::Null {
                // The pop is recorded explicitly because the blocking wrapper
                // itself is never propagated.
                let pop_cmd = match direction {
                    PopDirection::Left => {
                        Command::LPop(list::lpop::LPop { key: key.clone() })
                    }
                    PopDirection::Right => {
                        Command::RPop(list::rpop::RPop { key: key.clone() })
                    }
                };
                ctx.state
                    .event_bus
                    .publish(UnitOfWork::Command(Box::new(pop_cmd)));
                return Ok((
                    RespValue::Array(vec![RespValue::BulkString(key.clone()), resp]),
                    outcome,
                ));
            }
        }

        // 2. Blocking inside a transaction is forbidden; the only option is to
        // treat the situation as an immediate timeout.
        if ctx.in_transaction {
            return Ok((RespValue::NullArray, WriteOutcome::DidNotWrite));
        }

        // 3. Register the waker BEFORE releasing locks to prevent a race where
        // a push happens after the non-blocking check but before we wait.
        let (tx, rx) = oneshot::channel();
        let shared_waker = Arc::new(Mutex::new(Some(tx)));
        let waiter_info = WaiterInfo {
            session_id: ctx.session_id,
            waker: shared_waker.clone(),
        };
        for key in keys {
            self.waiters
                .entry(key.clone())
                .or_default()
                .push_back(waiter_info.clone());
        }
        debug!(
            "Session {}: Registered to block on keys: {:?}",
            ctx.session_id, keys
        );

        // 4. Release locks and enter the blocking wait.
        ctx.release_locks();
        let block_result = wait_for_handoff(rx, wait_timeout).await;

        // 5. Process the result and clean up the waiter.
        self.remove_waiter(keys, &shared_waker);

        match block_result {
            BlockerOutcome::TimedOut => Ok((RespValue::NullArray, WriteOutcome::DidNotWrite)),
            BlockerOutcome::Woken(popped) => Ok((
                RespValue::Array(vec![
                    RespValue::BulkString(popped.key),
                    RespValue::BulkString(popped.value),
                ]),
                // The write was recorded by the notifying push.
                WriteOutcome::DidNotWrite,
            )),
        }
    }

    /// Orchestrates the `BRPOPLPUSH` command.
    pub async fn orchestrate_blocking_rpoplpush(
        self: &Arc<Self>,
        ctx: &mut ExecutionContext<'_>,
        source: &Bytes,
        destination: &Bytes,
        wait_timeout: Option<Duration>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        // 1. Attempt a non-blocking RPOPLPUSH first.
        let (resp, outcome) = rpoplpush_logic(ctx, source, destination).await?;
        if resp != RespValue::Null {
            ctx.state
                .event_bus
                .publish(UnitOfWork::Command(Box::new(Command::RPopLPush(
                    list::rpoplpush::RPopLPush {
                        source: source.clone(),
                        destination: destination.clone(),
                    },
                ))));
            return Ok((resp, outcome));
        }

        // 2. Blocking against an empty list in a transaction returns immediately.
        if ctx.in_transaction {
            return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
        }

        // 3. Register the waker for the source key BEFORE releasing locks.
        let (tx, rx) = oneshot::channel();
        let shared_waker = Arc::new(Mutex::new(Some(tx)));
        let waiter_info = WaiterInfo {
            session_id: ctx.session_id,
            waker: shared_waker.clone(),
        };
        self.waiters
            .entry(source.clone())
            .or_default()
            .push_back(waiter_info);
        debug!(
            "Session {}: Registered to block on source key: {}",
            ctx.session_id,
            String::from_utf8_lossy(source)
        );

        // 4. Release locks and block.
        ctx.release_locks();
        let block_result = wait_for_handoff(rx, wait_timeout).await;

        // 5. Process the result and clean up.
        self.remove_waiter(std::slice::from_ref(source), &shared_waker);

        match block_result {
            BlockerOutcome::TimedOut => Ok((RespValue::Null, WriteOutcome::DidNotWrite)),
            BlockerOutcome::Woken(popped) => {
                self.complete_move_for_woken(ctx, source, destination, popped)
                    .await
            }
        }
    }

    /// Called by list write commands (`LPUSH`/`RPUSH`/`RPOPLPUSH`). It hands
    /// the pushed element to the oldest live waiter; if one accepts, the value
    /// bypasses the list entirely and the caller must not insert it.
    pub fn notify_and_consume_for_push(&self, key: &Bytes, value: &Bytes) -> bool {
        loop {
            let Some(mut queue) = self.waiters.get_mut(key) else {
                return false;
            };
            let Some(waiter_info) = queue.front() else {
                drop(queue);
                self.waiters.remove_if(key, |_, q| q.is_empty());
                return false;
            };

            // Clean up stale waiters whose receivers have been dropped (e.g. timeout).
            if waiter_info.waker.lock().unwrap().is_none() {
                queue.pop_front();
                continue;
            }

            // Take the waker first so no other push can deliver to this waiter.
            if let Some(waker) = queue
                .pop_front()
                .and_then(|info| info.waker.lock().unwrap().take())
            {
                let popped_value = PoppedValue {
                    key: key.clone(),
                    value: value.clone(),
                };
                if waker.send(popped_value).is_ok() {
                    debug!(
                        "Atomically handed off value to a waiter for list key '{}'",
                        String::from_utf8_lossy(key)
                    );
                    return true;
                }
            } else {
                return false;
            }
        }
    }

    /// Number of registered waiters across all keys, for `INFO`.
    pub fn blocked_client_count(&self) -> usize {
        self.waiters.iter().map(|queue| queue.len()).sum()
    }

    /// Removes a specific waker from all associated key queues.
    fn remove_waiter(&self, keys: &[Bytes], waker_to_remove: &SharedWaker) {
        for key in keys {
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|info| !Arc::ptr_eq(&info.waker, waker_to_remove));
                if queue.is_empty() {
                    drop(queue);
                    self.waiters.remove_if(key, |_, q| q.is_empty());
                }
            }
        }
    }

    /// Removes all wakers for a given session_id upon client disconnection.
    pub fn remove_waiters_for_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|info| info.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
        debug!(
            "Removed any pending blockers for session_id {}.",
            session_id
        );
    }

    /// Completes the push half for a woken `BRPOPLPUSH` client. The element
    /// was consumed by the hand-off; it now either enters the destination or,
    /// when the destination is wrong-typed, goes back to the source key for
    /// the next waiter.
    async fn complete_move_for_woken(
        &self,
        ctx: &mut ExecutionContext<'_>,
        source: &Bytes,
        destination: &Bytes,
        popped: PoppedValue,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let push_cmd = Command::LPush(list::lpush::LPush {
            key: destination.clone(),
            value: popped.value.clone(),
        });

        let mut dest_ctx = ExecutionContext {
            state: ctx.state.clone(),
            locks: ctx.db.determine_locks_for_command(&push_cmd).await,
            db: ctx.db,
            command: Some(push_cmd.clone()),
            session_id: ctx.session_id,
            in_transaction: false,
        };

        match push_cmd.execute(&mut dest_ctx).await {
            Ok((_, outcome)) => {
                drop(dest_ctx);
                if !matches!(outcome, WriteOutcome::DidNotWrite) {
                    ctx.state.add_dirty(1);
                    ctx.state
                        .event_bus
                        .publish(UnitOfWork::Command(Box::new(push_cmd)));
                }
                Ok((RespValue::BulkString(popped.value), WriteOutcome::DidNotWrite))
            }
            Err(err @ ZirconError::WrongType) => {
                drop(dest_ctx);
                // The element has not been delivered: offer it to the next
                // waiter on the source, or reinsert it at the source tail.
                self.hand_off_or_push_back(&ctx.state, ctx.db, source, popped.value)
                    .await?;
                Err(err)
            }
            Err(other) => Err(other),
        }
    }

    /// Re-offers a consumed element to the source key: the next waiter if one
    /// exists, otherwise a plain tail insert (recreating the list if needed).
    async fn hand_off_or_push_back(
        &self,
        state: &Arc<ServerState>,
        db: &Db,
        key: &Bytes,
        value: Bytes,
    ) -> Result<(), ZirconError> {
        let push_cmd = Command::RPush(list::rpush::RPush {
            key: key.clone(),
            value,
        });
        let mut push_ctx = ExecutionContext {
            state: state.clone(),
            locks: db.determine_locks_for_command(&push_cmd).await,
            db,
            command: Some(push_cmd.clone()),
            session_id: 0,
            in_transaction: false,
        };
        // The push path consults this registry itself, so a waiting client is
        // served before the list is touched.
        let (_, outcome) = push_cmd.execute(&mut push_ctx).await?;
        drop(push_ctx);
        if !matches!(outcome, WriteOutcome::DidNotWrite) {
            state.add_dirty(1);
            state
                .event_bus
                .publish(UnitOfWork::Command(Box::new(push_cmd)));
        }
        Ok(())
    }
}

/// Parks on the hand-off channel, bounded by the optional timeout.
async fn wait_for_handoff(
    rx: oneshot::Receiver<PoppedValue>,
    wait_timeout: Option<Duration>,
) -> BlockerOutcome {
    match wait_timeout {
        None => match rx.await {
            Ok(popped) => BlockerOutcome::Woken(popped),
            Err(_) => BlockerOutcome::TimedOut,
        },
        Some(duration) => match timeout(duration, rx).await {
            Ok(Ok(popped)) => BlockerOutcome::Woken(popped),
            _ => BlockerOutcome::TimedOut,
        },
    }
}
