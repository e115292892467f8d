// src/core/commands/list/logic.rs

use crate::core::commands::command_trait::WriteOutcome;
use crate::core::commands::list;
use crate::core::events::UnitOfWork;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{ExecutionContext, PopDirection, PushDirection};
use crate::core::storage::list_object::ListObject;
use crate::core::storage::value::Value;
use crate::core::{Command, RespValue, ZirconError};
use bytes::Bytes;

/// Shared logic for `LPUSH` and `RPUSH` commands.
pub(crate) async fn list_push_logic<'a>(
    ctx: &mut ExecutionContext<'a>,
    key: &Bytes,
    value: &Bytes,
    direction: PushDirection,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let state = ctx.state.clone();
    let limits = state.list_limits().await;
    let val = Value::try_encode(value.clone());
    let decoded = val.decoded();

    let (shard, guard) = ctx.guard_for_key(key)?;

    if let Some(entry) = guard.peek(key)
        && !matches!(entry.data, DataValue::List(_))
    {
        return Err(ZirconError::WrongType);
    }

    // Attempt to atomically hand off the value to a waiting client (from BLPOP
    // etc.). The value then bypasses the list storage entirely; a successful
    // delivery never creates the key.
    if state.blocker_manager.notify_and_consume_for_push(key, &decoded) {
        // The hand-off left no trace in the keyspace, so record the atomic
        // push-then-pop pair for propagation consumers.
        let push_cmd = match direction {
            PushDirection::Left => Command::LPush(list::lpush::LPush {
                key: key.clone(),
                value: value.clone(),
            }),
            PushDirection::Right => Command::RPush(list::rpush::RPush {
                key: key.clone(),
                value: value.clone(),
            }),
        };
        let pop_cmd = match direction {
            PushDirection::Left => Command::LPop(list::lpop::LPop { key: key.clone() }),
            PushDirection::Right => Command::RPop(list::rpop::RPop { key: key.clone() }),
        };
        state
            .event_bus
            .publish(UnitOfWork::Transaction(vec![push_cmd, pop_cmd]));

        // The waiter consumed the single pushed element: the length after the
        // push is one.
        return Ok((RespValue::Integer(1), WriteOutcome::DidNotWrite));
    }

    // Standard path: no waiter was available, so modify the list in storage.
    let entry = guard.get_or_insert_with_mut(key.clone(), || {
        StoredValue::new(DataValue::List(ListObject::new_packed()))
    });
    let DataValue::List(lobj) = &mut entry.data else {
        return Err(ZirconError::WrongType);
    };
    lobj.push(val, direction, &limits);
    let final_len = lobj.len() as i64;
    shard.update_memory(entry.refresh_size());

    Ok((
        RespValue::Integer(final_len),
        WriteOutcome::Write { keys_modified: 1 },
    ))
}

/// Shared logic for `LPOP` and `RPOP` commands.
pub(crate) async fn list_pop_logic<'a>(
    ctx: &mut ExecutionContext<'a>,
    key: &Bytes,
    direction: PopDirection,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let (shard, guard) = ctx.guard_for_key(key)?;

    let Some(entry) = guard.get_mut(key) else {
        return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
    };
    let DataValue::List(lobj) = &mut entry.data else {
        return Err(ZirconError::WrongType);
    };

    let Some(val) = lobj.pop(direction) else {
        return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
    };
    let is_now_empty = lobj.is_empty();
    shard.update_memory(entry.refresh_size());

    let outcome = if is_now_empty {
        guard.pop(key);
        WriteOutcome::Delete { keys_deleted: 1 }
    } else {
        WriteOutcome::Write { keys_modified: 1 }
    };

    Ok((RespValue::BulkString(val.decoded()), outcome))
}

/// Shared logic for `RPOPLPUSH` and the non-blocking half of `BRPOPLPUSH`:
/// atomically pops the source tail and pushes onto the destination head. The
/// destination's type is verified before the source is touched, and the push
/// half is routed through the blocking registry.
pub(crate) async fn rpoplpush_logic<'a>(
    ctx: &mut ExecutionContext<'a>,
    source: &Bytes,
    destination: &Bytes,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let state = ctx.state.clone();
    let limits = state.list_limits().await;

    {
        let (_, guard) = ctx.guard_for_key(source)?;
        match guard.peek(source) {
            None => return Ok((RespValue::Null, WriteOutcome::DidNotWrite)),
            Some(entry) => {
                if !matches!(entry.data, DataValue::List(_)) {
                    return Err(ZirconError::WrongType);
                }
            }
        }
    }

    // A wrong-typed destination must fail before the source is mutated.
    {
        let (_, guard) = ctx.guard_for_key(destination)?;
        if let Some(entry) = guard.peek(destination)
            && !matches!(entry.data, DataValue::List(_))
        {
            return Err(ZirconError::WrongType);
        }
    }

    let (value, source_deleted) = {
        let (shard, guard) = ctx.guard_for_key(source)?;
        let Some(entry) = guard.get_mut(source) else {
            return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };
        let Some(val) = lobj.pop(PopDirection::Right) else {
            return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
        };
        let is_now_empty = lobj.is_empty();
        shard.update_memory(entry.refresh_size());
        if is_now_empty {
            guard.pop(source);
        }
        (val, is_now_empty)
    };
    let decoded = value.decoded();

    let mut outcome = if source_deleted {
        WriteOutcome::Delete { keys_deleted: 1 }
    } else {
        WriteOutcome::Write { keys_modified: 1 }
    };

    // The push half consults the destination's waiters first; a delivered
    // element never touches the destination list.
    if !state
        .blocker_manager
        .notify_and_consume_for_push(destination, &decoded)
    {
        let (shard, guard) = ctx.guard_for_key(destination)?;
        let entry = guard.get_or_insert_with_mut(destination.clone(), || {
            StoredValue::new(DataValue::List(ListObject::new_packed()))
        });
        let DataValue::List(lobj) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };
        lobj.push(value, PushDirection::Left, &limits);
        shard.update_memory(entry.refresh_size());
        outcome = outcome.merge(WriteOutcome::Write { keys_modified: 1 });
    }

    Ok((RespValue::BulkString(decoded), outcome))
}
