// src/core/commands/set/set_ops_logic.rs

//! Shared logic for the set algebra commands (`SINTER`, `SUNION`, `SDIFF`
//! and their STORE variants).
//!
//! All of these traverse source sets through the literal iterator, so a
//! packed integer source is scanned without materializing a value object per
//! element; only insertion into a hash-encoded accumulator materializes.

use crate::core::commands::command_trait::WriteOutcome;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{Db, ExecutionContext, ExecutionLocks, ShardCache};
use crate::core::storage::set_object::SetObject;
use crate::core::{RespValue, ZirconError};
use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum SetOp {
    Union,
    Diff,
}

/// Resolves a key to its set inside the locks held by the context.
/// `Ok(None)` when the key is absent; `WrongType` when it holds another datatype.
fn set_ref_in_locks<'g>(
    locks: &'g ExecutionLocks<'_>,
    db: &Db,
    key: &Bytes,
) -> Result<Option<&'g SetObject>, ZirconError> {
    let cache: &ShardCache = match locks {
        ExecutionLocks::Single { shard_index, guard } => {
            if *shard_index != db.get_shard_index(key) {
                return Err(ZirconError::LockingError(
                    "Held single-shard lock does not cover the requested key.".into(),
                ));
            }
            guard
        }
        ExecutionLocks::Multi { guards } => guards
            .get(&db.get_shard_index(key))
            .ok_or_else(|| ZirconError::LockingError("Required shard lock missing.".into()))?,
        _ => {
            return Err(ZirconError::LockingError(
                "Set op requires shard locks".into(),
            ));
        }
    };
    match cache.peek(key) {
        None => Ok(None),
        Some(entry) => match &entry.data {
            DataValue::Set(set) => Ok(Some(set)),
            _ => Err(ZirconError::WrongType),
        },
    }
}

/// `SINTER` / `SINTERSTORE` / `SMEMBERS`. Sources are probed smallest-first;
/// a missing source short-circuits to the empty result.
pub(super) async fn sinter_generic(
    ctx: &mut ExecutionContext<'_>,
    keys: &[Bytes],
    dstkey: Option<&Bytes>,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let max_intset = ctx.state.set_max_intset_entries().await;
    let db = ctx.db;

    let mut reply_items: Vec<RespValue> = Vec::new();
    let mut dst_set = dstkey.map(|_| SetObject::new_ints());
    let mut missing_source = false;
    {
        let locks = &ctx.locks;
        let mut sets: Vec<&SetObject> = Vec::with_capacity(keys.len());
        for key in keys {
            match set_ref_in_locks(locks, db, key)? {
                Some(set) => sets.push(set),
                None => {
                    missing_source = true;
                    break;
                }
            }
        }

        if !missing_source {
            // Sort sets from the smallest to largest, this will improve our
            // algorithm's performance.
            sets.sort_by_key(|set| set.len());
            let (smallest, rest) = sets.split_first().expect("at least one source key");

            for ele in smallest.iter() {
                if rest.iter().all(|set| set.contains(&ele)) {
                    match dst_set.as_mut() {
                        Some(dst) => {
                            dst.add(&ele, max_intset);
                        }
                        None => reply_items.push(RespValue::BulkString(ele.decoded())),
                    }
                }
            }
        }
    }

    match dstkey {
        None => Ok((RespValue::Array(reply_items), WriteOutcome::DidNotWrite)),
        Some(dst) => {
            let result = dst_set.unwrap_or_else(SetObject::new_ints);
            store_set_result(ctx, dst, result)
        }
    }
}

/// `SUNION` / `SDIFF` and their STORE variants. The accumulator starts in the
/// integer encoding and promotes as elements demand. For DIFF the loop stops
/// as soon as the running cardinality reaches zero.
pub(super) async fn sunion_diff_generic(
    ctx: &mut ExecutionContext<'_>,
    keys: &[Bytes],
    dstkey: Option<&Bytes>,
    op: SetOp,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let max_intset = ctx.state.set_max_intset_entries().await;
    let db = ctx.db;

    let mut result = SetObject::new_ints();
    {
        let locks = &ctx.locks;
        let sets: Vec<Option<&SetObject>> = keys
            .iter()
            .map(|key| set_ref_in_locks(locks, db, key))
            .collect::<Result<_, _>>()?;

        for (j, set) in sets.iter().enumerate() {
            if op == SetOp::Diff && j == 0 && set.is_none() {
                // The result set is empty when the first source is.
                break;
            }
            // Non existing keys are like empty sets.
            let Some(set) = set else { continue };

            for ele in set.iter() {
                if op == SetOp::Union || j == 0 {
                    result.add(&ele, max_intset);
                } else {
                    result.remove(&ele);
                }
            }

            // Exit when the result set is empty.
            if op == SetOp::Diff && result.is_empty() {
                break;
            }
        }
    }

    match dstkey {
        None => {
            let items = result
                .iter()
                .map(|ele| RespValue::BulkString(ele.decoded()))
                .collect();
            Ok((RespValue::Array(items), WriteOutcome::DidNotWrite))
        }
        Some(dst) => store_set_result(ctx, dst, result),
    }
}

/// Replaces the destination key with the result set; an empty result deletes
/// the destination instead.
pub(super) fn store_set_result(
    ctx: &mut ExecutionContext<'_>,
    dstkey: &Bytes,
    result: SetObject,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let (_, guard) = ctx.guard_for_key(dstkey)?;
    let set_len = result.len();

    if set_len == 0 {
        let existed = guard.pop(dstkey).is_some();
        let outcome = if existed {
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::DidNotWrite
        };
        return Ok((RespValue::Integer(0), outcome));
    }

    guard.put(dstkey.clone(), StoredValue::new(DataValue::Set(result)));

    Ok((
        RespValue::Integer(set_len as i64),
        WriteOutcome::Write { keys_modified: 1 },
    ))
}
