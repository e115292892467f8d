// tests/integration/list_commands_test.rs

//! Integration tests for the list command family.

use super::test_helpers::{TestContext, bulk, bulk_array};
use bytes::Bytes;
use zircondb::core::{RespValue, ZirconError};

#[tokio::test]
async fn test_push_range_index_len() {
    let ctx = TestContext::new().await;

    assert_eq!(
        ctx.run(&["RPUSH", "k", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        ctx.run(&["RPUSH", "k", "b"]).await.unwrap(),
        RespValue::Integer(2)
    );

    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&range), vec![Bytes::from("a"), Bytes::from("b")]);

    assert_eq!(
        ctx.run(&["LPUSH", "k", "z"]).await.unwrap(),
        RespValue::Integer(3)
    );
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "0"]).await.unwrap()),
        Bytes::from("z")
    );
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "-1"]).await.unwrap()),
        Bytes::from("b")
    );
    assert_eq!(
        ctx.run(&["LLEN", "k"]).await.unwrap(),
        RespValue::Integer(3)
    );
}

#[tokio::test]
async fn test_llen_missing_and_wrong_type() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.run(&["LLEN", "nope"]).await.unwrap(),
        RespValue::Integer(0)
    );

    ctx.run(&["SADD", "s", "x"]).await.unwrap();
    assert_eq!(
        ctx.run(&["LLEN", "s"]).await.unwrap_err(),
        ZirconError::WrongType
    );
}

#[tokio::test]
async fn test_pushx_requires_existing_list() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.run(&["LPUSHX", "k", "v"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(
        ctx.run(&["RPUSHX", "k", "v"]).await.unwrap(),
        RespValue::Integer(0)
    );

    ctx.run(&["RPUSH", "k", "a"]).await.unwrap();
    assert_eq!(
        ctx.run(&["RPUSHX", "k", "b"]).await.unwrap(),
        RespValue::Integer(2)
    );
    assert_eq!(
        ctx.run(&["LPUSHX", "k", "z"]).await.unwrap(),
        RespValue::Integer(3)
    );
}

#[tokio::test]
async fn test_linsert_before_and_after() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }

    assert_eq!(
        ctx.run(&["LINSERT", "k", "BEFORE", "b", "x"]).await.unwrap(),
        RespValue::Integer(4)
    );
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![
            Bytes::from("a"),
            Bytes::from("x"),
            Bytes::from("b"),
            Bytes::from("c")
        ]
    );

    // A missing pivot leaves the list unchanged.
    assert_eq!(
        ctx.run(&["LINSERT", "k", "AFTER", "nonexistent", "y"])
            .await
            .unwrap(),
        RespValue::Integer(-1)
    );
    assert_eq!(
        ctx.run(&["LLEN", "k"]).await.unwrap(),
        RespValue::Integer(4)
    );

    assert_eq!(
        ctx.run(&["LINSERT", "k", "AFTER", "c", "tail"]).await.unwrap(),
        RespValue::Integer(5)
    );
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "-1"]).await.unwrap()),
        Bytes::from("tail")
    );

    // Missing key replies zero.
    assert_eq!(
        ctx.run(&["LINSERT", "missing", "BEFORE", "a", "b"])
            .await
            .unwrap(),
        RespValue::Integer(0)
    );

    // Anything but BEFORE/AFTER is a syntax error.
    assert_eq!(
        ctx.run(&["LINSERT", "k", "SIDEWAYS", "a", "b"])
            .await
            .unwrap_err(),
        ZirconError::SyntaxError
    );
}

#[tokio::test]
async fn test_lset_and_lindex_bounds() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }

    assert_eq!(ctx.run(&["LSET", "k", "1", "B"]).await.unwrap(), RespValue::ok());
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "1"]).await.unwrap()),
        Bytes::from("B")
    );
    assert_eq!(ctx.run(&["LSET", "k", "-1", "C"]).await.unwrap(), RespValue::ok());
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "2"]).await.unwrap()),
        Bytes::from("C")
    );

    assert_eq!(
        ctx.run(&["LSET", "k", "3", "x"]).await.unwrap_err(),
        ZirconError::IndexOutOfRange
    );
    assert_eq!(
        ctx.run(&["LSET", "missing", "0", "x"]).await.unwrap_err(),
        ZirconError::KeyNotFound
    );
    assert_eq!(
        ctx.run(&["LINDEX", "k", "99"]).await.unwrap(),
        RespValue::Null
    );
}

#[tokio::test]
async fn test_lrange_clamping() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }

    // End past the tail clamps.
    let range = ctx.run(&["LRANGE", "k", "1", "99"]).await.unwrap();
    assert_eq!(bulk_array(&range), vec![Bytes::from("b"), Bytes::from("c")]);

    // start > end and start >= len are both empty.
    assert_eq!(
        ctx.run(&["LRANGE", "k", "2", "1"]).await.unwrap(),
        RespValue::Array(vec![])
    );
    assert_eq!(
        ctx.run(&["LRANGE", "k", "3", "5"]).await.unwrap(),
        RespValue::Array(vec![])
    );

    // Negative start clamps to the head.
    let range = ctx.run(&["LRANGE", "k", "-99", "0"]).await.unwrap();
    assert_eq!(bulk_array(&range), vec![Bytes::from("a")]);

    // A missing key is an empty reply.
    assert_eq!(
        ctx.run(&["LRANGE", "missing", "0", "-1"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_ltrim_laws() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c", "d", "e"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }

    // LTRIM 0 -1 is a no-op.
    assert_eq!(ctx.run(&["LTRIM", "k", "0", "-1"]).await.unwrap(), RespValue::ok());
    assert_eq!(ctx.run(&["LLEN", "k"]).await.unwrap(), RespValue::Integer(5));

    assert_eq!(ctx.run(&["LTRIM", "k", "1", "-2"]).await.unwrap(), RespValue::ok());
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![Bytes::from("b"), Bytes::from("c"), Bytes::from("d")]
    );

    // Trimming to an empty range deletes the key.
    assert_eq!(ctx.run(&["LTRIM", "k", "5", "10"]).await.unwrap(), RespValue::ok());
    assert_eq!(ctx.run(&["EXISTS", "k"]).await.unwrap(), RespValue::Integer(0));

    // A missing key still replies OK.
    assert_eq!(
        ctx.run(&["LTRIM", "missing", "0", "-1"]).await.unwrap(),
        RespValue::ok()
    );
}

#[tokio::test]
async fn test_lrem_directions() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "a", "c", "a"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }

    // Positive count removes from the head side.
    assert_eq!(
        ctx.run(&["LREM", "k", "1", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![
            Bytes::from("b"),
            Bytes::from("a"),
            Bytes::from("c"),
            Bytes::from("a")
        ]
    );

    // Negative count removes from the tail side.
    assert_eq!(
        ctx.run(&["LREM", "k", "-1", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![Bytes::from("b"), Bytes::from("a"), Bytes::from("c")]
    );

    // Zero removes every occurrence and deletes the key when emptied.
    assert_eq!(
        ctx.run(&["LREM", "k", "0", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    ctx.run(&["LREM", "k", "0", "b"]).await.unwrap();
    ctx.run(&["LREM", "k", "0", "c"]).await.unwrap();
    assert_eq!(ctx.run(&["EXISTS", "k"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_lrem_matches_integer_encoded_elements() {
    let ctx = TestContext::new().await;
    for v in ["42", "x", "42"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        ctx.run(&["LREM", "k", "0", "42"]).await.unwrap(),
        RespValue::Integer(2)
    );
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&range), vec![Bytes::from("x")]);
}

#[tokio::test]
async fn test_pop_deletes_emptied_key() {
    let ctx = TestContext::new().await;
    ctx.run(&["RPUSH", "k", "only"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["LPOP", "k"]).await.unwrap()),
        Bytes::from("only")
    );
    assert_eq!(ctx.run(&["EXISTS", "k"]).await.unwrap(), RespValue::Integer(0));
    assert_eq!(ctx.run(&["LPOP", "k"]).await.unwrap(), RespValue::Null);
    assert_eq!(ctx.run(&["RPOP", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_rpoplpush_moves_tail_to_head() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "src", v]).await.unwrap();
    }
    ctx.run(&["RPUSH", "dst", "x"]).await.unwrap();

    assert_eq!(
        bulk(&ctx.run(&["RPOPLPUSH", "src", "dst"]).await.unwrap()),
        Bytes::from("c")
    );
    let src = ctx.run(&["LRANGE", "src", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&src), vec![Bytes::from("a"), Bytes::from("b")]);
    let dst = ctx.run(&["LRANGE", "dst", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&dst), vec![Bytes::from("c"), Bytes::from("x")]);

    // A missing source is a nil reply.
    assert_eq!(
        ctx.run(&["RPOPLPUSH", "missing", "dst"]).await.unwrap(),
        RespValue::Null
    );
}

#[tokio::test]
async fn test_rpoplpush_wrong_typed_destination_leaves_source_intact() {
    let ctx = TestContext::new().await;
    for v in ["a", "b"] {
        ctx.run(&["RPUSH", "src", v]).await.unwrap();
    }
    ctx.run(&["SADD", "dst", "member"]).await.unwrap();

    assert_eq!(
        ctx.run(&["RPOPLPUSH", "src", "dst"]).await.unwrap_err(),
        ZirconError::WrongType
    );
    let src = ctx.run(&["LRANGE", "src", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&src), vec![Bytes::from("a"), Bytes::from("b")]);
}

#[tokio::test]
async fn test_rpoplpush_rotates_single_list() {
    let ctx = TestContext::new().await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        bulk(&ctx.run(&["RPOPLPUSH", "k", "k"]).await.unwrap()),
        Bytes::from("c")
    );
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![Bytes::from("c"), Bytes::from("a"), Bytes::from("b")]
    );
}
