// tests/integration/set_commands_test.rs

//! Integration tests for the set command family and the set algebra.

use super::test_helpers::{TestContext, bulk, bulk_array};
use bytes::Bytes;
use std::collections::HashSet;
use zircondb::core::events::UnitOfWork;
use zircondb::core::{Command, RespValue, ZirconError};

fn as_set(resp: &RespValue) -> HashSet<Bytes> {
    bulk_array(resp).into_iter().collect()
}

#[tokio::test]
async fn test_sadd_scard_sismember() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.run(&["SADD", "s", "1"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(ctx.run(&["SADD", "s", "2"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(ctx.run(&["SADD", "s", "hello"]).await.unwrap(), RespValue::Integer(1));
    // Duplicates are rejected.
    assert_eq!(ctx.run(&["SADD", "s", "2"]).await.unwrap(), RespValue::Integer(0));

    assert_eq!(ctx.run(&["SCARD", "s"]).await.unwrap(), RespValue::Integer(3));
    assert_eq!(
        ctx.run(&["SISMEMBER", "s", "1"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        ctx.run(&["SISMEMBER", "s", "nope"]).await.unwrap(),
        RespValue::Integer(0)
    );

    let members = ctx.run(&["SMEMBERS", "s"]).await.unwrap();
    assert_eq!(as_set(&members).len(), 3);

    // The non-integer member forced the hash encoding.
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("hashtable")
    );
}

#[tokio::test]
async fn test_integer_string_equivalence_across_encodings() {
    let ctx = TestContext::new().await;

    ctx.run(&["SADD", "s", "42"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("intset")
    );
    assert_eq!(
        ctx.run(&["SISMEMBER", "s", "42"]).await.unwrap(),
        RespValue::Integer(1)
    );

    // Promote, then check the same member is still found.
    ctx.run(&["SADD", "s", "hello"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("hashtable")
    );
    assert_eq!(
        ctx.run(&["SISMEMBER", "s", "42"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        ctx.run(&["SREM", "s", "42"]).await.unwrap(),
        RespValue::Integer(1)
    );
}

#[tokio::test]
async fn test_srem_deletes_emptied_key() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "s", "only"]).await.unwrap();
    assert_eq!(ctx.run(&["SREM", "s", "missing"]).await.unwrap(), RespValue::Integer(0));
    assert_eq!(ctx.run(&["SREM", "s", "only"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(ctx.run(&["EXISTS", "s"]).await.unwrap(), RespValue::Integer(0));
    assert_eq!(ctx.run(&["SREM", "s", "only"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_smove() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "src", "a"]).await.unwrap();
    ctx.run(&["SADD", "src", "b"]).await.unwrap();

    assert_eq!(
        ctx.run(&["SMOVE", "src", "dst", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(ctx.run(&["SISMEMBER", "src", "a"]).await.unwrap(), RespValue::Integer(0));
    assert_eq!(ctx.run(&["SISMEMBER", "dst", "a"]).await.unwrap(), RespValue::Integer(1));

    // Absent member and missing source both reply zero.
    assert_eq!(
        ctx.run(&["SMOVE", "src", "dst", "nope"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(
        ctx.run(&["SMOVE", "ghost", "dst", "a"]).await.unwrap(),
        RespValue::Integer(0)
    );

    // Moving within one key is a membership test.
    assert_eq!(
        ctx.run(&["SMOVE", "src", "src", "b"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        ctx.run(&["SMOVE", "src", "src", "zzz"]).await.unwrap(),
        RespValue::Integer(0)
    );

    // Moving the last element deletes the source key.
    assert_eq!(
        ctx.run(&["SMOVE", "src", "dst", "b"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(ctx.run(&["EXISTS", "src"]).await.unwrap(), RespValue::Integer(0));

    // A wrong-typed destination fails without mutating the source.
    ctx.run(&["RPUSH", "list", "x"]).await.unwrap();
    assert_eq!(
        ctx.run(&["SMOVE", "dst", "list", "a"]).await.unwrap_err(),
        ZirconError::WrongType
    );
    assert_eq!(ctx.run(&["SISMEMBER", "dst", "a"]).await.unwrap(), RespValue::Integer(1));
}

#[tokio::test]
async fn test_spop_removes_and_rewrites_to_srem() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "s", "a"]).await.unwrap();
    ctx.run(&["SADD", "s", "b"]).await.unwrap();

    let mut bus = ctx.state.event_bus.subscribe();

    // SPOP goes through the router here so the propagation rewrite is
    // observable on the bus.
    let mut session = zircondb::connection::SessionState::new();
    let mut router =
        zircondb::core::handler::Router::new(ctx.state.clone(), 1, &mut session);
    let popped = bulk(&router.route(TestContext::command(&["SPOP", "s"])).await.unwrap());
    assert!(popped == Bytes::from("a") || popped == Bytes::from("b"));

    match bus.try_recv().expect("spop should publish a unit of work") {
        UnitOfWork::Command(cmd) => match *cmd {
            Command::Srem(srem) => {
                assert_eq!(srem.key, Bytes::from("s"));
                assert_eq!(srem.member, popped);
            }
            other => panic!("expected SREM on the bus, got {other:?}"),
        },
        other => panic!("expected single command, got {other:?}"),
    }

    assert_eq!(ctx.run(&["SCARD", "s"]).await.unwrap(), RespValue::Integer(1));

    // Popping the last member deletes the key.
    ctx.run(&["SPOP", "s"]).await.unwrap();
    assert_eq!(ctx.run(&["EXISTS", "s"]).await.unwrap(), RespValue::Integer(0));
    assert_eq!(ctx.run(&["SPOP", "s"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_srandmember_does_not_remove() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "s", "x"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["SRANDMEMBER", "s"]).await.unwrap()),
        Bytes::from("x")
    );
    assert_eq!(ctx.run(&["SCARD", "s"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(ctx.run(&["SRANDMEMBER", "ghost"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_sinter() {
    let ctx = TestContext::new().await;
    for v in ["1", "2", "3"] {
        ctx.run(&["SADD", "a", v]).await.unwrap();
    }
    for v in ["2", "3", "4"] {
        ctx.run(&["SADD", "b", v]).await.unwrap();
    }

    let inter = ctx.run(&["SINTER", "a", "b"]).await.unwrap();
    assert_eq!(
        as_set(&inter),
        HashSet::from([Bytes::from("2"), Bytes::from("3")])
    );

    // A missing source short-circuits to the empty result.
    assert_eq!(
        ctx.run(&["SINTER", "a", "ghost"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_sinterstore() {
    let ctx = TestContext::new().await;
    for v in ["1", "2", "3"] {
        ctx.run(&["SADD", "a", v]).await.unwrap();
    }
    for v in ["2", "3", "4"] {
        ctx.run(&["SADD", "b", v]).await.unwrap();
    }

    assert_eq!(
        ctx.run(&["SINTERSTORE", "dst", "a", "b"]).await.unwrap(),
        RespValue::Integer(2)
    );
    let members = ctx.run(&["SMEMBERS", "dst"]).await.unwrap();
    assert_eq!(
        as_set(&members),
        HashSet::from([Bytes::from("2"), Bytes::from("3")])
    );
    // An integer-only result stays in the compact encoding.
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "dst"]).await.unwrap()),
        Bytes::from("intset")
    );

    // An empty intersection deletes the destination.
    assert_eq!(
        ctx.run(&["SINTERSTORE", "dst", "a", "ghost"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(ctx.run(&["EXISTS", "dst"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_sunion_and_sunionstore() {
    let ctx = TestContext::new().await;
    for v in ["1", "2"] {
        ctx.run(&["SADD", "a", v]).await.unwrap();
    }
    for v in ["2", "hello"] {
        ctx.run(&["SADD", "b", v]).await.unwrap();
    }

    let union = ctx.run(&["SUNION", "a", "b", "ghost"]).await.unwrap();
    assert_eq!(
        as_set(&union),
        HashSet::from([Bytes::from("1"), Bytes::from("2"), Bytes::from("hello")])
    );

    assert_eq!(
        ctx.run(&["SUNIONSTORE", "dst", "a", "b"]).await.unwrap(),
        RespValue::Integer(3)
    );
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "dst"]).await.unwrap()),
        Bytes::from("hashtable")
    );
}

#[tokio::test]
async fn test_sdiff() {
    let ctx = TestContext::new().await;
    for v in ["1", "2", "3"] {
        ctx.run(&["SADD", "a", v]).await.unwrap();
    }

    // Missing second operand acts as the empty set.
    let diff = ctx.run(&["SDIFF", "a", "ghost"]).await.unwrap();
    assert_eq!(
        as_set(&diff),
        HashSet::from([Bytes::from("1"), Bytes::from("2"), Bytes::from("3")])
    );

    // Identical sets difference to nothing.
    ctx.run(&["SADD", "b", "1"]).await.unwrap();
    ctx.run(&["SADD", "c", "1"]).await.unwrap();
    assert_eq!(
        ctx.run(&["SDIFF", "b", "c"]).await.unwrap(),
        RespValue::Array(vec![])
    );

    let diff = ctx.run(&["SDIFF", "a", "b"]).await.unwrap();
    assert_eq!(
        as_set(&diff),
        HashSet::from([Bytes::from("2"), Bytes::from("3")])
    );
}

#[tokio::test]
async fn test_sdiffstore_empty_result_deletes_destination() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "a", "1"]).await.unwrap();
    ctx.run(&["SADD", "b", "1"]).await.unwrap();
    ctx.run(&["SADD", "dst", "stale"]).await.unwrap();

    assert_eq!(
        ctx.run(&["SDIFFSTORE", "dst", "a", "b"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(ctx.run(&["EXISTS", "dst"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_set_wrong_type_errors() {
    let ctx = TestContext::new().await;
    ctx.run(&["RPUSH", "list", "x"]).await.unwrap();

    assert_eq!(
        ctx.run(&["SADD", "list", "v"]).await.unwrap_err(),
        ZirconError::WrongType
    );
    assert_eq!(
        ctx.run(&["SINTER", "list"]).await.unwrap_err(),
        ZirconError::WrongType
    );
    assert_eq!(
        ctx.run(&["SDIFF", "list", "ghost"]).await.unwrap_err(),
        ZirconError::WrongType
    );
}
