// tests/integration/transaction_test.rs

//! Integration tests for MULTI/EXEC/DISCARD queueing through the router.

use super::test_helpers::{TestContext, bulk_array};
use bytes::Bytes;
use zircondb::connection::SessionState;
use zircondb::core::handler::Router;
use zircondb::core::{RespValue, ZirconError};

#[tokio::test]
async fn test_multi_queues_and_exec_applies() {
    let ctx = TestContext::new().await;
    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    assert_eq!(
        router.route(TestContext::command(&["MULTI"])).await.unwrap(),
        RespValue::ok()
    );
    assert_eq!(
        router
            .route(TestContext::command(&["RPUSH", "k", "a"]))
            .await
            .unwrap(),
        RespValue::SimpleString("QUEUED".to_string())
    );
    assert_eq!(
        router
            .route(TestContext::command(&["RPUSH", "k", "b"]))
            .await
            .unwrap(),
        RespValue::SimpleString("QUEUED".to_string())
    );

    let replies = router.route(TestContext::command(&["EXEC"])).await.unwrap();
    assert_eq!(
        replies,
        RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(2)])
    );

    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(bulk_array(&range), vec![Bytes::from("a"), Bytes::from("b")]);
}

#[tokio::test]
async fn test_discard_drops_queued_commands() {
    let ctx = TestContext::new().await;
    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    router.route(TestContext::command(&["MULTI"])).await.unwrap();
    router
        .route(TestContext::command(&["RPUSH", "k", "a"]))
        .await
        .unwrap();
    assert_eq!(
        router.route(TestContext::command(&["DISCARD"])).await.unwrap(),
        RespValue::ok()
    );

    assert_eq!(ctx.run(&["EXISTS", "k"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_exec_and_discard_require_multi() {
    let ctx = TestContext::new().await;
    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    assert!(matches!(
        router.route(TestContext::command(&["EXEC"])).await.unwrap_err(),
        ZirconError::InvalidState(_)
    ));
    assert!(matches!(
        router
            .route(TestContext::command(&["DISCARD"]))
            .await
            .unwrap_err(),
        ZirconError::InvalidState(_)
    ));
}

#[tokio::test]
async fn test_nested_multi_is_rejected() {
    let ctx = TestContext::new().await;
    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    router.route(TestContext::command(&["MULTI"])).await.unwrap();
    assert!(matches!(
        router.route(TestContext::command(&["MULTI"])).await.unwrap_err(),
        ZirconError::InvalidState(_)
    ));
}

#[tokio::test]
async fn test_blocking_pop_inside_exec_returns_nil() {
    let ctx = TestContext::new().await;
    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    router.route(TestContext::command(&["MULTI"])).await.unwrap();
    router
        .route(TestContext::command(&["BLPOP", "empty", "0"]))
        .await
        .unwrap();
    let replies = router.route(TestContext::command(&["EXEC"])).await.unwrap();
    assert_eq!(replies, RespValue::Array(vec![RespValue::NullArray]));
}

#[tokio::test]
async fn test_errors_inside_exec_are_reported_per_command() {
    let ctx = TestContext::new().await;
    ctx.run(&["SADD", "s", "x"]).await.unwrap();

    let mut session = SessionState::new();
    let mut router = Router::new(ctx.state.clone(), 1, &mut session);

    router.route(TestContext::command(&["MULTI"])).await.unwrap();
    router
        .route(TestContext::command(&["LLEN", "s"]))
        .await
        .unwrap();
    router
        .route(TestContext::command(&["RPUSH", "k", "a"]))
        .await
        .unwrap();
    let replies = router.route(TestContext::command(&["EXEC"])).await.unwrap();

    let RespValue::Array(items) = replies else {
        panic!("expected array of per-command replies");
    };
    assert!(matches!(items[0], RespValue::Error(_)));
    assert_eq!(items[1], RespValue::Integer(1));
}
