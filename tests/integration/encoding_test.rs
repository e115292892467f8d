// tests/integration/encoding_test.rs

//! Tests for the dual-encoding behavior: promotion triggers, one-way
//! conversion, and the invisibility of the encoding in replies.

use super::test_helpers::{TestContext, bulk, bulk_array};
use bytes::Bytes;
use zircondb::config::Config;
use zircondb::core::RespValue;

fn small_list_config() -> Config {
    let mut config = Config::default();
    config.databases = 1;
    config.list_max_ziplist_entries = 3;
    config.list_max_ziplist_value = 8;
    config
}

#[tokio::test]
async fn test_list_promotes_on_entry_count() {
    let ctx = TestContext::with_config(small_list_config()).await;

    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("ziplist")
    );

    assert_eq!(
        ctx.run(&["RPUSH", "k", "d"]).await.unwrap(),
        RespValue::Integer(4)
    );
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );

    // The promotion is invisible in replies.
    let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
    assert_eq!(
        bulk_array(&range),
        vec![
            Bytes::from("a"),
            Bytes::from("b"),
            Bytes::from("c"),
            Bytes::from("d")
        ]
    );
}

#[tokio::test]
async fn test_list_promotes_on_value_length() {
    let ctx = TestContext::with_config(small_list_config()).await;

    ctx.run(&["RPUSH", "k", "short"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("ziplist")
    );
    ctx.run(&["RPUSH", "k", "much-longer-than-the-bound"])
        .await
        .unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );

    // Long integers never force the promotion; only raw strings do.
    ctx.run(&["RPUSH", "nums", "123456789012345"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "nums"]).await.unwrap()),
        Bytes::from("ziplist")
    );
}

#[tokio::test]
async fn test_lset_can_promote() {
    let ctx = TestContext::with_config(small_list_config()).await;
    ctx.run(&["RPUSH", "k", "a"]).await.unwrap();
    ctx.run(&["LSET", "k", "0", "a-very-long-replacement"])
        .await
        .unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );
    assert_eq!(
        bulk(&ctx.run(&["LINDEX", "k", "0"]).await.unwrap()),
        Bytes::from("a-very-long-replacement")
    );
}

#[tokio::test]
async fn test_linsert_can_promote_past_entry_bound() {
    let ctx = TestContext::with_config(small_list_config()).await;
    for v in ["a", "b", "c"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        ctx.run(&["LINSERT", "k", "AFTER", "a", "x"]).await.unwrap(),
        RespValue::Integer(4)
    );
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
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
}

#[tokio::test]
async fn test_list_promotion_is_one_way() {
    let ctx = TestContext::with_config(small_list_config()).await;
    for v in ["a", "b", "c", "d"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );

    // Shrinking below the bound does not demote.
    ctx.run(&["LPOP", "k"]).await.unwrap();
    ctx.run(&["LPOP", "k"]).await.unwrap();
    ctx.run(&["LPOP", "k"]).await.unwrap();
    assert_eq!(ctx.run(&["LLEN", "k"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );
}

#[tokio::test]
async fn test_set_promotes_past_intset_bound() {
    let mut config = Config::default();
    config.databases = 1;
    config.set_max_intset_entries = 3;
    let ctx = TestContext::with_config(config).await;

    for v in ["1", "2", "3"] {
        ctx.run(&["SADD", "s", v]).await.unwrap();
    }
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("intset")
    );
    ctx.run(&["SADD", "s", "4"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("hashtable")
    );

    // One-way: removing members does not demote.
    ctx.run(&["SREM", "s", "4"]).await.unwrap();
    ctx.run(&["SREM", "s", "3"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
        Bytes::from("hashtable")
    );
}

#[tokio::test]
async fn test_encoding_transparency_for_reads() {
    // Same logical content, one container on each side of the threshold.
    let mut config = Config::default();
    config.databases = 1;
    config.list_max_ziplist_entries = 10;
    let ctx = TestContext::with_config(config).await;

    let values = ["5", "b", "7", "b", "e"];
    for v in values {
        ctx.run(&["RPUSH", "packed", v]).await.unwrap();
        ctx.run(&["RPUSH", "linked", v]).await.unwrap();
    }
    // Push the second list over the bound and trim back to the same content.
    for v in ["x1", "x2", "x3", "x4", "x5", "x6"] {
        ctx.run(&["RPUSH", "linked", v]).await.unwrap();
    }
    ctx.run(&["LTRIM", "linked", "0", "4"]).await.unwrap();

    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "packed"]).await.unwrap()),
        Bytes::from("ziplist")
    );
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "linked"]).await.unwrap()),
        Bytes::from("linkedlist")
    );

    for i in -6..=6 {
        let idx = i.to_string();
        assert_eq!(
            ctx.run(&["LINDEX", "packed", &idx]).await.unwrap(),
            ctx.run(&["LINDEX", "linked", &idx]).await.unwrap(),
            "LINDEX diverges at {idx}"
        );
    }
    assert_eq!(
        ctx.run(&["LRANGE", "packed", "0", "-1"]).await.unwrap(),
        ctx.run(&["LRANGE", "linked", "0", "-1"]).await.unwrap()
    );
    assert_eq!(
        ctx.run(&["LREM", "packed", "0", "b"]).await.unwrap(),
        ctx.run(&["LREM", "linked", "0", "b"]).await.unwrap()
    );
    assert_eq!(
        ctx.run(&["LRANGE", "packed", "0", "-1"]).await.unwrap(),
        ctx.run(&["LRANGE", "linked", "0", "-1"]).await.unwrap()
    );
}

#[tokio::test]
async fn test_config_set_applies_to_subsequent_mutations() {
    let ctx = TestContext::new().await;

    // Default bound: stays packed.
    for v in ["a", "b", "c", "d"] {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("ziplist")
    );

    ctx.run(&["CONFIG", "SET", "list_max_ziplist_entries", "2"])
        .await
        .unwrap();

    // Lowering the bound does not retroactively promote...
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("ziplist")
    );
    // ...but the next push consults the new bound.
    ctx.run(&["RPUSH", "k", "e"]).await.unwrap();
    assert_eq!(
        bulk(&ctx.run(&["OBJECT", "ENCODING", "k"]).await.unwrap()),
        Bytes::from("linkedlist")
    );

    let get = ctx
        .run(&["CONFIG", "GET", "list_max_ziplist_entries"])
        .await
        .unwrap();
    assert_eq!(
        bulk_array(&get),
        vec![
            Bytes::from("list_max_ziplist_entries"),
            Bytes::from("2")
        ]
    );
}
