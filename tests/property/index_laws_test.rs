// tests/property/index_laws_test.rs

//! Property tests for the signed-index laws of LRANGE/LINDEX/LTRIM/LREM.

use crate::test_helpers::{TestContext, bulk_array};
use bytes::Bytes;
use proptest::prelude::*;
use zircondb::config::Config;
use zircondb::core::RespValue;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn list_context(max_entries: usize, values: &[String]) -> TestContext {
    let mut config = Config::default();
    config.databases = 1;
    config.list_max_ziplist_entries = max_entries;
    let ctx = TestContext::with_config(config).await;
    for v in values {
        ctx.run(&["RPUSH", "k", v]).await.unwrap();
    }
    ctx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lrange_full_returns_the_whole_list(
        values in proptest::collection::vec("[a-z0-9]{0,12}", 0..20),
        max_entries in 1usize..24,
    ) {
        runtime().block_on(async {
            let ctx = list_context(max_entries, &values).await;
            let range = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
            let got = bulk_array(&range);
            let expected: Vec<Bytes> =
                values.iter().map(|v| Bytes::from(v.clone())).collect();
            assert_eq!(got, expected);
        });
    }

    #[test]
    fn lindex_agrees_with_single_element_lrange(
        values in proptest::collection::vec("[a-z0-9]{0,8}", 0..12),
        max_entries in 1usize..24,
    ) {
        runtime().block_on(async {
            let ctx = list_context(max_entries, &values).await;
            let len = values.len() as i64;
            for i in -(len + 2)..=(len + 2) {
                let idx = i.to_string();
                let by_index = ctx.run(&["LINDEX", "k", &idx]).await.unwrap();
                let by_range = ctx.run(&["LRANGE", "k", &idx, &idx]).await.unwrap();
                match by_index {
                    RespValue::Null => assert_eq!(by_range, RespValue::Array(vec![])),
                    RespValue::BulkString(b) => {
                        assert_eq!(bulk_array(&by_range), vec![b]);
                    }
                    other => panic!("unexpected LINDEX reply {other:?}"),
                }
            }
        });
    }

    #[test]
    fn ltrim_full_range_is_a_noop(
        values in proptest::collection::vec("[a-z0-9]{0,8}", 0..16),
        max_entries in 1usize..24,
    ) {
        runtime().block_on(async {
            let ctx = list_context(max_entries, &values).await;
            let before = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
            assert_eq!(ctx.run(&["LTRIM", "k", "0", "-1"]).await.unwrap(), RespValue::ok());
            let after = ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap();
            assert_eq!(before, after);
        });
    }

    #[test]
    fn lrem_directions_remove_from_opposite_ends(
        prefix in proptest::collection::vec("[xy]", 1..12),
        count in 1i64..4,
        max_entries in 1usize..24,
    ) {
        runtime().block_on(async {
            let ctx = list_context(max_entries, &prefix).await;
            for v in &prefix {
                ctx.run(&["RPUSH", "k2", v]).await.unwrap();
            }
            // Promote neither or both; k2 shares the same config.

            let forward = ctx
                .run(&["LREM", "k", &count.to_string(), "x"])
                .await
                .unwrap();
            let backward = ctx
                .run(&["LREM", "k2", &(-count).to_string(), "x"])
                .await
                .unwrap();
            // Equal absolute counts remove equally many elements.
            assert_eq!(forward, backward);

            // Simulate both directions over the original contents.
            let mut expect_forward = prefix.clone();
            let mut removed = 0;
            expect_forward.retain(|v| {
                if v == "x" && removed < count {
                    removed += 1;
                    false
                } else {
                    true
                }
            });
            let mut expect_backward: Vec<String> = prefix.clone();
            let mut removed = 0;
            for i in (0..expect_backward.len()).rev() {
                if expect_backward[i] == "x" && removed < count {
                    expect_backward.remove(i);
                    removed += 1;
                }
            }

            let got_forward = bulk_array(&ctx.run(&["LRANGE", "k", "0", "-1"]).await.unwrap());
            let got_backward = bulk_array(&ctx.run(&["LRANGE", "k2", "0", "-1"]).await.unwrap());
            let expect_forward: Vec<Bytes> =
                expect_forward.into_iter().map(Bytes::from).collect();
            let expect_backward: Vec<Bytes> =
                expect_backward.into_iter().map(Bytes::from).collect();
            assert_eq!(got_forward, expect_forward);
            assert_eq!(got_backward, expect_backward);
        });
    }
}
