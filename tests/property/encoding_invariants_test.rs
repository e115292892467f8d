// tests/property/encoding_invariants_test.rs

//! Property tests for encoding transparency and promotion monotonicity:
//! every reply must be identical whether a container is currently packed or
//! already promoted, given the same logical content.

use crate::test_helpers::{TestContext, bulk};
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

/// Builds the same list contents twice: `packed` under a generous bound,
/// `linked` under a bound of one so it promotes on the second push.
async fn twin_lists(values: &[String]) -> TestContext {
    let mut config = Config::default();
    config.databases = 1;
    let ctx = TestContext::with_config(config).await;
    for v in values {
        ctx.run(&["RPUSH", "packed", v]).await.unwrap();
    }
    ctx.run(&["CONFIG", "SET", "list_max_ziplist_entries", "1"])
        .await
        .unwrap();
    for v in values {
        ctx.run(&["RPUSH", "linked", v]).await.unwrap();
    }
    ctx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn list_replies_are_encoding_independent(
        values in proptest::collection::vec("([a-z]{1,6}|[0-9]{1,4})", 2..12),
    ) {
        runtime().block_on(async {
            let ctx = twin_lists(&values).await;

            if values.len() > 1 {
                assert_eq!(
                    bulk(&ctx.run(&["OBJECT", "ENCODING", "packed"]).await.unwrap()),
                    Bytes::from("ziplist")
                );
                assert_eq!(
                    bulk(&ctx.run(&["OBJECT", "ENCODING", "linked"]).await.unwrap()),
                    Bytes::from("linkedlist")
                );
            }

            assert_eq!(
                ctx.run(&["LLEN", "packed"]).await.unwrap(),
                ctx.run(&["LLEN", "linked"]).await.unwrap()
            );
            assert_eq!(
                ctx.run(&["LRANGE", "packed", "0", "-1"]).await.unwrap(),
                ctx.run(&["LRANGE", "linked", "0", "-1"]).await.unwrap()
            );
            let len = values.len() as i64;
            for i in -len..len {
                let idx = i.to_string();
                assert_eq!(
                    ctx.run(&["LINDEX", "packed", &idx]).await.unwrap(),
                    ctx.run(&["LINDEX", "linked", &idx]).await.unwrap()
                );
            }

            // Draining from both ends yields the same element sequence.
            loop {
                let a = ctx.run(&["LPOP", "packed"]).await.unwrap();
                let b = ctx.run(&["LPOP", "linked"]).await.unwrap();
                assert_eq!(a, b);
                if a == RespValue::Null {
                    break;
                }
                let a = ctx.run(&["RPOP", "packed"]).await.unwrap();
                let b = ctx.run(&["RPOP", "linked"]).await.unwrap();
                assert_eq!(a, b);
                if a == RespValue::Null {
                    break;
                }
            }
        });
    }

    #[test]
    fn set_membership_is_encoding_independent(
        members in proptest::collection::hash_set("([0-9]{1,4}|[a-z]{1,5})", 1..16),
        probes in proptest::collection::vec("([0-9]{1,4}|[a-z]{1,5})", 1..16),
    ) {
        runtime().block_on(async {
            let mut config = Config::default();
            config.databases = 1;
            let ctx = TestContext::with_config(config).await;

            for m in &members {
                ctx.run(&["SADD", "roomy", m]).await.unwrap();
            }
            ctx.run(&["CONFIG", "SET", "set_max_intset_entries", "1"])
                .await
                .unwrap();
            for m in &members {
                ctx.run(&["SADD", "tight", m]).await.unwrap();
            }

            assert_eq!(
                ctx.run(&["SCARD", "roomy"]).await.unwrap(),
                ctx.run(&["SCARD", "tight"]).await.unwrap()
            );
            for probe in members.iter().chain(probes.iter()) {
                assert_eq!(
                    ctx.run(&["SISMEMBER", "roomy", probe]).await.unwrap(),
                    ctx.run(&["SISMEMBER", "tight", probe]).await.unwrap(),
                    "membership diverges for {probe:?}"
                );
            }

            // Intersecting the twins reproduces the full cardinality.
            let inter = ctx.run(&["SINTER", "roomy", "tight"]).await.unwrap();
            let RespValue::Array(items) = inter else {
                panic!("expected array");
            };
            assert_eq!(items.len(), members.len());
        });
    }

    #[test]
    fn promotion_is_monotonic(
        members in proptest::collection::hash_set("[0-9]{1,4}", 2..12),
    ) {
        runtime().block_on(async {
            let mut config = Config::default();
            config.databases = 1;
            config.set_max_intset_entries = 1;
            let ctx = TestContext::with_config(config).await;

            for m in &members {
                ctx.run(&["SADD", "s", m]).await.unwrap();
            }
            assert_eq!(
                bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
                Bytes::from("hashtable")
            );

            // Shrink below every bound: the encoding must not revert.
            let keep = members.iter().next().unwrap();
            for m in &members {
                if m != keep {
                    ctx.run(&["SREM", "s", m]).await.unwrap();
                }
            }
            assert_eq!(
                ctx.run(&["SCARD", "s"]).await.unwrap(),
                RespValue::Integer(1)
            );
            assert_eq!(
                bulk(&ctx.run(&["OBJECT", "ENCODING", "s"]).await.unwrap()),
                Bytes::from("hashtable")
            );
        });
    }
}
