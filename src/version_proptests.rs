use super::*;
use proptest::prelude::*;

/// 正常なバージョンの成分列
fn components_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..10_000, 1..6)
}

fn join(components: &[u64]) -> String {
    components
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    /// 正常な2バージョンの比較は整数タプルの辞書式順序と一致する
    #[test]
    fn prop_ordering_matches_tuple_ordering(
        a in components_strategy(),
        b in components_strategy()
    ) {
        let va = Version::parse(&join(&a));
        let vb = Version::parse(&join(&b));
        prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
    }

    /// パースとDisplayは正常な文字列に対して往復する
    #[test]
    fn prop_display_roundtrip(a in components_strategy()) {
        let text = join(&a);
        prop_assert_eq!(Version::parse(&text).to_string(), text);
    }

    /// 不正な文字列は正常などのバージョンよりも必ず小さい
    #[test]
    fn prop_malformed_below_wellformed(
        a in components_strategy(),
        junk in "[a-z]{1,8}"
    ) {
        prop_assert!(Version::parse(&junk) < Version::parse(&join(&a)));
    }
}
