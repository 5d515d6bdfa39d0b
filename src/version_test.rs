use super::*;

#[test]
fn test_parse_simple() {
    let v = Version::parse("1.4.21");
    assert_eq!(v.components(), &[1, 4, 21]);
    assert!(!v.is_zero());
}

#[test]
fn test_parse_single_component() {
    assert_eq!(Version::parse("7").components(), &[7]);
}

#[test]
fn test_parse_malformed_is_zero() {
    assert!(Version::parse("abc").is_zero());
    assert!(Version::parse("").is_zero());
    assert!(Version::parse("1.x.2").is_zero());
    assert!(Version::parse("1..2").is_zero());
    assert!(Version::parse("1.2 ").is_zero());
}

#[test]
fn test_numeric_ordering_not_string_ordering() {
    // 文字列比較なら "1.10.0" < "1.9.9" になってしまう
    assert!(Version::parse("1.10.0") > Version::parse("1.9.9"));
    assert!(Version::parse("2.0.0") > Version::parse("1.99.99"));
}

#[test]
fn test_prefix_then_length_ordering() {
    // ゼロ埋めなし: 共通プレフィックスが等しければ長い方が大きい
    assert!(Version::parse("1.2") < Version::parse("1.2.0"));
    assert!(Version::parse("1.2.1") > Version::parse("1.2"));
    assert!(Version::parse("1.3") > Version::parse("1.2.99"));
}

#[test]
fn test_malformed_below_everything_wellformed() {
    assert!(Version::parse("abc") < Version::parse("0"));
    assert!(Version::parse("") < Version::parse("0.0.1"));
    assert_eq!(Version::parse("abc"), Version::parse(""));
}

#[test]
fn test_equal_versions() {
    assert_eq!(Version::parse("1.2.3"), Version::parse("1.2.3"));
}

#[test]
fn test_display() {
    assert_eq!(Version::parse("1.4.21").to_string(), "1.4.21");
    assert_eq!(Version::parse("garbage").to_string(), "0");
}
