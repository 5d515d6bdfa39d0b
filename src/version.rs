//! バージョン文字列の解釈と比較
//!
//! 上流マニフェストの version はドット区切り整数列（"1.4.21" など）。
//! 整数タプルとして辞書式に比較する。ゼロ埋めはしない:
//! 共通プレフィックスが等しければ長い方が大きい。

use std::fmt;

/// 解釈済みバージョン
///
/// 不正な文字列（空、非数値成分）はゼロバージョン（空タプル）になり、
/// すべての正常なバージョンより小さく扱われる。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(Vec<u64>);

impl Version {
    /// ドット区切り整数列をパース
    ///
    /// 1成分でも整数として読めなければ全体をゼロバージョンとする。
    pub fn parse(input: &str) -> Self {
        let components: Option<Vec<u64>> = input
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect();

        Self(components.unwrap_or_default())
    }

    /// ゼロバージョン（不正文字列のフォールバック）かどうか
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// 整数成分列
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }

        let joined = self
            .0
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;

#[cfg(test)]
#[path = "version_proptests.rs"]
mod proptests;
