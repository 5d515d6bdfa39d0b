//! 拡張レコードと統合インデックス
//!
//! 上流 index.min.json の配列をパースし、pkg をキーに最高バージョン
//! 1件へ重複排除する。前回実行の出力はスキップ判定のオラクルとして
//! 読み戻す。出力はミラーとして再配信できる同一スキーマのJSON配列。

use crate::error::{MirrorError, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// ミラー後は意味を持たない出自フィールド。公開時に落とす
const PROVENANCE_KEY: &str = "repo";

/// 上流マニフェストの1エントリ
///
/// name/pkg/version/apk 以外のフィールドは extra にそのまま通す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtensionRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pkg: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub apk: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtensionRecord {
    /// 解釈済みバージョン（不正文字列はゼロバージョン）
    pub fn parsed_version(&self) -> Version {
        Version::parse(&self.version)
    }

    /// ローカル保存用の正準ファイル名
    pub fn artifact_filename(&self) -> String {
        format!("{}.v{}.apk", self.pkg, self.version)
    }

    /// 公開用レコードへの純粋変換
    ///
    /// apk をミラーURLに書き換え、出自フィールドを落とした
    /// 新しいレコードを返す。取得時表現は変更しない。
    pub fn published(&self, mirror_url: String) -> Self {
        let mut published = self.clone();
        published.apk = mirror_url;
        published.extra.remove(PROVENANCE_KEY);
        published
    }
}

/// マニフェスト本文をレコード配列としてパース
pub fn parse_manifest(content: &str) -> Result<Vec<ExtensionRecord>> {
    serde_json::from_str(content)
        .map_err(|e| MirrorError::InvalidManifest(format!("Failed to parse manifest: {}", e)))
}

/// インデックス登録済みレコードと出自情報
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub record: ExtensionRecord,
    /// 由来ソースのカテゴリラベル（表示用）
    pub source_name: String,
    /// 相対 apk 参照の結合先
    pub artifact_base: String,
}

/// pkg → 最高バージョン1件の統合インデックス
///
/// 不変条件: 任意の時点で pkg ごとに高々1件、その版はそれまでに
/// 観測した同 pkg レコードの最大。初出順を保持する。
#[derive(Debug, Default)]
pub struct ExtensionIndex {
    entries: Vec<IndexEntry>,
    by_pkg: HashMap<String, usize>,
}

impl ExtensionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを登録
    ///
    /// 未登録の pkg は末尾に追加。登録済みの pkg は新しい方が
    /// 厳密に大きい場合のみ置き換える（位置は初出のまま）。
    /// 同バージョンは先勝ち。
    pub fn insert(&mut self, record: ExtensionRecord, source_name: &str, artifact_base: &str) {
        let entry = IndexEntry {
            record,
            source_name: source_name.to_string(),
            artifact_base: artifact_base.to_string(),
        };

        if let Some(&pos) = self.by_pkg.get(&entry.record.pkg) {
            if entry.record.parsed_version() > self.entries[pos].record.parsed_version() {
                self.entries[pos] = entry;
            }
        } else {
            self.by_pkg.insert(entry.record.pkg.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

/// 前回実行の出力インデックスを読み戻す
///
/// 無い・読めない場合は None（初回実行と同じ全件ダウンロードになる）。
pub fn load_local_index(path: &Path) -> Option<Vec<ExtensionRecord>> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// pkg → version文字列 の参照表（スキップ判定用）
pub fn version_oracle(records: &[ExtensionRecord]) -> HashMap<String, String> {
    records
        .iter()
        .map(|record| (record.pkg.clone(), record.version.clone()))
        .collect()
}

/// インデックスをアトミックに書き出す
///
/// 出力先と同じディレクトリの一時ファイルへ全量を書いてから
/// rename する。失敗しても既存ファイルは無傷のまま残る。
pub fn save_index(path: &Path, records: &[ExtensionRecord]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let content = serde_json::to_string_pretty(records)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| MirrorError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
