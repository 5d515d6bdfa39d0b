//! ミラーパイプライン本体
//!
//! レジストリ → 取得 → フィルター → 重複排除 → ダウンロード →
//! インデックス書き出し → 不要ファイル削除 を逐次1パスで実行する。
//! ソース単位・レコード単位の失敗はその場で回収し、実行全体は止めない。

use crate::config::{HttpConfig, MirrorConfig};
use crate::error::Result;
use crate::http;
use crate::index::{self, ExtensionIndex, ExtensionRecord, IndexEntry};
use crate::matcher::NameFilter;
use crate::store::ArtifactStore;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::collections::{HashMap, HashSet};

/// マニフェスト取得・ダウンロード共通のリトライ上限
const MAX_RETRIES: u32 = 3;

/// ソース1件の処理結果
#[derive(Debug)]
pub struct SourceOutcome {
    pub name: String,
    /// マニフェストに含まれていたエントリ数
    pub fetched: usize,
    /// フィルターを通過して登録した数
    pub kept: usize,
    /// ソースごとスキップした場合の理由
    pub skipped: Option<String>,
}

/// 最終インデックスから外れたレコード
#[derive(Debug)]
pub struct DroppedRecord {
    pub pkg: String,
    pub reason: String,
}

/// 1回の実行レポート
#[derive(Debug)]
pub struct MirrorReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceOutcome>,
    pub downloaded: usize,
    pub reused: usize,
    /// dry-run でダウンロード対象と判定された数
    pub planned: usize,
    pub dropped: Vec<DroppedRecord>,
    pub reaped: Vec<String>,
    /// 書き出したレコード数
    pub published: usize,
    pub dry_run: bool,
}

/// 1エントリのダウンロード計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    /// 前回と同一バージョンでファイルも実在するため再利用
    Reuse,
    /// ネットワークから取得
    Fetch { url: String },
}

/// ダウンロード要否を決める
///
/// 前回インデックスのバージョン文字列が一致し、かつローカルに
/// ファイルが実在する場合のみ再利用。比較はバージョンのみで
/// 内容ハッシュは見ない（同一バージョンでの再公開は検出されない）。
pub fn plan_download(
    entry: &IndexEntry,
    oracle: &HashMap<String, String>,
    store: &ArtifactStore,
) -> DownloadAction {
    let filename = entry.record.artifact_filename();

    if oracle.get(&entry.record.pkg) == Some(&entry.record.version) && store.contains(&filename) {
        return DownloadAction::Reuse;
    }

    DownloadAction::Fetch {
        url: resolve_download_url(&entry.record.apk, &entry.artifact_base),
    }
}

/// apk 参照を最終ダウンロードURLへ解決
///
/// HTTPスキームで始まれば絶対URLとしてそのまま使い、
/// それ以外はソースのアーティファクトベースURLへ結合する。
pub fn resolve_download_url(apk: &str, base: &str) -> String {
    if apk.starts_with("http://") || apk.starts_with("https://") {
        return apk.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        apk.trim_start_matches('/')
    )
}

/// URLの最終パスセグメント（= ローカルファイル名）
fn final_path_segment(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .map(|segment| segment.to_string())
        .filter(|segment| !segment.is_empty())
}

/// ミラーパイプラインを実行する
///
/// dry_run ではダウンロード・インデックス書き出し・削除を行わず、
/// 取得と計画だけを実施する。
pub async fn run(config: &MirrorConfig, dry_run: bool) -> Result<MirrorReport> {
    let started_at = Utc::now();
    let client = HttpConfig::default().build_client();
    let store = ArtifactStore::new(&config.output_dir);

    // フェーズ1: 取得 + フィルター + 重複排除
    let mut dedup = ExtensionIndex::new();
    let mut sources = Vec::new();

    for source in &config.sources {
        println!("Fetching {} extensions...", source.name.cyan());

        let content =
            match http::with_retry(|| http::get_text(&client, &source.url), MAX_RETRIES).await {
                Ok(content) => content,
                Err(error) => {
                    eprintln!(
                        "{} Skipping source '{}': {}",
                        "✗".red(),
                        source.name,
                        error
                    );
                    sources.push(SourceOutcome {
                        name: source.name.clone(),
                        fetched: 0,
                        kept: 0,
                        skipped: Some(error.to_string()),
                    });
                    continue;
                }
            };

        let records = match index::parse_manifest(&content) {
            Ok(records) => records,
            Err(error) => {
                eprintln!(
                    "{} Skipping source '{}': {}",
                    "✗".red(),
                    source.name,
                    error
                );
                sources.push(SourceOutcome {
                    name: source.name.clone(),
                    fetched: 0,
                    kept: 0,
                    skipped: Some(error.to_string()),
                });
                continue;
            }
        };

        let filter = NameFilter::new(&source.keywords, &source.blacklist);
        let artifact_base = source.artifact_base();
        let fetched = records.len();
        let mut kept = 0;

        for record in records {
            // pkg が無いエントリはキーにもファイル名にもできない
            if record.pkg.is_empty() {
                continue;
            }

            if !filter.keeps(&record.name) {
                continue;
            }

            println!("  Found target: {} ({})", record.name, record.pkg);

            if record.parsed_version().is_zero() {
                // ゼロバージョン扱い: 重複排除で同 pkg の正常版には必ず負ける
                eprintln!(
                    "  Warning: malformed version '{}' for {}",
                    record.version, record.pkg
                );
            }

            kept += 1;
            dedup.insert(record, &source.name, &artifact_base);
        }

        sources.push(SourceOutcome {
            name: source.name.clone(),
            fetched,
            kept,
            skipped: None,
        });
    }

    if dedup.is_empty() {
        println!("No extensions matched; nothing to download.");
    } else {
        println!("Collected {} unique extension(s)", dedup.len());
    }

    // フェーズ2: 前回インデックスをスキップ判定のオラクルとして読み戻す
    let oracle = index::load_local_index(&config.index_file)
        .map(|records| index::version_oracle(&records))
        .unwrap_or_default();

    // フェーズ3: ダウンロード（逐次、1件完了ごとに次へ）
    if !dry_run {
        store.ensure_dir()?;
    }

    let mut published_records: Vec<ExtensionRecord> = Vec::new();
    let mut downloaded = 0;
    let mut reused = 0;
    let mut planned = 0;
    let mut dropped = Vec::new();

    for entry in dedup.entries() {
        let filename = entry.record.artifact_filename();

        match plan_download(entry, &oracle, &store) {
            DownloadAction::Reuse => {
                println!("  Up to date: {} ({})", entry.record.name, entry.record.version);
                reused += 1;
                published_records.push(entry.record.published(config.mirror_url(&filename)));
            }
            DownloadAction::Fetch { url } => {
                if dry_run {
                    println!("  Would download: {} -> {}", entry.record.pkg, filename);
                    planned += 1;
                    continue;
                }

                println!(
                    "  Downloading {} ({})...",
                    entry.record.name, entry.record.version
                );

                let dest = store.path_for(&filename);
                match http::with_retry(
                    || http::download_to_file(&client, &url, &dest),
                    MAX_RETRIES,
                )
                .await
                {
                    Ok(_) => {
                        downloaded += 1;
                        published_records.push(entry.record.published(config.mirror_url(&filename)));
                    }
                    Err(error) => {
                        // ダングリング参照を残さないため、このレコードごと落とす
                        eprintln!(
                            "{} Dropping {} (from {}): {}",
                            "✗".red(),
                            entry.record.pkg,
                            entry.source_name,
                            error
                        );
                        dropped.push(DroppedRecord {
                            pkg: entry.record.pkg.clone(),
                            reason: error.to_string(),
                        });
                    }
                }
            }
        }
    }

    // フェーズ4+5: 書き出し成功後にのみ不要ファイルを削除する
    let mut reaped = Vec::new();
    if !dry_run {
        index::save_index(&config.index_file, &published_records)?;

        let referenced: HashSet<String> = published_records
            .iter()
            .filter_map(|record| final_path_segment(&record.apk))
            .collect();
        reaped = store.reap_stale(&referenced)?;
    }

    Ok(MirrorReport {
        started_at,
        finished_at: Utc::now(),
        sources,
        downloaded,
        reused,
        planned,
        dropped,
        reaped,
        published: published_records.len(),
        dry_run,
    })
}

#[cfg(test)]
#[path = "mirror_test.rs"]
mod tests;
