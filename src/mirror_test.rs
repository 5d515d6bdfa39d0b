use super::*;
use crate::index::parse_manifest;
use std::collections::HashMap;

fn entry(pkg: &str, version: &str, apk: &str, base: &str) -> IndexEntry {
    IndexEntry {
        record: ExtensionRecord {
            name: pkg.to_string(),
            pkg: pkg.to_string(),
            version: version.to_string(),
            apk: apk.to_string(),
            extra: serde_json::Map::new(),
        },
        source_name: "anime".to_string(),
        artifact_base: base.to_string(),
    }
}

// =========================================================================
// resolve_download_url tests
// =========================================================================

#[test]
fn test_resolve_absolute_url_used_as_is() {
    assert_eq!(
        resolve_download_url("https://cdn.example.com/hi.apk", "https://base.example.com"),
        "https://cdn.example.com/hi.apk"
    );
    assert_eq!(
        resolve_download_url("http://cdn.example.com/hi.apk", "https://base.example.com"),
        "http://cdn.example.com/hi.apk"
    );
}

#[test]
fn test_resolve_relative_joined_to_base() {
    assert_eq!(
        resolve_download_url("hi.apk", "https://base.example.com/repo"),
        "https://base.example.com/repo/hi.apk"
    );
    // 余計なスラッシュは二重にならない
    assert_eq!(
        resolve_download_url("/hi.apk", "https://base.example.com/repo/"),
        "https://base.example.com/repo/hi.apk"
    );
}

// =========================================================================
// plan_download tests
// =========================================================================

fn oracle_with(pkg: &str, version: &str) -> HashMap<String, String> {
    let mut oracle = HashMap::new();
    oracle.insert(pkg.to_string(), version.to_string());
    oracle
}

#[test]
fn test_plan_reuses_when_version_matches_and_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    std::fs::write(store.path_for("a.b.hi.v2.1.0.apk"), b"bytes").unwrap();

    let entry = entry("a.b.hi", "2.1.0", "hi.apk", "https://base.example.com");
    let action = plan_download(&entry, &oracle_with("a.b.hi", "2.1.0"), &store);
    assert_eq!(action, DownloadAction::Reuse);
}

#[test]
fn test_plan_fetches_when_version_differs() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    std::fs::write(store.path_for("a.b.hi.v2.1.0.apk"), b"bytes").unwrap();

    let entry = entry("a.b.hi", "2.1.0", "hi.apk", "https://base.example.com");
    let action = plan_download(&entry, &oracle_with("a.b.hi", "2.0.0"), &store);
    assert_eq!(
        action,
        DownloadAction::Fetch {
            url: "https://base.example.com/hi.apk".to_string()
        }
    );
}

#[test]
fn test_plan_fetches_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    // オラクルは一致していてもファイルが無ければ取り直す
    let entry = entry("a.b.hi", "2.1.0", "hi.apk", "https://base.example.com");
    let action = plan_download(&entry, &oracle_with("a.b.hi", "2.1.0"), &store);
    assert!(matches!(action, DownloadAction::Fetch { .. }));
}

#[test]
fn test_plan_fetches_unknown_pkg() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    let entry = entry("a.b.hi", "2.1.0", "hi.apk", "https://base.example.com");
    let action = plan_download(&entry, &HashMap::new(), &store);
    assert!(matches!(action, DownloadAction::Fetch { .. }));
}

#[test]
fn test_unchanged_upstream_plans_zero_downloads() {
    // 前回実行の成果（インデックス + ファイル）が揃っていれば
    // 全エントリが再利用になり、ネットワークに出る計画はゼロ
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    let entries = vec![
        entry("a.b.hi", "2.1.0", "hi.apk", "https://base.example.com"),
        entry("c.d.dex", "1.4.21", "dex.apk", "https://base.example.com"),
    ];

    let mut oracle = HashMap::new();
    for e in &entries {
        oracle.insert(e.record.pkg.clone(), e.record.version.clone());
        std::fs::write(store.path_for(&e.record.artifact_filename()), b"bytes").unwrap();
    }

    for e in &entries {
        assert_eq!(plan_download(e, &oracle, &store), DownloadAction::Reuse);
    }
}

// =========================================================================
// end-to-end record flow (ネットワークなしの純粋部分)
// =========================================================================

#[test]
fn test_record_flow_from_manifest_to_published() {
    use crate::config::MirrorConfig;
    use crate::matcher::NameFilter;

    let manifest =
        r#"[{"name":"HiAnime","pkg":"a.b.hi","version":"2.1.0","apk":"hi.apk"}]"#;
    let records = parse_manifest(manifest).unwrap();

    let filter = NameFilter::new(&["hianime".to_string()], &[]);
    assert!(filter.keeps(&records[0].name));

    let mut dedup = ExtensionIndex::new();
    dedup.insert(records[0].clone(), "anime", "https://upstream.example.com/repo");

    let entry = &dedup.entries()[0];
    assert_eq!(entry.record.artifact_filename(), "a.b.hi.v2.1.0.apk");

    // 相対参照はソースのベースへ解決される
    let action = plan_download(entry, &HashMap::new(), &ArtifactStore::new("/nonexistent"));
    assert_eq!(
        action,
        DownloadAction::Fetch {
            url: "https://upstream.example.com/repo/hi.apk".to_string()
        }
    );

    // 公開レコードはミラーURLを指す
    let config = MirrorConfig {
        mirror_base_url: "https://mirror.example.com/apk".to_string(),
        ..MirrorConfig::default()
    };
    let published = entry
        .record
        .published(config.mirror_url(&entry.record.artifact_filename()));
    assert_eq!(
        published.apk,
        "https://mirror.example.com/apk/a.b.hi.v2.1.0.apk"
    );
    assert_eq!(published.name, "HiAnime");
    assert_eq!(published.version, "2.1.0");
}
