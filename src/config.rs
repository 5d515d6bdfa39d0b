//! HTTP設定とミラー設定
//!
//! ソースレジストリは不変の設定値としてパイプライン入口に渡す。
//! 組み込みデフォルトを `mirror.toml` で上書きできる。

use crate::error::{MirrorError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// デフォルトの設定ファイル名（カレントディレクトリから探す）
pub const DEFAULT_CONFIG_FILE: &str = "mirror.toml";

/// ブラウザ相当のUser-Agent
///
/// 一部の上流ホストはHTTPクライアント既定の識別子を拒否する。
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト（秒）
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

/// 上流カタログ1件の記述子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// カテゴリラベル（"anime" など、表示用）
    pub name: String,
    /// マニフェスト（JSON配列）のURL
    pub url: String,
    /// 相対 apk 参照の結合先。未指定ならマニフェストURLの親ディレクトリ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// キープ対象キーワード。空なら全件受理
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 拒否キーワード。キーワードより優先
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl SourceConfig {
    /// 相対参照を解決するためのアーティファクトベースURL
    pub fn artifact_base(&self) -> String {
        if let Some(base) = &self.base_url {
            return base.trim_end_matches('/').to_string();
        }

        match self.url.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => self.url.clone(),
        }
    }
}

/// ミラー全体の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// 公開ミラーのベースURL（書き換え後の apk リンクの接頭辞）
    pub mirror_base_url: String,
    /// アーティファクト保存ディレクトリ
    pub output_dir: PathBuf,
    /// 統合マニフェストの出力先
    pub index_file: PathBuf,
    /// 上流ソースレジストリ（レジストリ順に処理される）
    pub sources: Vec<SourceConfig>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            mirror_base_url: "https://raw.githubusercontent.com/Daiya404/Animanga-apps/main/apk"
                .to_string(),
            output_dir: PathBuf::from("apk"),
            index_file: PathBuf::from("index.min.json"),
            sources: vec![
                SourceConfig {
                    name: "anime".to_string(),
                    url: "https://raw.githubusercontent.com/yuzono/anime-repo/repo/index.min.json"
                        .to_string(),
                    base_url: None,
                    keywords: vec![
                        "AllAnime".to_string(),
                        "HiAnime".to_string(),
                        "AnimePahe".to_string(),
                        "AnimeKai".to_string(),
                    ],
                    blacklist: Vec::new(),
                },
                SourceConfig {
                    name: "manga".to_string(),
                    url:
                        "https://raw.githubusercontent.com/keiyoushi/extensions/repo/index.min.json"
                            .to_string(),
                    base_url: None,
                    keywords: vec![
                        "MangaDex".to_string(),
                        "Weeb Central".to_string(),
                        "AllManga".to_string(),
                    ],
                    blacklist: Vec::new(),
                },
                SourceConfig {
                    name: "novel".to_string(),
                    url: "https://raw.githubusercontent.com/dannovels/novel-extensions/repo/index.min.json"
                        .to_string(),
                    base_url: None,
                    // キーワード空 = 全件受理
                    keywords: Vec::new(),
                    blacklist: Vec::new(),
                },
            ],
        }
    }
}

impl MirrorConfig {
    /// 設定をロード
    ///
    /// パス指定があればそのファイルを必須として読む。
    /// なければカレントの mirror.toml、それも無ければ組み込みデフォルト。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// TOMLファイルから設定を読む
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MirrorError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            MirrorError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// 書き換え後の apk リンク（ベースURL + ファイル名）
    pub fn mirror_url(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.mirror_base_url.trim_end_matches('/'),
            filename
        )
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
