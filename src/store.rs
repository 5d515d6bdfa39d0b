//! ローカルアーティファクト保存域
//!
//! フラットな1ディレクトリに `<pkg>.v<version>.apk` を保持する。
//! ディレクトリは実行をまたいで維持し、インデックス書き出し成功後に
//! 参照の切れたファイルだけを個別に削除する。

use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// アーティファクトディレクトリの操作
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 保存先ディレクトリを用意する
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// ファイル名から保存パスを引く
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// 既にローカルに存在するか（スキップ判定用）
    pub fn contains(&self, filename: &str) -> bool {
        self.path_for(filename).is_file()
    }

    /// 参照されなくなったファイルを削除する
    ///
    /// referenced に無い名前のファイルをすべて消し、削除した
    /// ファイル名を返す。referenced にある名前には触れない。
    pub fn reap_stale(&self, referenced: &HashSet<String>) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut reaped = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if referenced.contains(&filename) {
                continue;
            }

            std::fs::remove_file(entry.path())?;
            reaped.push(filename);
        }

        reaped.sort();
        Ok(reaped)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
