//! 共通HTTPヘルパー
//!
//! マニフェスト取得とアーティファクトダウンロードの実体。
//! リトライは with_retry に一本化し、上限は呼び出し側が渡す。

use crate::error::{MirrorError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// リトライ初回の待ち時間（試行ごとに倍）
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// リトライ可能なエラーかどうか
///
/// MirrorError::is_retryable に加えて 429 と rate limit 由来の 403 を拾う。
pub fn is_retriable_error(error: &MirrorError) -> bool {
    if let MirrorError::Upstream {
        status, message, ..
    } = error
    {
        return match status {
            429 => true,
            403 if message.to_lowercase().contains("rate limit") => true,
            _ => error.is_retryable(),
        };
    }

    error.is_retryable()
}

/// 指数バックオフ付きリトライ
///
/// 初回 + 最大 max_retries 回まで試行する。
/// リトライ不可のエラーは即座に返す。
pub async fn with_retry<F, Fut, T>(mut operation: F, max_retries: u32) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_retries || !is_retriable_error(&error) {
                    return Err(error);
                }

                attempt += 1;
                eprintln!(
                    "  Retry {}/{} in {}s: {}",
                    attempt,
                    max_retries,
                    backoff.as_secs(),
                    error
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }
    }
}

/// URLからテキストを取得（マニフェスト用）
pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let response = check_status(response, url).await?;
    Ok(response.text().await?)
}

/// 非2xxレスポンスを Upstream エラーへ変換
async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status().as_u16();

    if !response.status().is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(MirrorError::Upstream {
            url: url.to_string(),
            status,
            message,
        });
    }

    Ok(response)
}

/// URLからファイルへプログレスバー付きストリームダウンロード
///
/// 一時ファイル（.part）へ書き切ってからリネームするので、
/// 途中失敗で壊れたファイルが残らない。戻り値はダウンロードしたバイト数。
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let response = client.get(url).send().await?;
    let response = check_status(response, url).await?;

    let temp_path = PathBuf::from(format!("{}.part", dest.display()));

    match stream_to_temp(response, &temp_path).await {
        Ok(bytes) => {
            std::fs::rename(&temp_path, dest).map_err(|e| {
                let _ = std::fs::remove_file(&temp_path);
                MirrorError::Io(e)
            })?;
            Ok(bytes)
        }
        Err(error) => {
            let _ = std::fs::remove_file(&temp_path);
            Err(error)
        }
    }
}

async fn stream_to_temp(mut response: Response, temp_path: &Path) -> Result<u64> {
    let total_size = response.content_length().unwrap_or(0);

    let pb = if total_size > 0 {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} Downloading...")
                .unwrap(),
        );
        pb
    };

    let mut file = std::fs::File::create(temp_path)?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    pb.finish_and_clear();

    Ok(downloaded)
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
