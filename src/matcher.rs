//! 表示名の正規化とキープ/リジェクト判定
//!
//! ソースごとのキーワード・ブラックリストを正規化済み部分文字列として
//! 照合する。完全一致ではないため、無関係な名前にキーワードが含まれて
//! しまう誤検出はポリシー上許容する。

/// 表示名を正規化する
///
/// ASCII英数字以外をすべて取り除き、残りを小文字化する。
/// 冪等: 正規化済み文字列を再度正規化しても変化しない。
/// 例: "Weeb Central" → "weebcentral"
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// 名前フィルター
///
/// 判定順序:
/// 1. ブラックリストにかかれば拒否（ホワイトリストより優先）
/// 2. キーワードが空なら全受理
/// 3. いずれかのキーワードを部分文字列として含めば受理
#[derive(Debug, Clone)]
pub struct NameFilter {
    keywords: Vec<String>,
    blacklist: Vec<String>,
}

impl NameFilter {
    /// キーワード・ブラックリストを正規化してフィルターを構築
    ///
    /// 正規化後に空になったエントリは照合対象から外す。
    pub fn new(keywords: &[String], blacklist: &[String]) -> Self {
        let normalize_all = |items: &[String]| {
            items
                .iter()
                .map(|item| normalize_name(item))
                .filter(|item| !item.is_empty())
                .collect()
        };

        Self {
            keywords: normalize_all(keywords),
            blacklist: normalize_all(blacklist),
        }
    }

    /// 表示名をキープするかどうか
    pub fn keeps(&self, display_name: &str) -> bool {
        let normalized = normalize_name(display_name);

        if self
            .blacklist
            .iter()
            .any(|entry| normalized.contains(entry.as_str()))
        {
            return false;
        }

        if self.keywords.is_empty() {
            return true;
        }

        self.keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(keywords: &[&str], blacklist: &[&str]) -> NameFilter {
        let keywords: Vec<String> = keywords.iter().map(|s| s.to_string()).collect();
        let blacklist: Vec<String> = blacklist.iter().map(|s| s.to_string()).collect();
        NameFilter::new(&keywords, &blacklist)
    }

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize_name("Weeb Central"), "weebcentral");
        assert_eq!(normalize_name("weeb-central!!"), "weebcentral");
        assert_eq!(normalize_name("HiAnime"), "hianime");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_name("Aniyomi: HiAnime (Extra)");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn test_empty_keywords_accept_everything() {
        let f = filter(&[], &[]);
        assert!(f.keeps("Anything At All"));
        assert!(f.keeps(""));
    }

    #[test]
    fn test_keyword_substring_match() {
        let f = filter(&["hianime"], &[]);
        // 部分文字列照合なので前後に飾りが付いていても一致する
        assert!(f.keeps("HiAnime"));
        assert!(f.keeps("Aniyomi HiAnime Extra"));
        assert!(!f.keeps("AnimePahe"));
    }

    #[test]
    fn test_blacklist_rejects() {
        let f = filter(&[], &["preview"]);
        assert!(!f.keeps("MangaDex Preview"));
        assert!(f.keeps("MangaDex"));
    }

    #[test]
    fn test_blacklist_dominates_whitelist() {
        // 両方に一致する名前はブラックリスト優先で拒否
        let f = filter(&["mangadex"], &["preview"]);
        assert!(!f.keeps("MangaDex Preview"));
        assert!(f.keeps("MangaDex"));
    }

    #[test]
    fn test_keywords_are_normalized_before_matching() {
        let f = filter(&["Weeb Central"], &[]);
        assert!(f.keeps("weeb-central!!"));
    }
}
