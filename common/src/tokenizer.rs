//! OCRテキストのトークン分割
//!
//! 1行1トークン。前後の空白を除去し、3文字以上の行だけを候補とする。
//! 大文字小文字や記号の正規化はここでは行わない（類似度計算側で扱う）。

/// トークンとして採用する最小文字数
pub const MIN_TOKEN_CHARS: usize = 3;

/// OCRテキストから候補トークンを取り出す
pub fn extract_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_TOKEN_CHARS)
}

/// 1回の照合で使うトークンの集合
///
/// 複数画像のトークンを最初に出現した順で保持し、完全一致の重複は捨てる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPool {
    tokens: Vec<String>,
}

impl TokenPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像1枚分のOCRテキストを追加
    pub fn extend_from_text(&mut self, text: &str) {
        for token in extract_tokens(text) {
            self.push(token);
        }
    }

    /// 未登録なら追加して true
    pub fn push(&mut self, token: &str) -> bool {
        if self.tokens.iter().any(|t| t == token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for TokenPool {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut pool = Self::new();
        for text in iter {
            pool.extend_from_text(text);
        }
        pool
    }
}
