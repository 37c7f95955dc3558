//! 文字列の類似度
//!
//! 正規化Indel距離による比率（0〜100）。大文字小文字は無視する。
//! `100 * 2 * LCS / (len(a) + len(b))`

/// 2つの文字列の類似度（0.0〜100.0）
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let lcs = lcs_len(&a, &b);
    100.0 * (2 * lcs) as f64 / total as f64
}

/// 最長共通部分列の長さ（1行DP）
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical() {
        assert!(approx(similarity("Alice", "Alice"), 100.0));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(approx(similarity("ALICE", "alice"), 100.0));
    }

    #[test]
    fn test_one_extra_char() {
        // LCS=5, 合計11
        assert!(approx(similarity("Alicee", "Alice"), 1000.0 / 11.0));
    }

    #[test]
    fn test_disjoint() {
        assert!(approx(similarity("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_empty() {
        assert!(approx(similarity("", ""), 100.0));
        assert!(approx(similarity("abc", ""), 0.0));
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("Xander", "Alice"), ("kitten", "sitting"), ("Carol", "Karol")];
        for (a, b) in pairs {
            assert!(approx(similarity(a, b), similarity(b, a)));
        }
    }

    #[test]
    fn test_lcs_not_substring() {
        // "ace" は "abcde" の部分列
        assert_eq!(lcs_len(&['a', 'b', 'c', 'd', 'e'], &['a', 'c', 'e']), 3);
    }

    #[test]
    fn test_exact_eighty() {
        // LCS=4, 合計10
        assert!(approx(similarity("abcde", "abcdx"), 80.0));
    }
}
