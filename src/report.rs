//! 結果の整形
//!
//! 一覧は `1. 名前 (出席数)` の番号付きリスト。

use roll_call_common::{CountOperator, DayAttendance, RankedMember, ReconcileOutcome};

pub fn format_ranked(members: &[RankedMember]) -> String {
    members
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {} ({})", i + 1, m.name, m.count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_plain(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 照合結果（出席・欠席）
pub fn render_check(outcome: &ReconcileOutcome) -> String {
    let mut sections = Vec::new();

    if outcome.matched.is_empty() {
        sections.push("❌ 名簿のメンバーは検出されませんでした".to_string());
    } else {
        sections.push(format!(
            "✅ 出席メンバー ({})\n{}\n出席: {} | 欠席: {}",
            outcome.day_key,
            format_ranked(&outcome.matched),
            outcome.matched.len(),
            outcome.absent.len()
        ));
    }

    if !outcome.absent.is_empty() {
        sections.push(format!("❌ 欠席メンバー\n{}", format_ranked(&outcome.absent)));
    }

    sections.join("\n\n")
}

/// today / yesterday の照会結果
pub fn render_day(day: &DayAttendance, label: &str) -> String {
    if day.is_empty() {
        return format!("📭 {}（{}）の参加者はいません", label, day.day_key);
    }
    format!(
        "📆 {}（{}）の参加者 ({})\n{}",
        label,
        day.day_key,
        day.len(),
        format_plain(&day.members)
    )
}

pub fn render_roster(members: &[RankedMember]) -> String {
    if members.is_empty() {
        return "⚠️ 名簿が登録されていません".to_string();
    }
    format!(
        "📋 メンバー一覧\n{}\n合計: {}人",
        format_ranked(members),
        members.len()
    )
}

pub fn render_filter(operator: CountOperator, value: i64, members: &[RankedMember]) -> String {
    if members.is_empty() {
        return format!("✅ 条件に一致するメンバーはいません: 出席数 {} {}", operator, value);
    }
    format!(
        "🔍 絞り込み結果（出席数 {} {}）\n{}\n合計: {}人",
        operator,
        value,
        format_ranked(members),
        members.len()
    )
}
