use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roll-call")]
#[command(about = "パーティ画面スクリーンショットからの出席集計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データ保存先（設定ファイルより優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 一致とみなす類似度（0-100、設定ファイルより優先）
    #[arg(long, global = true)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スクリーンショットから出席を記録
    Check {
        /// 画像ファイルまたはフォルダ（--text 指定時はOCR済みテキストファイル）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 画像ではなくOCR済みテキストを読む
        #[arg(long)]
        text: bool,

        /// OCRキャッシュを使わない
        #[arg(long)]
        no_cache: bool,
    },

    /// 今日の参加者
    Today,

    /// 昨日の参加者
    Yesterday,

    /// メンバー一覧（出席数順）
    List,

    /// 出席数で絞り込み
    Filter {
        /// 比較演算子 (=, <, <=, >, >=)
        operator: String,

        /// 比較する出席数
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },

    /// 名簿を置き換え（.txt または .json）
    Set {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// メンバーを追加
    Add {
        name: String,
    },

    /// メンバーを削除
    Remove {
        name: String,
    },

    /// 名簿を全削除
    Clear {
        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 一致閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// tesseract のパスを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// OCRキャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
