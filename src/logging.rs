//! ログ初期化
//!
//! 利用者向けの出力は stdout（println!）、診断ログは stderr（tracing）。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// グローバルなロガーを初期化する。`RUST_LOG` があればそちらを優先
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // 2回目以降の初期化（テスト等）は無視
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
