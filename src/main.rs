use clap::Parser;
use roll_call_common::CountOperator;
use roll_call_rust::{cli, config, error, logging, ocr, report, scanner, service};
use cli::{Cli, Commands};
use config::Config;
use error::{RollCallError, Result};
use service::AttendanceService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    if let Some(value) = cli.threshold {
        config.match_threshold = roll_call_common::MatchThreshold::new(value)?;
    }

    match cli.command {
        Commands::Check { inputs, text, no_cache } => {
            let service = AttendanceService::from_config(&config)?;
            service.ensure_roster()?;

            let texts: Vec<String> = if text {
                println!("[1/2] OCRテキストを読み込み中...");
                inputs
                    .iter()
                    .map(|path| {
                        if !path.is_file() {
                            return Err(RollCallError::FileNotFound(path.display().to_string()));
                        }
                        Ok(std::fs::read_to_string(path)?)
                    })
                    .collect::<Result<_>>()?
            } else {
                println!("[1/2] スクリーンショットを読み取り中...");
                let images = scanner::collect_inputs(&inputs)?;
                if images.is_empty() {
                    return Err(RollCallError::NoImagesFound(
                        inputs
                            .iter()
                            .map(|p| p.display().to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ));
                }

                let extractor = Arc::new(ocr::TesseractCli::new(
                    config.tesseract_cmd.clone(),
                    config.upscale_factor,
                ));
                let data_dir = config.data_dir();
                let cache_dir = (config.ocr_cache && !no_cache).then_some(data_dir.as_path());
                let results = ocr::extract_all(images, extractor, cache_dir, !cli.verbose).await?;
                let cached = results.iter().filter(|r| r.cached).count();
                println!("✔ {}枚を読み取り（キャッシュ {}枚）", results.len(), cached);
                results.into_iter().map(|r| r.text).collect()
            };

            println!("[2/2] 名簿と照合中...\n");
            let outcome = service.record_attendance_task(texts).await?;
            println!("{}", report::render_check(&outcome));
        }

        Commands::Today => {
            let service = AttendanceService::from_config(&config)?;
            let day = service.day_attendance(0)?;
            println!("{}", report::render_day(&day, "今日"));
        }

        Commands::Yesterday => {
            let service = AttendanceService::from_config(&config)?;
            let day = service.day_attendance(1)?;
            println!("{}", report::render_day(&day, "昨日"));
        }

        Commands::List => {
            let service = AttendanceService::from_config(&config)?;
            println!("{}", report::render_roster(&service.list_members()?));
        }

        Commands::Filter { operator, value } => {
            let service = AttendanceService::from_config(&config)?;
            let operator: CountOperator = operator.parse()?;
            let members = service.filter_members(operator, value)?;
            println!("{}", report::render_filter(operator, value, &members));
        }

        Commands::Set { file } => {
            let service = AttendanceService::from_config(&config)?;
            let saved = service.set_roster_from_file(&file)?;
            println!("✅ {}人のメンバーを保存しました", saved);
        }

        Commands::Add { name } => {
            let service = AttendanceService::from_config(&config)?;
            service.add_member(&name)?;
            println!("✅ `{}` を追加しました", name.trim());
        }

        Commands::Remove { name } => {
            let service = AttendanceService::from_config(&config)?;
            let removed = service.remove_member(&name)?;
            println!("🗑️ `{}` を削除しました", removed.join("`, `"));
        }

        Commands::Clear { yes } => {
            let service = AttendanceService::from_config(&config)?;
            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt("名簿を全削除しますか？")
                    .default(false)
                    .interact()
                    .map_err(|e| RollCallError::Io(std::io::Error::other(e.to_string())))?;
                if !confirmed {
                    println!("中止しました");
                    return Ok(());
                }
            }
            if service.clear_roster()? {
                println!("🗑️ 名簿を全削除しました");
            } else {
                println!("❌ 名簿がありません");
            }
        }

        Commands::Config { set_threshold, set_tesseract, show } => {
            if let Some(value) = set_threshold {
                config.set_match_threshold(value)?;
                println!("✔ 一致閾値を {} に設定しました", value);
            }

            if let Some(cmd) = set_tesseract {
                config.set_tesseract_cmd(cmd)?;
                println!("✔ tesseract のパスを設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存先: {}", config.data_dir().display());
                println!("  一致閾値: {}", config.match_threshold);
                println!("  照合のUTCオフセット: {}分", config.check_utc_offset_minutes);
                println!("  照会のUTCオフセット: {}分", config.query_utc_offset_minutes);
                println!("  排他ロック: {}", if config.strict_locking { "有効" } else { "無効" });
                println!("  tesseract: {}", config.tesseract_cmd);
                println!("  拡大倍率: {}", config.upscale_factor);
                println!("  OCRキャッシュ: {}", if config.ocr_cache { "有効" } else { "無効" });
            }
        }

        Commands::Cache { clear, info } => {
            let target = config.data_dir();
            let cache_path = ocr::OcrCacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = ocr::OcrCacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match ocr::OcrCacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
