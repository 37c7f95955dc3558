//! Roll Call
//!
//! パーティ画面のスクリーンショットをOCRし、名簿と照合して出席を記録する。

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod ocr;
pub mod report;
pub mod scanner;
pub mod service;
pub mod store;
