use crate::ocr::OcrProvider;
use crate::pipeline::TimestampSource;
use crate::sink::SinkFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interlock")]
#[command(about = "インターロック画面写真のOCR・ログ記録ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（各段階の出力・生トランスクリプト）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OCRエンジン (vision/tesseract、デフォルト: 設定値)
    #[arg(long, global = true)]
    pub ocr_provider: Option<OcrProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OCRトランスクリプトから名前と説明を抽出
    Extract {
        /// トランスクリプトファイル（未指定または `-` で標準入力）
        files: Vec<PathBuf>,

        /// JSON配列で出力
        #[arg(long)]
        json: bool,
    },

    /// 写真をOCRして抽出結果をログに追記
    Process {
        /// 写真ファイルまたはフォルダ
        #[arg(required = true)]
        path: PathBuf,

        /// ログファイル（デフォルト: 設定値、なければ interlocks.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ログ形式（xlsx/jsonl、デフォルト: 拡張子から判定）
        #[arg(short, long)]
        format: Option<SinkFormat>,

        /// 行のタイムスタンプの取得元
        #[arg(long, value_enum, default_value = "now")]
        timestamp: TimestampSource,

        /// キャッシュ済みトランスクリプトを使う（処理済みの写真はOCRしない）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも対象にする
        #[arg(short = 'r', long)]
        recursive: bool,

        /// OCRと抽出のみ行い、ログには書かない
        #[arg(long)]
        dry_run: bool,
    },

    /// 記録済みの行を表示
    Log {
        /// ログファイル（デフォルト: 設定値、なければ interlocks.xlsx）
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// ログ形式（xlsx/jsonl、デフォルト: 拡張子から判定）
        #[arg(long)]
        format: Option<SinkFormat>,

        /// 末尾N行のみ
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// 設定の表示・変更
    Config {
        /// Google Cloud Vision APIキーを保存
        #[arg(long)]
        set_api_key: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,

        /// デフォルト設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },

    /// トランスクリプトキャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（デフォルト: カレントディレクトリ）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
