use clap::Parser;
use interlock_common::Extractor;
use interlock_ocr::{cache, cli, config, error, pipeline, scanner, sink};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::io::Read;
use std::path::{Path, PathBuf};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_transcripts(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() || files.iter().all(|f| f.as_os_str() == "-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(vec![("-".to_string(), text)]);
    }

    files
        .iter()
        .map(|path| {
            if !path.exists() {
                return Err(error::InterlockError::FileNotFound(path.display().to_string()));
            }
            Ok((path.display().to_string(), std::fs::read_to_string(path)?))
        })
        .collect()
}

fn cache_folder(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        path.to_path_buf()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { files, json } => {
            let extractor = Extractor::new(&config.extraction)?;
            let transcripts = read_transcripts(&files)?;
            let items = pipeline::extract_transcripts(&extractor, &transcripts);

            if json {
                println!("{}", pipeline::extraction_json(&items)?);
            } else {
                for item in &items {
                    if items.len() > 1 {
                        println!("== {}", item.source);
                    }
                    println!("name: {}", item.result.name);
                    println!("description: {}", item.result.description);
                }
            }
        }

        Commands::Process { path, output, format, timestamp, use_cache, recursive, dry_run } => {
            println!("📸 interlock - process\n");

            let provider = cli.ocr_provider.unwrap_or(config.ocr_provider);
            let extractor = Extractor::new(&config.extraction)?;

            println!("[1/2] Scanning photos...");
            let images = scanner::scan_path(&path, recursive)?;
            if images.is_empty() {
                return Err(error::InterlockError::NoImagesFound(path.display().to_string()));
            }
            println!("✔ {} photo(s) found\n", images.len());

            let sink_path = config.resolve_sink_path(output);
            let sink_format = format.unwrap_or_else(|| sink::SinkFormat::from_path(&sink_path));
            let sink = if dry_run {
                None
            } else {
                Some(sink::open_sink(sink_format, &sink_path, &config.sheet_name))
            };

            let folder = cache_folder(&path);
            let cache = use_cache.then(|| cache::CacheFile::load(&folder));

            println!(
                "[2/2] Running OCR ({}){}...",
                provider.command_name(),
                if use_cache { " (cache on)" } else { "" }
            );
            let mut ctx = pipeline::ProcessContext {
                config: &config,
                provider,
                extractor,
                sink,
                cache,
                timestamp,
            };
            let summary = pipeline::process_all(&images, &mut ctx).await;

            if let Some(cache) = &ctx.cache {
                cache.save(&folder)?;
            }

            println!(
                "✔ recorded: {}, no text: {}, failed: {}, cache hits: {}",
                summary.recorded, summary.no_text, summary.failed, summary.cache_hits
            );
            if dry_run {
                println!("(dry run, nothing written)");
            } else {
                println!("✔ Log: {} ({})", sink_path.display(), sink_format);
            }
        }

        Commands::Log { file, format, limit } => {
            let log_path = config.resolve_sink_path(file);
            let log_format = format.unwrap_or_else(|| sink::SinkFormat::from_path(&log_path));
            let rows = sink::read_log(log_format, &log_path, &config.sheet_name)?;

            if rows.is_empty() {
                println!("No rows in {}", log_path.display());
            }
            for row in rows.iter().skip(rows.len().saturating_sub(limit)) {
                println!("{} | {} | {}", row.timestamp, row.name, row.description);
            }
        }

        Commands::Config { set_api_key, show, init } => {
            let mut config = config;

            if init {
                config.save()?;
                println!("✔ Wrote {}", Config::config_path()?.display());
            }

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ API key stored");
            }

            if show {
                println!("Config ({}):", Config::config_path()?.display());
                for line in config.summary_lines() {
                    println!("  {}", line);
                }
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = cache::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = cache::CacheFile::load(&target);
                    println!("Cache:");
                    println!("  Path: {}", cache_path.display());
                    println!("  Entries: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  Size: {} bytes", meta.len());
                    }
                } else {
                    println!("No cache file: {}", cache_path.display());
                }
            }

            if clear {
                match cache::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ Cache removed: {}", cache_path.display()),
                    Ok(false) => println!("No cache file"),
                    Err(e) => println!("Failed to remove cache: {}", e),
                }
            }
        }
    }

    Ok(())
}
