//! Command-line front end: analyze a recording, preview its pauses and write
//! a copy with the pauses cut out.

use std::path::PathBuf;

use pausetrim::config::{ProcessingConfig, RemovalPolicy};
use pausetrim::logging::{self, LogSettings};
use pausetrim::session::{Analysis, ProcessOutcome, Session, Upload};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let settings = LogSettings::for_cli(options.verbose, options.quiet, options.json);
    if let Err(err) = logging::init(&settings) {
        eprintln!("Logging disabled: {err}");
    }

    let config = options.resolve_config()?;
    let mut session = Session::new();
    let upload = session
        .upload_file(&options.input)
        .map_err(|err| err.to_string())?;
    if !options.json {
        print_upload(upload);
    }

    let analysis = session.analyze(&config).map_err(|err| err.to_string())?;
    if options.json {
        let text = serde_json::to_string_pretty(analysis)
            .map_err(|err| format!("Failed to serialize analysis: {err}"))?;
        println!("{text}");
    } else {
        print_analysis(analysis);
    }
    if options.analyze_only {
        return Ok(());
    }

    let outcome = session
        .process(&config, |progress| {
            tracing::info!("{} ({}%)", progress.label(), progress.percent)
        })
        .map_err(|err| err.to_string())?;
    let processed = match outcome {
        ProcessOutcome::Processed(processed) => processed,
        ProcessOutcome::NothingToRemove => {
            options.status("No pauses detected; nothing to remove.");
            return Ok(());
        }
    };

    let export = processed.export().map_err(|err| err.to_string())?;
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let path = export
        .write_to(&output_dir)
        .map_err(|err| format!("Failed to write {}: {err}", output_dir.display()))?;
    tracing::info!("Exported {} ({})", path.display(), export.media_type);
    options.status(&format!(
        "New duration: {:.1}s (saved {:.1}s, {:.1}%)",
        processed.new_duration_ms() as f64 / 1000.0,
        processed.time_saved_ms() as f64 / 1000.0,
        processed.time_saved_percent()
    ));
    options.status(&format!("Wrote {}", path.display()));
    Ok(())
}

fn print_upload(upload: &Upload) {
    let audio = upload.audio();
    println!("File: {}", upload.name());
    println!("Size: {:.2} MB", upload.size_bytes() as f64 / (1024.0 * 1024.0));
    println!(
        "Duration: {:.1}s, {} Hz, {} channel(s)",
        audio.duration_seconds(),
        audio.sample_rate(),
        audio.channels()
    );
}

fn print_analysis(analysis: &Analysis) {
    let summary = &analysis.summary;
    println!();
    println!("Speech segments: {}", summary.speech_segments);
    println!("Pauses found:    {}", summary.pause_count);
    println!(
        "Total silence:   {:.1}s ({:.1}%)",
        summary.total_silence_ms as f64 / 1000.0,
        summary.silence_percent
    );
    if analysis.is_fully_silent() {
        println!("The recording is silent at this threshold.");
        return;
    }
    if !analysis.has_pauses() {
        return;
    }
    println!();
    println!("{:>3}  {:>9}  {:>9}  {:>9}", "#", "start", "end", "length");
    for pause in &analysis.pauses.pauses {
        println!(
            "{:>3}  {:>8.2}s  {:>8.2}s  {:>8.2}s",
            pause.index,
            pause.start_seconds(),
            pause.end_seconds(),
            pause.duration_seconds()
        );
    }
}

#[derive(Default)]
struct Options {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    threshold_db: Option<f32>,
    min_silence_s: Option<f32>,
    keep_before_ms: Option<u64>,
    keep_after_ms: Option<u64>,
    removal: Option<RemovalPolicy>,
    analyze_only: bool,
    json: bool,
    verbose: bool,
    quiet: bool,
}

impl Options {
    /// Human-readable result lines; kept off stdout when it carries JSON.
    fn status(&self, line: &str) {
        if self.json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// File values first, then flag overrides, then clamping.
    fn resolve_config(&self) -> Result<ProcessingConfig, String> {
        let mut config = match &self.config_path {
            Some(path) => ProcessingConfig::load_from(path).map_err(|err| err.to_string())?,
            None => ProcessingConfig::default(),
        };
        if let Some(value) = self.threshold_db {
            config.silence_threshold_db = value;
        }
        if let Some(value) = self.min_silence_s {
            config.min_silence_length_s = value;
        }
        if let Some(value) = self.keep_before_ms {
            config.keep_before_ms = value;
        }
        if let Some(value) = self.keep_after_ms {
            config.keep_after_ms = value;
        }
        if let Some(value) = self.removal {
            config.removal = value;
        }
        Ok(config.clamped())
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut input = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "-o" | "--output" => {
                idx += 1;
                options.output_dir = Some(PathBuf::from(value_for(&args, idx, "--output")?));
            }
            "--config" => {
                idx += 1;
                options.config_path = Some(PathBuf::from(value_for(&args, idx, "--config")?));
            }
            "--threshold-db" => {
                idx += 1;
                options.threshold_db = Some(parse_value(&args, idx, "--threshold-db")?);
            }
            "--min-silence" => {
                idx += 1;
                options.min_silence_s = Some(parse_value(&args, idx, "--min-silence")?);
            }
            "--keep-before" => {
                idx += 1;
                options.keep_before_ms = Some(parse_value(&args, idx, "--keep-before")?);
            }
            "--keep-after" => {
                idx += 1;
                options.keep_after_ms = Some(parse_value(&args, idx, "--keep-after")?);
            }
            "--removal" => {
                idx += 1;
                options.removal = Some(parse_value(&args, idx, "--removal")?);
            }
            "--analyze-only" => options.analyze_only = true,
            "--json" => options.json = true,
            "-v" | "--verbose" => options.verbose = true,
            "-q" | "--quiet" => options.quiet = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => {
                if input.is_some() {
                    return Err(format!("Unexpected extra input: {path}"));
                }
                input = Some(PathBuf::from(path));
            }
        }
        idx += 1;
    }

    options.input = input.ok_or_else(|| format!("An input file is required\n\n{}", help_text()))?;
    Ok(Some(options))
}

fn value_for<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, String> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_value<T>(args: &[String], idx: usize, flag: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value_for(args, idx, flag)?;
    value
        .parse()
        .map_err(|err| format!("Invalid value for {flag}: {value} ({err})"))
}

fn help_text() -> String {
    [
        "pausetrim",
        "",
        "Finds long pauses in a recording and writes a copy with them removed.",
        "",
        "Usage:",
        "  pausetrim <input> [options]",
        "",
        "Options:",
        "  -o, --output <dir>       Directory for audio_no_pauses.wav (default: current dir).",
        "  --threshold-db <db>      Silence threshold, -60 to -20 (default: -40).",
        "  --min-silence <secs>     Minimum pause length, 0.5 to 5.0 (default: 2.0).",
        "  --keep-before <ms>       Audio kept before each segment, 0 to 1000 (default: 100).",
        "  --keep-after <ms>        Audio kept after each segment, 0 to 1000 (default: 150).",
        "  --removal <policy>       previewed-pauses (default) or all-gaps.",
        "  --config <file>          TOML file with processing parameters.",
        "  --analyze-only           Print the pause preview without processing.",
        "  --json                   Print the analysis as JSON on stdout.",
        "  -v, --verbose            Include debug events in the log.",
        "  -q, --quiet              Only log warnings, and only to the log file.",
    ]
    .join("\n")
}
