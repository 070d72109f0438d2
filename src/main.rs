use rayon::prelude::*;
use sql_layout::config::load_config;
use sql_layout::error::SqlFmtError;
use sql_layout::formatter::{format_source, FormattedTree};
use sql_layout::i18n::{self, fmt_ui_msg, ui_msg, UiMsg};
use sql_layout::suggest::find_similar;
use std::io::Read;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 受け付けるオプション（「もしかして」候補にも使う）
const KNOWN_OPTIONS: &[&str] = &[
    "-w", "--write", "--check", "--edits", "--config", "--indent", "--tabs", "-v", "--verbose",
    "-h", "--help", "-V", "--version",
];

#[derive(Debug, Default)]
struct Options {
    write: bool,
    check: bool,
    edits: bool,
    config_path: Option<String>,
    indent: Option<usize>,
    tabs: bool,
    verbose: bool,
    files: Vec<String>,
}

enum Command {
    Help,
    Version,
    Format(Options),
}

/// 1ファイル分の結果
struct Outcome {
    path: String,
    original: String,
    formatted: FormattedTree,
}

impl Outcome {
    fn changed(&self) -> bool {
        self.original != self.formatted.text
    }
}

fn main() {
    // 国際化システムを初期化
    i18n::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{}", ui_msg(UiMsg::HelpText));
            return;
        }
        Ok(Command::Version) => {
            println!("{}", fmt_ui_msg(UiMsg::VersionString, &[VERSION]));
            return;
        }
        Ok(Command::Format(options)) => options,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    setup_logging(options.verbose);
    std::process::exit(run(options));
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-w" | "--write" => options.write = true,
            "--check" => options.check = true,
            "--edits" => options.edits = true,
            "--tabs" => options.tabs = true,
            "-v" | "--verbose" => options.verbose = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| fmt_ui_msg(UiMsg::ErrorRequiresArg, &[arg]))?;
                options.config_path = Some(path.clone());
            }
            "--indent" => {
                let value = iter
                    .next()
                    .ok_or_else(|| fmt_ui_msg(UiMsg::ErrorRequiresArg, &[arg]))?;
                let width = value
                    .parse::<usize>()
                    .map_err(|_| fmt_ui_msg(UiMsg::ErrorInvalidNumber, &[arg, value]))?;
                options.indent = Some(width);
            }
            "-" => options.files.push(arg.clone()),
            unknown if unknown.starts_with('-') => {
                let mut message = fmt_ui_msg(UiMsg::ErrorUnknownOption, &[unknown]);
                let similar = find_similar(unknown, KNOWN_OPTIONS.iter().copied(), 2, 1);
                if let Some(best) = similar.first() {
                    message.push('\n');
                    message.push_str(&fmt_ui_msg(UiMsg::DidYouMeanOption, &[best]));
                }
                return Err(message);
            }
            path => options.files.push(path.to_string()),
        }
    }

    if options.files.is_empty() {
        options.files.push("-".to_string());
    }
    if options.write && options.files.iter().any(|f| f == "-") {
        return Err(ui_msg(UiMsg::ErrorWriteNeedsFile).to_string());
    }
    if options.edits && !cfg!(feature = "format-json") {
        return Err(ui_msg(UiMsg::ErrorEditsUnavailable).to_string());
    }
    Ok(Command::Format(options))
}

/// ログ出力を設定（`SQLFMT_LOG` があればそれに従う）
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env("SQLFMT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    // テストなどで既に設定済みなら何もしない
    let _ = tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .try_init();
}

/// 整形を実行し、終了コードを返す
fn run(options: Options) -> i32 {
    let mut config = load_config(options.config_path.as_deref());
    if let Some(width) = options.indent {
        config.indent_width = width;
    }
    if options.tabs {
        config.use_tabs = true;
    }
    tracing::debug!(?config, files = options.files.len(), "starting");

    // 並列に整形し、出力は引数の順に行う
    let results: Vec<Result<Outcome, SqlFmtError>> = options
        .files
        .par_iter()
        .map(|path| -> Result<Outcome, SqlFmtError> {
            let original = read_input(path)?;
            let formatted = format_source(&original, display_name(path), &config)?;
            Ok(Outcome {
                path: path.clone(),
                original,
                formatted,
            })
        })
        .collect();

    let mut failed = false;
    let mut would_reformat = 0usize;

    for result in results {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                report_error(&e, options.edits);
                failed = true;
                continue;
            }
        };

        if options.check {
            if outcome.changed() {
                would_reformat += 1;
                eprintln!(
                    "{}",
                    fmt_ui_msg(UiMsg::CheckWouldReformat, &[display_name(&outcome.path)])
                );
            }
        } else if options.write {
            if outcome.changed() {
                if let Err(e) = std::fs::write(&outcome.path, &outcome.formatted.text) {
                    report_error(
                        &SqlFmtError::write_error(&outcome.path, &e.to_string()),
                        options.edits,
                    );
                    failed = true;
                }
            }
        } else if options.edits {
            print_edits(&outcome);
        } else {
            print!("{}", outcome.formatted.text);
        }
    }

    if options.check && would_reformat > 0 {
        eprintln!(
            "{}",
            fmt_ui_msg(UiMsg::CheckSummary, &[&would_reformat.to_string()])
        );
        return 1;
    }
    i32::from(failed)
}

fn display_name(path: &str) -> &str {
    if path == "-" {
        "<stdin>"
    } else {
        path
    }
}

fn read_input(path: &str) -> Result<String, SqlFmtError> {
    if path == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| SqlFmtError::read_error("<stdin>", &e.to_string()))?;
        return Ok(input);
    }
    std::fs::read_to_string(path).map_err(|e| SqlFmtError::read_error(path, &e.to_string()))
}

#[cfg(feature = "format-json")]
fn report_error(error: &SqlFmtError, as_json: bool) {
    if as_json {
        eprintln!("{}", error.to_json());
    } else {
        eprint!("{}", error.full());
    }
}

#[cfg(not(feature = "format-json"))]
fn report_error(error: &SqlFmtError, _as_json: bool) {
    eprint!("{}", error.full());
}

#[cfg(feature = "format-json")]
fn print_edits(outcome: &Outcome) {
    let edit = sql_layout::TextEdit {
        range: outcome.formatted.range,
        new_text: outcome.formatted.text.clone(),
    };
    let value = serde_json::json!({
        "file": display_name(&outcome.path),
        "edits": [edit],
    });
    println!("{}", value);
}

#[cfg(not(feature = "format-json"))]
fn print_edits(_outcome: &Outcome) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_stdin() {
        let Ok(Command::Format(options)) = parse_args(&[]) else {
            panic!("expected format command");
        };
        assert_eq!(options.files, vec!["-"]);
    }

    #[test]
    fn parses_flags_and_values() {
        let Ok(Command::Format(options)) =
            parse_args(&args(&["--check", "--indent", "4", "--tabs", "a.sql", "b.sql"]))
        else {
            panic!("expected format command");
        };
        assert!(options.check);
        assert!(options.tabs);
        assert_eq!(options.indent, Some(4));
        assert_eq!(options.files, vec!["a.sql", "b.sql"]);
    }

    #[test]
    fn unknown_option_suggests_a_fix() {
        let Err(message) = parse_args(&args(&["--chek"])) else {
            panic!("expected error");
        };
        assert!(message.contains("--check"), "{}", message);
    }

    #[test]
    fn write_needs_a_file() {
        assert!(parse_args(&args(&["--write"])).is_err());
        assert!(parse_args(&args(&["--write", "-"])).is_err());
        assert!(parse_args(&args(&["--write", "a.sql"])).is_ok());
    }

    #[test]
    fn missing_and_invalid_values() {
        assert!(parse_args(&args(&["--indent"])).is_err());
        assert!(parse_args(&args(&["--indent", "wide"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn help_and_version_win() {
        assert!(matches!(parse_args(&args(&["a.sql", "-h"])), Ok(Command::Help)));
        assert!(matches!(parse_args(&args(&["-V"])), Ok(Command::Version)));
    }
}
