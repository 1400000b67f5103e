mod debug_report;

use anyhow::Context as _;
use dictrans::{Config, IdentityTranslator, TermDefinition, TermSet, translate_verbose};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Read};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "dictrans.toml";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("cannot load {}", path.display()))?,
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => {
            Config::load(DEFAULT_CONFIG).with_context(|| format!("cannot load {DEFAULT_CONFIG}"))?
        }
        None => Config::default(),
    };
    if let Some(dict) = cli.dictionary {
        config.dictionary = dict;
    }
    if let Some(lang) = cli.target_lang {
        config.target_lang = lang;
    }
    if let Some(name) = cli.translator {
        config.translator = name;
    }

    let defs = if config.dictionary.exists() {
        let file = File::open(&config.dictionary)
            .with_context(|| format!("cannot open dictionary {}", config.dictionary.display()))?;
        TermDefinition::read_json_lines(BufReader::new(file))
            .with_context(|| format!("cannot read dictionary {}", config.dictionary.display()))?
    } else {
        tracing::warn!(path = %config.dictionary.display(), "dictionary not found, using built-in terms only");
        Vec::new()
    };
    let (terms, skipped) = TermSet::load_lenient(defs);

    // Dry run: the backend is a pass-through that answers to the configured name.
    let translator = IdentityTranslator::named(config.translator.clone());
    let run = translate_verbose(&cli.input, &config.target_lang, &translator, &terms, &config.options()).await?;

    let report = debug_report::Report {
        input: &cli.input,
        target_lang: &config.target_lang,
        translator: &config.translator,
        terms: &terms,
        skipped: &skipped,
        run: &run,
    };
    debug_report::print_run(&report, cli.color);
    Ok(())
}

struct CliConfig {
    input: String,
    config: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    target_lang: Option<String>,
    translator: Option<String>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut config = None;
    let mut dictionary = None;
    let mut target_lang = None;
    let mut translator = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
        args.next().ok_or_else(|| format!("error: {flag} expects a value"))
    }

    fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
        if input.is_some() {
            return Err("error: input provided multiple times".to_string());
        }
        *input = Some(value);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("dictrans {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-c" | "--config" => config = Some(PathBuf::from(value(&mut args, "--config")?)),
            "-d" | "--dict" => dictionary = Some(PathBuf::from(value(&mut args, "--dict")?)),
            "-t" | "--to" => target_lang = Some(value(&mut args, "--to")?),
            "--as" => translator = Some(value(&mut args, "--as")?),
            "-i" | "--input" => {
                let v = value(&mut args, "--input")?;
                set_input(&mut input, v)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--to=") => target_lang = Some(arg.trim_start_matches("--to=").to_string()),
            _ if arg.starts_with("--as=") => translator = Some(arg.trim_start_matches("--as=").to_string()),
            _ if arg.starts_with("--dict=") => dictionary = Some(PathBuf::from(arg.trim_start_matches("--dict="))),
            _ if arg.starts_with("--config=") => config = Some(PathBuf::from(arg.trim_start_matches("--config="))),
            _ if arg.starts_with("--input=") => set_input(&mut input, arg.trim_start_matches("--input=").to_string())?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, config, dictionary, target_lang, translator, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "dictrans {version}

Dry-run a dictionary translation: apply the term dictionary around a
pass-through translator and show what a real backend would receive.

Usage:
  dictrans [OPTIONS] [--] <input...>
  dictrans [OPTIONS] --input <text>

Options:
  -i, --input <text>         Input text. If omitted, reads remaining args
                             or stdin when no args are provided.
  -c, --config <path>        Configuration file. Default: {default_config} if present.
  -d, --dict <path>          JSON-lines term dictionary (overrides config).
  -t, --to <lang>            Target language, e.g. en or zh-TW (overrides config).
      --as <translator>      Translator name used by term filters (overrides config).
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter, e.g. dictrans=debug. Default: warn.

Exit codes:
  0  Success.
  1  Runtime error (configuration, dictionary, pipeline).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_config = DEFAULT_CONFIG
    )
}
