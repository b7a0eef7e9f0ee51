use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use pigame::{
    app_dirs::AppContext,
    compare::ColorMode,
    config::{edit_config, ConfigOverrides, ConfigStore, FileConfigStore, PracticeMode},
    error::{ConfigError, DigitsError, PracticeError, ValidationError},
    practice::Practice,
    report::{easter_egg, is_easter_egg, pi_line, stats_summary, version_line, ComparisonReport},
    runtime::CrosstermKeySource,
    stats::{FileStatsStore, StatsStore},
    validation::{parse_length, Candidate},
};
use std::io::{self, stdin};
use std::process::ExitCode;
use thiserror::Error;

/// Filter directives for the diagnostic log on stderr
const LOG_ENV: &str = "PIGAME_LOG";

/// Evaluate your version of π (3.141..) or practice reciting its digits
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pigame",
    about,
    disable_version_flag = true,
    allow_negative_numbers = true
)]
pub struct Cli {
    /// your version of π
    #[clap(value_name = "YOUR_PI")]
    your_pi: Option<String>,

    /// increase verbosity
    #[clap(short = 'v')]
    verbose: bool,

    /// calculate and show π with LENGTH number of decimals
    #[clap(short = 'p', value_name = "LENGTH", allow_hyphen_values = true)]
    length: Option<String>,

    /// colorblind-friendly output (underlined instead of red)
    #[clap(short = 'c', long = "colorblind")]
    colorblind: bool,

    /// print version
    #[clap(short = 'V', long = "version")]
    version: bool,

    /// start an interactive practice session
    #[clap(long, conflicts_with_all = ["your_pi", "length"])]
    practice: bool,

    /// pacing for this session
    #[clap(long, value_enum, value_name = "MODE")]
    practice_mode: Option<PracticeMode>,

    /// shortest level for this session
    #[clap(long, value_name = "N")]
    min_digits: Option<usize>,

    /// longest level for this session
    #[clap(long, value_name = "N")]
    max_digits: Option<usize>,

    /// digits per chunk in chunk mode
    #[clap(long, value_name = "N")]
    chunk_size: Option<usize>,

    /// seconds per level in timed mode
    #[clap(long = "time-limit", value_name = "SECONDS")]
    time_limit: Option<u64>,

    /// group the echoed digits and show progress markers
    #[clap(long, overrides_with = "no_visual_aid")]
    visual_aid: bool,

    #[clap(long, overrides_with = "visual_aid", hide = true)]
    no_visual_aid: bool,

    /// show the clock in timed mode and level times
    #[clap(long, overrides_with = "no_show_timer")]
    show_timer: bool,

    #[clap(long, overrides_with = "show_timer", hide = true)]
    no_show_timer: bool,

    /// show lifetime practice statistics
    #[clap(long, conflicts_with_all = ["practice", "config"])]
    stats: bool,

    /// edit the stored practice settings
    #[clap(long, conflicts_with = "practice")]
    config: bool,
}

impl Cli {
    /// One-session practice settings given as flags
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.practice_mode,
            min_digits: self.min_digits,
            max_digits: self.max_digits,
            chunk_size: self.chunk_size,
            time_limit_seconds: self.time_limit,
            visual_aid: flag_pair(self.visual_aid, self.no_visual_aid),
            show_timer: flag_pair(self.show_timer, self.no_show_timer),
        }
    }

    fn color_mode(&self) -> ColorMode {
        ColorMode::from_flag(self.colorblind)
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("nothing to do")]
    NothingToDo,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Digits(#[from] DigitsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Practice(#[from] PracticeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                CliError::NothingToDo => {}
                CliError::Validation(_) => eprintln!("pigame error: {e}"),
                _ => {
                    tracing::debug!(error = ?e, "command failed");
                    eprintln!("pigame error: {e}");
                    return ExitCode::FAILURE;
                }
            }
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.version {
        println!(
            "{}",
            version_line(
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_REPOSITORY")
            )
        );
        return Ok(());
    }

    if cli.stats {
        let ctx = AppContext::resolve();
        let stats = FileStatsStore::new(&ctx).load();
        println!("{}", stats_summary(&stats, Local::now()));
        return Ok(());
    }

    if cli.config {
        require_tty();
        return edit_settings(&AppContext::resolve());
    }

    if cli.practice {
        require_tty();
        return practice(cli, &AppContext::resolve());
    }

    let length = cli.length.as_deref().map(parse_length).transpose()?;
    if let Some(length) = length {
        println!("{}", pi_line(length, cli.verbose)?);
    }

    match cli.your_pi.as_deref() {
        Some(input) if is_easter_egg(input) => println!("{}", easter_egg()),
        Some(input) => {
            let report = ComparisonReport::new(Candidate::parse(input)?, length)?;
            println!("{}", report.render(cli.verbose, cli.color_mode()));
        }
        None if length.is_some() => {}
        None => return Err(CliError::NothingToDo),
    }
    Ok(())
}

fn require_tty() {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }
}

fn practice(cli: &Cli, ctx: &AppContext) -> Result<(), CliError> {
    let config = FileConfigStore::new(ctx).load().with_overrides(&cli.overrides())?;
    let stats = FileStatsStore::new(ctx);

    let mut keys = CrosstermKeySource;
    let mut out = io::stdout().lock();
    Practice::new(config, &stats)
        .with_color_mode(cli.color_mode())
        .run(&mut keys, &mut out)?;
    Ok(())
}

fn edit_settings(ctx: &AppContext) -> Result<(), CliError> {
    let store = FileConfigStore::new(ctx);
    let current = store.load();

    let updated = edit_config(&current, &mut stdin().lock(), &mut io::stdout().lock())?;
    updated.validate()?;

    match store.save(&updated) {
        Ok(()) => println!("Settings saved to {}", store.path().display()),
        Err(e) => {
            tracing::warn!(error = %e, "could not save settings");
            eprintln!("warning: could not save settings: {e}");
        }
    }
    Ok(())
}
