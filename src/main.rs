//! livemenu CLI
//!
//! Show a menu built from arguments or a menu file and print the choice.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;

use livemenu::color::ColorMode;
use livemenu::config::{load_menu_file, parse_color};
use livemenu::logging;
use livemenu::menu::{Menu, MenuError, MenuOption};
use livemenu::types::{Color, OutputFormat, Selection};

#[derive(Parser, Debug)]
#[command(name = "livemenu")]
#[command(about = "Pick one option from an interactive terminal menu")]
#[command(version)]
struct Cli {
    /// Options to choose from (ignored when --file is given)
    items: Vec<String>,

    /// Read the menu from a JSON file
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Line shown above the options
    #[arg(long)]
    prompt: Option<String>,

    /// Marker in front of the selected option
    #[arg(long)]
    selector: Option<String>,

    /// Marker in front of unselected options
    #[arg(long)]
    prefix: Option<String>,

    /// Foreground of unselected options (#rrggbb, r,g,b or a name)
    #[arg(long, value_parser = color_arg)]
    fg: Option<Color>,

    /// Background of unselected options
    #[arg(long, value_parser = color_arg)]
    bg: Option<Color>,

    /// Foreground of the selected option
    #[arg(long, value_parser = color_arg)]
    selected_fg: Option<Color>,

    /// Background of the selected option
    #[arg(long, value_parser = color_arg)]
    selected_bg: Option<Color>,

    /// Label refresh interval in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Add a live UTC clock as the last option
    #[arg(long)]
    clock: bool,

    /// Never emit color escapes
    #[arg(long)]
    no_color: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Write logs to this file (default: $LIVEMENU_LOG, else no logs)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn color_arg(s: &str) -> Result<Color, String> {
    parse_color(s).map_err(|e| e.to_string())
}

/// Exit status for a menu abandoned with Ctrl+C.
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.log_file.as_deref()) {
        eprintln!("Warning: cannot open log file: {}", e);
    }

    match cmd_run(cli) {
        Ok(Outcome::Chosen) => ExitCode::SUCCESS,
        Ok(Outcome::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// MENU ASSEMBLY
// ============================================================================

/// Build the menu and the value reported for each option.
fn build_menu(cli: &Cli) -> Result<(Menu, Vec<String>), String> {
    let (mut menu, mut values) = match &cli.file {
        Some(path) => {
            let file = load_menu_file(path).map_err(|e| e.to_string())?;
            let values = file.options.iter().map(|o| o.value().to_string()).collect();
            (file.to_menu().map_err(|e| e.to_string())?, values)
        }
        None => {
            let menu = cli
                .items
                .iter()
                .fold(Menu::new(), |menu, item| menu.option(MenuOption::new(item.as_str())));
            (menu, cli.items.clone())
        }
    };

    if cli.clock {
        menu = menu.option(MenuOption::dynamic(utc_clock));
        values.push("clock".to_string());
    }

    if menu.is_empty() {
        return Err("No options given. Pass items as arguments or use --file".to_string());
    }

    if let Some(prompt) = &cli.prompt {
        menu = menu.prompt(prompt.as_str());
    }
    if let Some(selector) = &cli.selector {
        menu = menu.selector(selector.as_str());
    }
    if let Some(prefix) = &cli.prefix {
        menu = menu.option_prefix(prefix.as_str());
    }
    if let Some(ms) = cli.refresh_ms {
        menu = menu.refresh_interval(Duration::from_millis(ms));
    }

    let palette = *menu.palette();
    menu = menu
        .colors(cli.fg.unwrap_or(palette.fg), cli.bg.unwrap_or(palette.bg))
        .colors_when_selected(
            cli.selected_fg.unwrap_or(palette.selected_fg),
            cli.selected_bg.unwrap_or(palette.selected_bg),
        );

    if cli.no_color {
        menu = menu.color_mode(ColorMode::Plain);
    }

    Ok((menu, values))
}

/// `Time (UTC) HH:MM:SS`, recomputed on every refresh tick.
fn utc_clock() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let time = secs % 86_400;
    format!(
        "Time (UTC) {:02}:{:02}:{:02}",
        time / 3600,
        (time % 3600) / 60,
        time % 60
    )
}

// ============================================================================
// COMMAND HANDLER
// ============================================================================

enum Outcome {
    Chosen,
    Interrupted,
}

/// Run the menu and print the choice.
fn cmd_run(cli: Cli) -> Result<Outcome, String> {
    let format: OutputFormat = cli.format.into();
    let (menu, values) = build_menu(&cli)?;

    let index = match menu.run() {
        Ok(index) => index,
        Err(MenuError::Interrupted) => return Ok(Outcome::Interrupted),
        Err(e) => return Err(e.to_string()),
    };

    let selection = Selection {
        index,
        value: values.get(index).cloned().unwrap_or_default(),
    };

    match format {
        OutputFormat::Human => println!("{}", selection.value),
        OutputFormat::Json => {
            let json = serde_json::to_string(&selection).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
    }

    Ok(Outcome::Chosen)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("livemenu").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn items_become_options_and_values() {
        let cli = parse(&["build", "test", "deploy"]);
        let (menu, values) = build_menu(&cli).unwrap();
        assert_eq!(menu.len(), 3);
        assert_eq!(values, vec!["build", "test", "deploy"]);
    }

    #[test]
    fn no_items_is_an_error() {
        let cli = parse(&[]);
        assert!(build_menu(&cli).is_err());
    }

    #[test]
    fn clock_adds_a_live_option() {
        let cli = parse(&["--clock"]);
        let (menu, values) = build_menu(&cli).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(values, vec!["clock"]);
    }

    #[test]
    fn color_overrides_keep_unset_defaults() {
        let cli = parse(&["a", "--fg", "red", "--selected-bg", "0,0,255"]);
        let (menu, _) = build_menu(&cli).unwrap();
        let p = menu.palette();
        assert_eq!(p.fg, Color::RED);
        assert_eq!(p.bg, Color::BLACK);
        assert_eq!(p.selected_bg, Color::BLUE);
    }

    #[test]
    fn bad_color_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["livemenu", "a", "--fg", "mauve"]);
        assert!(result.is_err());
    }

    #[test]
    fn file_values_default_to_labels() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"options":[{"label":"One","value":"1"},{"label":"Two"}]}"#)
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--file", &path, "--prompt", "Pick"]);
        let (menu, values) = build_menu(&cli).unwrap();
        assert_eq!(values, vec!["1", "Two"]);
        assert_eq!(menu.layout().prompt, "Pick");
    }

    #[test]
    fn clock_label_has_time_shape() {
        let label = utc_clock();
        let time = label.strip_prefix("Time (UTC) ").unwrap();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
    }
}
