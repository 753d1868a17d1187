use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{self, Command};
use crate::output::{self, OutputFormat};
use crate::render::{self, RenderStyle};
use crate::viewer::{Screen, Viewer, ViewerOptions};

fn print_banner() {
    const BANNER: &str = r#"
                  __         __
    ____  ____  / /_____  / /__  _  __
   / __ \/ __ \/ //_/ _ \/ __  / |/_/
  / /_/ / /_/ / ,< /  __/ /_/ />  <
 / .___/\____/_/|_|\___/\__,_/_/|_|
/_/
       v0.1.0 - terminal catalog viewer
    "#;
    eprint!("{}", BANNER.red());
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn print_error(message: &str) {
    eprintln!("{} {}", "::".red().bold(), message.red());
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push_str("\nUsage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }
        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        let idx = *section_idx.entry(heading.clone()).or_insert_with(|| {
            sections.push((heading, Vec::new()));
            sections.len() - 1
        });
        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }
            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.contains(&rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                let min_values = arg.get_num_args().map(|r| r.min_values()).unwrap_or(1);
                if min_values == 0 {
                    flags.push_str(&format!(" [<{value_name}>]"));
                } else {
                    flags.push_str(&format!(" <{value_name}>"));
                }
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }

    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    viewer: ViewerOptions,
    workers: usize,
    verbose: u8,
    color: Option<bool>,
    columns: usize,
    search: Option<String>,
    details: Option<usize>,
    interactive: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    // Some(false) forces plain output, Some(true) forces colour, None leaves it to the terminal.
    let color = if args.color {
        Some(true)
    } else if args.no_color || cfg.no_color.unwrap_or(false) {
        Some(false)
    } else {
        None
    };

    let defaults = ViewerOptions::default();
    let base_url = args
        .base_url
        .or(cfg.base_url)
        .map(|u| u.trim().to_string())
        .unwrap_or(defaults.base_url);
    let resource = args
        .resource
        .or(cfg.resource)
        .map(|r| r.trim().to_string())
        .unwrap_or(defaults.resource);

    let page_size = args.page_size.or(cfg.page_size).unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err("invalid page_size, expected positive integer".to_string());
    }
    let start_page = args.page.or(cfg.start_page).unwrap_or(defaults.start_page);
    if start_page == 0 {
        return Err("invalid start_page, expected positive integer".to_string());
    }

    let rate = args.rate.or(cfg.rate).unwrap_or(defaults.rate);
    let concurrency = args
        .concurrency
        .or(cfg.concurrency)
        .unwrap_or(defaults.concurrency);
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(defaults.timeout_seconds);
    let workers = args.workers.or(cfg.workers).unwrap_or(2);
    if rate == 0 || concurrency == 0 || workers == 0 {
        return Err("rate, concurrency and workers must be positive integers".to_string());
    }

    let proxy = args
        .proxy
        .or(cfg.proxy)
        .filter(|p| !p.trim().is_empty());
    let user_agent = args
        .user_agent
        .or(cfg.user_agent)
        .unwrap_or(defaults.user_agent);
    let follow_redirects = args
        .follow_redirects
        .or(cfg.follow_redirects)
        .unwrap_or(defaults.follow_redirects);

    let columns = args.columns.or(cfg.columns).unwrap_or(4);
    if columns == 0 {
        return Err("invalid columns, expected positive integer".to_string());
    }

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}', expected text or json"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        viewer: ViewerOptions {
            base_url,
            resource,
            page_size,
            start_page,
            concurrency,
            rate,
            timeout_seconds,
            proxy,
            user_agent,
            follow_redirects,
            verbose: args.verbose,
        },
        workers,
        verbose: args.verbose,
        color,
        columns,
        search: args.search.map(|s| s.trim().to_string()),
        details: args.details,
        interactive: args.interactive,
        output,
        output_format,
    })
}

fn render_style(run: &RunConfig) -> RenderStyle {
    RenderStyle {
        columns: run.columns,
        color: run.color.unwrap_or_else(|| colored::control::SHOULD_COLORIZE.should_colorize()),
    }
}

async fn write_output(run: &RunConfig, path: &str, screen: &Screen) -> Result<(), String> {
    let format = run
        .output_format
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text);
    let rendered = output::render(&output::build_document(screen), format);

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    Ok(())
}

async fn run_prompt(viewer: &mut Viewer, style: RenderStyle) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "pokedex>".bold());
        std::io::stdout()
            .flush()
            .map_err(|e| format!("failed to flush stdout: {e}"))?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read command: {e}")),
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match controller::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                print_error(&e.to_string());
                continue;
            }
        };
        match viewer.dispatch(command).await {
            Ok(Screen::Quit) => break,
            Ok(screen) => print!("{}", render::render_screen(&screen, style)),
            Err(e) => print_error(&e.to_string()),
        }
    }
    println!();
    Ok(())
}

fn past_end_warning(screen: &Screen) -> Option<String> {
    match screen {
        Screen::Page {
            page, total_pages, ..
        } if *total_pages > 0 && *page > *total_pages => Some(format!(
            "page {page} is past the last page ({total_pages})"
        )),
        _ => None,
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if let Some(color) = run.color {
        colored::control::set_override(color);
    }
    let style = render_style(&run);
    if run.interactive {
        print_banner();
    }

    let mut viewer = Viewer::new(run.viewer.clone()).map_err(|e| e.to_string())?;
    viewer.set_progress(run.verbose > 0 || run.interactive);

    format_kv_line("Catalog", viewer.options().base_url.as_str());
    if run.verbose > 0 {
        format_kv_line("Resource", viewer.options().resource.as_str());
        format_kv_line("Page size", &viewer.options().page_size.to_string());
        format_kv_line("Rate", &format!("{}/s", viewer.options().rate));
    }

    let now = Instant::now();
    let mut screen = match run.search.as_deref() {
        Some(term) => viewer.dispatch(Command::Search(term.to_string())).await,
        None => viewer.open().await,
    }
    .map_err(|e| e.to_string())?;

    if let Some(warning) = past_end_warning(&screen) {
        print_error(&warning);
    }

    if let Some(card) = run.details {
        screen = viewer
            .dispatch(Command::Details(card))
            .await
            .map_err(|e| e.to_string())?;
    }

    print!("{}", render::render_screen(&screen, style));

    if let Some(path) = run.output.as_deref() {
        write_output(&run, path, &screen).await?;
        format_kv_line("Output", path);
    }

    if run.verbose > 0 {
        format_kv_line("Elapsed", &format!("{}ms", now.elapsed().as_millis()));
    }

    if run.interactive {
        eprintln!("{}", "Type 'help' for commands.".dimmed());
        run_prompt(&mut viewer, style).await?;
    }

    Ok(())
}

fn config_path(args: &CliArgs) -> Option<(PathBuf, bool)> {
    match args.config.as_deref() {
        Some(path) => Some((config::expand_tilde(path), false)),
        None => config::default_config_path().map(|p| (p, true)),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = match config_path(&args) {
        Some((path, allow_missing)) => {
            if args.init_config {
                config::ensure_default_config_file(&path)?;
                format_kv_line("Config", &path.display().to_string());
            }
            config::load_config(&path, allow_missing)?
        }
        None if args.init_config => {
            return Err("cannot locate a home directory for the default config".to_string())
        }
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("pokedex").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_without_flags_or_config() {
        let run = build_run_config(args(&[]), ConfigFile::default()).unwrap();
        assert_eq!(run.viewer.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(run.viewer.page_size, 20);
        assert_eq!(run.viewer.start_page, 1);
        assert_eq!(run.viewer.concurrency, 1);
        assert_eq!(run.columns, 4);
        assert_eq!(run.color, None);
        assert!(!run.interactive);
    }

    #[test]
    fn flags_override_config() {
        let cfg = ConfigFile {
            page_size: Some(50),
            rate: Some(5),
            base_url: Some("http://localhost:8000/api/v2".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(args(&["-n", "10", "-p", "3"]), cfg).unwrap();
        assert_eq!(run.viewer.page_size, 10);
        assert_eq!(run.viewer.start_page, 3);
        assert_eq!(run.viewer.rate, 5);
        assert_eq!(run.viewer.base_url, "http://localhost:8000/api/v2");
    }

    #[test]
    fn color_flag_beats_config_no_color() {
        let cfg = ConfigFile {
            no_color: Some(true),
            ..ConfigFile::default()
        };
        let run = build_run_config(args(&[]), cfg.clone()).unwrap();
        assert_eq!(run.color, Some(false));
        let run = build_run_config(args(&["--color"]), cfg).unwrap();
        assert_eq!(run.color, Some(true));
    }

    #[test]
    fn config_zero_page_size_is_rejected() {
        let cfg = ConfigFile {
            page_size: Some(0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(args(&[]), cfg).is_err());
    }

    #[test]
    fn config_output_format_is_validated() {
        let cfg = ConfigFile {
            output_format: Some("yaml".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(args(&[]), cfg).is_err());
        let run = build_run_config(args(&["-o", "out.json", "--of", "json"]), ConfigFile::default())
            .unwrap();
        assert_eq!(run.output_format, Some(OutputFormat::Json));
        assert_eq!(run.output.as_deref(), Some("out.json"));
    }

    #[test]
    fn follow_redirects_accepts_bare_flag_and_value() {
        let run = build_run_config(args(&["--follow-redirects", "false"]), ConfigFile::default())
            .unwrap();
        assert!(!run.viewer.follow_redirects);
        let run = build_run_config(args(&["--follow-redirects"]), ConfigFile::default()).unwrap();
        assert!(run.viewer.follow_redirects);
    }

    fn page_screen(page: u64, total_pages: u64) -> Screen {
        Screen::Page {
            cards: Vec::new(),
            plan: Default::default(),
            page,
            total_pages,
            total_items: total_pages * 20,
        }
    }

    #[test]
    fn past_end_warning_skips_empty_catalog() {
        assert_eq!(past_end_warning(&page_screen(1, 0)), None);
        assert_eq!(past_end_warning(&page_screen(3, 3)), None);
        assert_eq!(
            past_end_warning(&page_screen(12, 10)).as_deref(),
            Some("page 12 is past the last page (10)")
        );
        assert_eq!(past_end_warning(&Screen::Help), None);
    }

    #[test]
    fn help_groups_options_by_heading() {
        let help = render_custom_help();
        assert!(help.starts_with("pokedex "));
        for heading in ["Output:", "Input:", "Catalog:", "Browse:", "Performance:", "HTTP:"] {
            assert!(help.contains(heading), "missing {heading}");
        }
        assert!(help.contains("-p, --pg, --page <N>"));
    }
}
