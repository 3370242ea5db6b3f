use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use garage_dash::app::{App, InputMode, StatusLevel};
use garage_dash::config::{self, Config};
use garage_dash::controller::{ControllerSettings, DashboardController};
use garage_dash::domain::{FilterPolicy, Tab};
use garage_dash::infrastructure::api::HttpSettings;
use garage_dash::infrastructure::{DemoGarageApi, GarageApi, HttpGarageApi, RuntimeBridge};
use garage_dash::ui;

#[derive(Debug, Parser)]
#[command(
    name = "garage-dash",
    version,
    about = "Garage Dashboard: workshop jobs, appointments, inspections and sales in the terminal"
)]
struct Args {
    /// Backend base URL (e.g. https://erp.example.com)
    #[arg(long)]
    url: Option<String>,

    /// Scope every request to this company
    #[arg(long)]
    company: Option<String>,

    /// Use built-in demo data instead of a backend
    #[arg(long)]
    demo: bool,

    /// Auto refresh period in seconds
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// persist | reset-on-switch
    #[arg(long)]
    filter_policy: Option<FilterPolicy>,

    /// Config file (defaults to ~/.config/garage-dash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    init_logging(args.log_file.clone().or_else(config::log_path));

    let api = build_api(&args, &config)?;
    let backend = api.describe();
    info!(%backend, "starting");

    let runtime = RuntimeBridge::new(api, config.request_timeout())?;

    let settings = ControllerSettings {
        policy: args.filter_policy.unwrap_or(config.filter_policy),
        company: args.company.clone().or_else(|| config.company.clone()),
        refresh_interval: args
            .refresh_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.refresh_interval()),
    };
    let mut controller = DashboardController::new(settings);
    controller.mount(Instant::now());

    let desk_url = if args.demo {
        None
    } else {
        args.url.clone().or_else(|| config.base_url.clone())
    };
    let mut app = App::new(controller, backend).with_desk_url(desk_url);
    app.set_status("Loading dashboard…", StatusLevel::Info);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let res = run_app(&mut terminal, &mut app, &runtime);
    app.controller.dispose();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }
    info!("stopped");

    Ok(())
}

fn init_logging(path: Option<PathBuf>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("logging disabled, cannot open {}: {err}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_env("GARAGE_DASH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn build_api(args: &Args, config: &Config) -> Result<Arc<dyn GarageApi>> {
    let base_url = args
        .url
        .as_deref()
        .or(config.base_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty());

    match base_url {
        Some(url) if !args.demo => {
            let api = HttpGarageApi::new(HttpSettings {
                base_url: normalize_base_url(url),
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
                timeout: config.request_timeout(),
                methods: config.methods.clone(),
            })
            .context("building HTTP client")?;
            Ok(Arc::new(api))
        }
        _ => {
            if !args.demo {
                warn!("no base_url configured, using demo data");
            }
            Ok(Arc::new(DemoGarageApi::new()))
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runtime: &RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(app, runtime);
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    app.controller.poll_timer(Instant::now());

    for event in runtime.poll_events() {
        app.apply_runtime_event(event);
    }

    let requests = app.controller.take_fetch_requests();
    if requests.is_empty() {
        return;
    }
    if let Err(err) = runtime.submit(requests) {
        warn!(error = %err, "runtime unavailable");
        app.set_status(format!("Runtime stopped: {err}"), StatusLevel::Error);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char(ch @ '1'..='9') => {
            if let Some(tab) = Tab::from_shortcut(ch) {
                app.select_tab(tab);
            }
        }
        KeyCode::Tab => app.cycle_tab(true),
        KeyCode::BackTab => app.cycle_tab(false),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Char('s') => {
            if app.active_tab() == Tab::Dashboard {
                app.set_status("Dashboard has no filters", StatusLevel::Warn);
            } else {
                app.cycle_status_filter();
            }
        }
        KeyCode::Char('J') => app.cycle_job_card_filter(),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Char('l') | KeyCode::Right => app.focus_next_container(true),
        KeyCode::Char('h') | KeyCode::Left => app.focus_next_container(false),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Esc => app.status = None,
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}
