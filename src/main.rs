use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tool_watchdog::{
    events, ui, App, ChannelSource, FileSource, MonitorConfig, MonotonicClock, StreamSource, ToolRef,
    ToolSource, TrackerMessage, WatchdogConfig,
};

#[derive(Parser, Debug)]
#[command(name = "watchdog")]
#[command(about = "Liveness watchdog for tracked navigation tools")]
struct Args {
    /// Configuration file (TOML); a missing file is fine
    #[arg(long, default_value = "watchdog.toml")]
    config: PathBuf,

    /// Poll a JSON tracker snapshot file
    #[arg(short, long, default_value = "tools.json", conflicts_with_all = ["connect", "demo"])]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming tracker messages (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "demo"])]
    connect: Option<String>,

    /// Run against a built-in simulated tracker
    #[arg(long)]
    demo: bool,

    /// Tick interval (e.g. "250ms"); overrides the config file
    #[arg(short, long)]
    refresh: Option<String>,

    /// Time without data before a tool counts as disconnected
    #[arg(long)]
    staleness: Option<String>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = WatchdogConfig::load(&args.config)?;
    let monitor_config = config.monitor_config(args.refresh.as_deref(), args.staleness.as_deref())?;

    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &config, monitor_config);
    }

    if args.demo {
        return run_demo(&config, monitor_config);
    }

    let source = Box::new(FileSource::new(&args.file));
    run_tui(build_app(source, &config, monitor_config, &[])?)
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tool_watchdog=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}

/// Create the configured monitors and tools.
///
/// With no monitors configured a single "Watchdog" monitor is created and
/// seeded with `default_tools`.
fn build_app(
    source: Box<dyn ToolSource>,
    config: &WatchdogConfig,
    monitor_config: MonitorConfig,
    default_tools: &[&str],
) -> Result<App> {
    let mut app = App::new(source, Box::new(MonotonicClock::new()), monitor_config);

    if config.monitors.is_empty() {
        app.create_monitor("Watchdog")?;
        for id in default_tools {
            app.add_tool(ToolRef::new(*id), None)?;
        }
    }

    for entry in &config.monitors {
        app.create_monitor(entry.name.as_str())?;
        for tool in &entry.tools {
            let index = match app.add_tool(ToolRef::new(tool.id.as_str()), tool.label.clone()) {
                Ok(index) => index,
                Err(e) => {
                    warn!(monitor = %entry.name, tool = %tool.id, error = %e, "skipping configured tool");
                    continue;
                }
            };
            if !tool.alert {
                let monitor = app.active_monitor_mut()?;
                let id = monitor.registry().get(index)?.id();
                monitor.set_alert_enabled(id, false)?;
            }
        }
    }

    if let Some(first) = app.monitors().nth(0).map(|m| m.id()) {
        app.activate(first);
    }
    info!(monitors = app.monitors().len(), source = %app.source_description(), "watchdog ready");
    Ok(app)
}

/// Run with a TCP stream tool source
fn run_with_tcp(addr: &str, config: &WatchdogConfig, monitor_config: MonitorConfig) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn ToolSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    run_tui(build_app(source, config, monitor_config, &[])?)
}

const DEMO_TOOLS: [(&str, &str); 3] = [
    ("ReferenceToTracker", "Reference"),
    ("StylusToReference", "Stylus"),
    ("NeedleToReference", "Needle"),
];

/// Run against a simulated tracker: the reference is always visible, the
/// stylus drops out for 2s every 8s and the needle for 5s every 15s.
fn run_demo(config: &WatchdogConfig, monitor_config: MonitorConfig) -> Result<()> {
    let (tx, source) = ChannelSource::create("demo tracker");

    std::thread::spawn(move || {
        let start = Instant::now();
        loop {
            let t = start.elapsed().as_secs_f64();
            let visible = [true, t % 8.0 < 6.0, t % 15.0 < 10.0];
            for ((id, name), visible) in DEMO_TOOLS.iter().zip(visible) {
                if !visible {
                    continue;
                }
                let message = TrackerMessage::Updated {
                    id: id.to_string(),
                    name: Some(name.to_string()),
                };
                if tx.send(message).is_err() {
                    return;
                }
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    });

    let defaults: Vec<&str> = DEMO_TOOLS.iter().map(|(id, _)| *id).collect();
    run_tui(build_app(Box::new(source), config, monitor_config, &defaults)?)
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    app.update();
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered.intersection(area));
                return;
            }

            ui::draw(frame, app);
        })?;

        // Short timeout so ticks land close to their due time
        if let Some(event) = events::poll_event(Duration::from_millis(20))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        app.update();
    }

    Ok(())
}
