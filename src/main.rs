use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketwatch::data::duration::parse_date;
use ticketwatch::{
    events, export, load_table, ui, App, DashboardData, DashboardLimits, DataSource, FileSource,
    Settings, TicketFilter, View,
};

#[derive(Parser, Debug)]
#[command(name = "ticketwatch")]
#[command(about = "Terminal dashboard for customer-service ticket exports")]
struct Args {
    /// Ticket export to read (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, default_value = "tickets.xlsx")]
    file: PathBuf,

    /// First creation date to include (e.g., "2024-03-01")
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last creation date to include (inclusive)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Restrict to a channel; repeat for several
    #[arg(long = "channel")]
    channels: Vec<String>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds (overrides settings)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Number of customers/agents in the rankings (overrides settings)
    #[arg(long)]
    top_n: Option<usize>,

    /// Export the dashboard to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref(), args.export.is_some())?;

    let settings = Settings::load(args.config.as_deref())?;
    let mut limits = settings.limits();
    if let Some(top_n) = args.top_n {
        limits.top_n = top_n;
    }
    let refresh = Duration::from_secs(args.refresh.unwrap_or(settings.refresh_secs));

    let filter = TicketFilter::new(args.from, args.to, args.channels);

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&args.file, export_path, &filter, &limits);
    }

    let source = Box::new(FileSource::new(&args.file));
    run_tui(source, filter, limits, refresh)
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so logs only reach stderr in export mode.
fn init_tracing(log_file: Option<&Path>, export_mode: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if export_mode {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    }

    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    filter: TicketFilter,
    limits: DashboardLimits,
    refresh_interval: Duration,
) -> Result<()> {
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

    // Create app and load initial data
    let mut app = App::new(source, filter, limits);
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

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
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Tabulation => ui::tabulation::render(frame, app, chunks[2]),
                View::Rankings => ui::rankings::render(frame, app, chunks[2]),
                View::Tickets => ui::tickets::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_filter_overlay {
                ui::filter::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table border (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export the dashboard for `ticket_path` to a JSON file
fn export_to_file(
    ticket_path: &Path,
    export_path: &Path,
    filter: &TicketFilter,
    limits: &DashboardLimits,
) -> Result<()> {
    let table = load_table(ticket_path)
        .with_context(|| format!("Failed to load {}", ticket_path.display()))?;
    let data = DashboardData::build(&table, filter, limits);

    export::write_export(&data, export_path)?;

    info!(
        tickets = data.kpis.total_tickets,
        closed = data.kpis.closed_tickets,
        path = %export_path.display(),
        "Exported dashboard"
    );
    println!("Exported dashboard to: {}", export_path.display());
    Ok(())
}
