/// Ticker Dashboard
///
/// Polls the configured payload source and renders header, metrics, price
/// chart and news. Configuration comes from `DASHBOARD_*` environment
/// variables; logs go to `DASHBOARD_LOG`.
use std::{
    error::Error,
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use ticker_dashboard::{
    source_from_config,
    view::{render_dashboard, ViewState},
    DashboardConfig, DashboardState, PollOutcome, Poller, PollerHandle,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env();
    init_logging(&config.log_file)?;

    let source = source_from_config(&config)?;
    let source_label = source.describe();
    info!("Ticker dashboard starting, source {}", source_label);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Poller lives exactly as long as the screen
    let (poller, outcome_rx) = Poller::new(source, config.poll_interval)
        .with_channel_buffer_size(config.channel_buffer_size)
        .start();

    let res = run_app(&mut terminal, &config, &poller, outcome_rx, &source_label);

    poller.stop().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Ticker dashboard stopped");
    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &DashboardConfig,
    poller: &PollerHandle,
    mut outcome_rx: mpsc::Receiver<PollOutcome>,
    source_label: &str,
) -> Result<(), Box<dyn Error>> {
    let mut state = DashboardState::new();
    let mut ui = ViewState::default();

    loop {
        let mut received = false;
        while let Ok(outcome) = outcome_rx.try_recv() {
            state.apply(outcome);
            received = true;
        }

        let (point_count, news_count) = state
            .payload()
            .map(|p| (p.chart.prices.len(), p.news.len()))
            .unwrap_or((0, 0));
        if received {
            ui.clamp(point_count, news_count);
        }

        terminal.draw(|f| render_dashboard(f, &state, &ui, source_label))?;

        if !event::poll(config.tick_rate)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('r') => {
                if poller.refresh_now() {
                    info!("Manual refresh queued");
                } else {
                    warn!("Refresh already pending");
                }
            }
            KeyCode::Left => ui.cursor_left(point_count),
            KeyCode::Right => ui.cursor_right(point_count),
            KeyCode::Up => ui.news_previous(news_count),
            KeyCode::Down => ui.news_next(news_count),
            _ => {}
        }
    }

    Ok(())
}

/// Initialize logging into a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
