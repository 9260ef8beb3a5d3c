use {
    anyhow::{Context, Result},
    clap::Parser,
    kline_replay::{
        Cli, Command, HELP, HttpPageProvider, JsonFileCache, Panel, ReplayController,
        ReplaySession, SessionBootstrapper, SessionReply, SharedSurface, render_window,
        app::RenderSurface,
    },
    std::{panic, sync::Arc},
    strum::IntoEnumIterator,
    tokio::io::{AsyncBufReadExt, BufReader},
};

/// Rows of each window printed after a redraw.
const TAIL_ROWS: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("kline_replay"), my_code_level)
        .parse_default_env()
        .init();

    let settings = Cli::parse().into_settings();

    let provider = HttpPageProvider::new(&settings).context("Failed to build the HTTP client")?;
    let controller = ReplayController::new(Arc::new(provider));
    let cache = JsonFileCache::new(&settings.cache_path);
    let surface = SharedSurface::new(settings.surface_width);

    let mut bootstrapper = SessionBootstrapper::new(&cache, &surface);
    if let Some(raw) = settings.start.as_deref() {
        bootstrapper = bootstrapper.start_at(raw).context("Invalid --start cursor")?;
    }
    let report = bootstrapper
        .run(&controller)
        .await
        .with_context(|| format!("Replay bootstrap against {} failed", settings.base_url))?;

    println!(
        "Replay from {} ({}/{} panels loaded). Type 'help' for commands.",
        report.start.to_display_utc8(),
        report.ready_panels(),
        report.panels.len()
    );

    let mut session = ReplaySession::new(controller.clone(), settings.step)?;
    let mut revision = controller.subscribe();
    draw(&session, surface.width());
    revision.mark_unchanged();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => draw(&session, surface.width()),
            Command::Resize(width) => {
                surface.resize(width);
                draw(&session, surface.width());
            }
            Command::Input(event) => match session.handle(event).await {
                Ok(SessionReply::Advanced(outcome)) if outcome.is_coalesced() => {
                    println!("An advance is already running; request dropped.");
                }
                Ok(SessionReply::Advanced(_)) => {}
                Ok(SessionReply::StepChanged(step)) => println!("Step is now {}.", step),
                Ok(SessionReply::Ordered(mark)) => println!(
                    "{} on {} at {} ({:.4})",
                    mark.side,
                    mark.panel,
                    mark.at.to_display_utc8(),
                    mark.price
                ),
                Err(e) => println!("{}", e),
            },
        }

        // The controller bumps the revision whenever a window changed.
        if revision.has_changed().unwrap_or(false) {
            revision.mark_unchanged();
            draw(&session, surface.width());
        }
    }

    Ok(())
}

fn draw(session: &ReplaySession, pixel_width: f64) {
    for panel in Panel::iter() {
        let Some(snapshot) = session.controller().snapshot(panel) else {
            continue;
        };
        let marks = session.visible_marks(panel);
        println!("{}", render_window(&snapshot, &marks, pixel_width, TAIL_ROWS));
        if let Some(error) = &snapshot.last_error {
            println!("  last error: {}", error);
        }
    }
}
