use crossbeam_channel::{select, unbounded, Receiver, Sender};
use notify::{Event, RecursiveMode, Watcher};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::diagnostics::{render_error, ConfError};
use crate::parser::ast::App;
use crate::session::Session;

/// Watch the configuration root and re-parse whenever a file in it changes.
/// Parse failures are reported and watching continues.
pub fn watch(config: &Config, no_clear: bool) -> Result<(), ConfError> {
    println!("Watching {} for changes...", config.root.display());
    parse_and_report(config);
    print_separator();

    let (tx, rx) = unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(&config.root, RecursiveMode::Recursive)
        .map_err(|e| ConfError::watch(format!("failed to watch {}: {e}", config.root.display())))?;

    loop {
        wait_for_change(&rx);
        debounce_events(&rx);

        if !no_clear {
            clearscreen::clear().ok();
        }

        println!("Configuration changed, parsing...");
        parse_and_report(config);
        print_separator();
    }
}

fn parse_and_report(config: &Config) {
    let mut session = Session::new(&config.root);
    match crate::parse_file(&mut session, &config.entry) {
        Ok(app) => print_summary(&app),
        Err(err) => render_error(&err, session.sources()),
    }
}

/// One line per top-level collection of the parsed app.
pub fn print_summary(app: &App) {
    let package_routes: usize = app.packages.iter().map(|p| p.routes.len()).sum();
    println!(
        "{} package(s), {} route(s) ({} in packages), {} middleware",
        app.packages.len(),
        app.routes.len() + package_routes,
        package_routes,
        app.middlewares.len()
    );
    if let Some(route) = app.index_route() {
        println!("  index:    {}", route.path);
    }
    if let Some(route) = app.error404_route() {
        println!("  error404: {}", route.path);
    }
}

/// Wait for the first file change event
fn wait_for_change(rx: &Receiver<Event>) {
    if let Ok(event) = rx.recv() {
        debug!(paths = ?event.paths, "change detected");
    }
}

/// Debounce events by waiting for a quiet period
fn debounce_events(rx: &Receiver<Event>) {
    loop {
        select! {
            recv(rx) -> _event => {}
            default(Duration::from_millis(100)) => break,
        }
    }
}

fn create_watcher(tx: Sender<Event>) -> Result<notify::RecommendedWatcher, ConfError> {
    notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
        Ok(event) => {
            if matches!(
                event.kind,
                notify::EventKind::Modify(_) | notify::EventKind::Create(_) | notify::EventKind::Remove(_)
            ) {
                let _ = tx.send(event);
            }
        }
        Err(e) => warn!("watch error: {e}"),
    })
    .map_err(|e| ConfError::watch(format!("failed to create file watcher: {e}")))
}

fn print_separator() {
    println!("\n{}\n", "=".repeat(60));
}
