use anyhow::Context;
use avatar_view::AvatarViewSettings;
use bevy::{log::LogPlugin, prelude::*};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*};

const APP_ID: &str = "avatar_view";

/// Root for logs and settings. Debug builds keep everything inside the workspace.
fn output_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".out")
    }
    #[cfg(not(debug_assertions))]
    {
        PathBuf::from(".")
    }
}

/// Builds the Bevy app with window, settings and logging in place.
///
/// The returned guard flushes the file logger and must live as long as the app.
pub fn init() -> anyhow::Result<(App, WorkerGuard)> {
    let out = output_dir();
    let guard = setup_logging(&out.join("logs"))?;

    let settings = AvatarViewSettings::load_or_default(
        out.join("settings").join(AvatarViewSettings::FILE_NAME),
    );

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .build()
            .disable::<LogPlugin>()
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Avatar View".to_string(),
                    ..default()
                }),
                ..default()
            }),
    )
    .insert_resource(settings);

    Ok((app, guard))
}

fn setup_logging(log_dir: &std::path::Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let file_appender =
        tracing_appender::rolling::never(log_dir, format!("{APP_ID}.{timestamp}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    // Separate layer: file (non-blocking) + console (stdout)
    let file_layer = fmt::Layer::default()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    let console_layer = fmt::Layer::default()
        .with_target(true)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("installing log subscriber")?;

    Ok(guard)
}
