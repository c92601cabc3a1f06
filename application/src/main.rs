use std::{io, process::ExitCode, sync::OnceLock};

use application::{cli, Args, Config};
use common::DateTime;
use service::{
    command::RestoreSession,
    infra::{storage, Http},
    Command as _, Service,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().unwrap_or_else(|e| e.exit());

    let Config {
        api,
        storage,
        scheduler,
        log: log_conf,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log_conf.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let api = api.try_into().map_err(|e| {
        log::error!("invalid API base URL: {e}");
    })?;
    let http = Http::new(api).map_err(|e| {
        log::error!("failed to initialize `Http` client: {e}");
    })?;
    let storage = storage::File::new(storage.path);

    let service = Service::new(scheduler.into(), http, storage);
    if let Some(user) = service
        .execute(RestoreSession)
        .await
        .unwrap_or_else(|e| match e {})
    {
        log::debug!("resumed session of `User(id: {})`", user.id);
    }

    cli::run(command, service, DateTime::now())
        .await
        .map_err(|e| log::error!("{e}"))
}
