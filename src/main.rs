use anyhow::Result;
use console::Term;
use hamilton_stress::settings::{settings, SinkBackend};
use hamilton_stress::sink::{ResultsSink, Sink};
use hamilton_stress::terminal::run_session;
use hamilton_stress::utils::{log_probe, log_sink_error, log_startup_config};
use hamilton_stress::wizard::Wizard;
use std::io;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("hamilton_stress=info".parse()?))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber)?;

    let settings = settings();
    let target = match settings.sink.backend {
        SinkBackend::Rest => settings.sink.rest.url.as_str(),
        SinkBackend::Sqlite => settings.sink.sqlite.database_url.as_str(),
        SinkBackend::Disabled => "",
    };
    log_startup_config(settings.sink.backend, target, &settings.share.base_url);

    let sink = match Sink::from_config(&settings.sink) {
        Ok(sink) => sink,
        Err(e) => {
            log_sink_error(&e.to_string());
            Sink::Disabled
        }
    };

    if sink.backend() != SinkBackend::Disabled {
        log_probe(sink.probe_connectivity().await);
    }

    let term = Term::stdout();
    term.clear_screen()?;

    let mut wizard = Wizard::default();
    let mut input = io::stdin().lock();
    run_session(&mut input, &term, &mut wizard, &sink, &settings.share.base_url).await?;

    Ok(())
}
