#[macro_use]
extern crate failure;

mod app;

use alblog::{ApplicationLoadBalancerLogField, TargetStatusPolicy};
use clap::load_yaml;
use clap::{App, ArgMatches};
use failure::Fail;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn target_status_policy(sub_m: &ArgMatches) -> TargetStatusPolicy {
    if sub_m.is_present("strict_target_status") {
        TargetStatusPolicy::PlaceholderOnly
    } else {
        TargetStatusPolicy::Lenient
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let yaml = load_yaml!("cli.yml");
    let app_m = App::from_yaml(yaml).get_matches();

    match app_m.subcommand() {
        ("parse", Some(sub_m)) => {
            let data_source = app::DataSource::from_arg(sub_m.value_of("file"));
            let output_mode = sub_m
                .value_of("output")
                .unwrap_or("table")
                .parse::<app::OutputMode>()
                .map_err(anyhow::Error::msg)?;
            let fields = match sub_m.value_of("fields") {
                Some(s) => app::parse_field_list(s).map_err(|e| e.compat())?,
                None => ApplicationLoadBalancerLogField::all(),
            };

            let stdout = io::stdout();
            let mut out = stdout.lock();
            app::run(
                &data_source,
                &fields,
                output_mode,
                target_status_policy(sub_m),
                &mut out,
            )
            .map_err(|e| e.compat())?;
        }
        ("check", Some(sub_m)) => {
            let data_source = app::DataSource::from_arg(sub_m.value_of("file"));
            let summary = app::check(&data_source, target_status_policy(sub_m)).map_err(|e| e.compat())?;

            println!("parsed: {}, failed: {}", summary.parsed, summary.failed);
            if summary.failed > 0 {
                process::exit(1);
            }
        }
        ("fields", Some(_)) => {
            for name in ApplicationLoadBalancerLogField::field_names() {
                println!("{}", name);
            }
        }
        _ => {
            println!("{}", app_m.usage());
        }
    }

    Ok(())
}
