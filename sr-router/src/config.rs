use clap::{value_t, values_t, App, Arg, ArgMatches};
use sr_runtime::arp::CacheConfig;
use sr_runtime::interface::{InterfaceRecord, InterfaceTable};
use std::time::Duration;
use tracing::Level;

/// Everything the router process is told on the command line.
#[derive(Debug)]
pub struct RouterConfig {
    pub interfaces: InterfaceTable,
    pub cache: CacheConfig,
    pub log_level: Level,
}

pub fn app() -> App<'static, 'static> {
    App::new("sr-router")
        .version("0.1")
        .author("sr-rs Contributors")
        .about("Answers ARP for its own interfaces and hands IPv4 traffic to a forwarding stage")
        .arg(
            Arg::with_name("interface")
                .short("i")
                .long("interface")
                .value_name("NAME,IP,MAC")
                .help("An interface to serve, e.g. eth0,10.0.0.1,bb:bb:bb:bb:bb:02")
                .required(true)
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|record| {
                    record
                        .parse::<InterfaceRecord>()
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            Arg::with_name("arp_timeout")
                .long("arp-timeout")
                .value_name("SECS")
                .help("How long a learned ARP binding stays valid")
                .takes_value(true)
                .default_value("15"),
        )
        .arg(
            Arg::with_name("sweep_interval")
                .long("sweep-interval")
                .value_name("SECS")
                .help("How often expired ARP bindings are swept out of the cache")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Most verbose level of log events to print")
                .takes_value(true)
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
}

impl RouterConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let interfaces = values_t!(matches, "interface", InterfaceRecord)?;
        let arp_timeout = value_t!(matches, "arp_timeout", u64)?;
        let sweep_interval = value_t!(matches, "sweep_interval", u64)?;
        let log_level = value_t!(matches, "log_level", Level)?;

        if sweep_interval == 0 {
            return Err(clap::Error::with_description(
                "--sweep-interval must be at least one second",
                clap::ErrorKind::InvalidValue,
            ));
        }

        Ok(RouterConfig {
            interfaces: interfaces.into_iter().collect(),
            cache: CacheConfig::new(
                Duration::from_secs(arp_timeout),
                Duration::from_secs(sweep_interval),
            ),
            log_level,
        })
    }

    /// Parses the process arguments, printing usage and exiting on bad input.
    pub fn from_args() -> Self {
        let matches = app().get_matches();
        RouterConfig::from_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}
