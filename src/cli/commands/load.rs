use clap::{Arg, Command};
use url::Url;

pub const SUBCOMMAND_LOAD: &str = "load";
pub const ARG_URL: &str = "url";
pub const ARG_REQUESTS: &str = "requests";
pub const ARG_CONCURRENCY: &str = "concurrency";

fn parse_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|err| format!("invalid URL: {err}"))?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(format!("unsupported scheme: {}", url.scheme()))
    }
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new(SUBCOMMAND_LOAD)
        .about("Fire keep-alive GET requests at a URL and report the results")
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long("url")
                .help("Target URL, example: http://127.0.0.1:8000/auth?username=matt&password=password")
                .env("LOADTARGET_LOAD_URL")
                .required(true)
                .value_parser(parse_url),
        )
        .arg(
            Arg::new(ARG_REQUESTS)
                .short('n')
                .long("requests")
                .help("Total number of requests")
                .default_value("1000")
                .env("LOADTARGET_LOAD_REQUESTS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_CONCURRENCY)
                .short('c')
                .long("concurrency")
                .help("Concurrent workers sharing one connection pool")
                .default_value("8")
                .env("LOADTARGET_LOAD_CONCURRENCY")
                .value_parser(clap::value_parser!(usize)),
        )
}
