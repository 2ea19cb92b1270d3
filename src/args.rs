use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))] // Application name from Cargo metadata.
#[command(author = env!("CARGO_PKG_AUTHORS"))] // Author(s) from Cargo metadata.
#[command(version = env!("CARGO_PKG_VERSION"))] // Version from Cargo metadata.
#[command(
    about = "Bucketed network traffic totals from vnstat over HTTP.",
    long_about = "vnstat-traffic-api: serves yearly, monthly, daily and hourly traffic totals \
    collected by vnstat. Each request names a start date and an optional stop date; the response \
    sums received and transmitted bytes across every interface vnstat tracks, one entry per \
    time bucket."
)]
pub struct Args {
    #[arg(short, long, default_value = "config.toml", help = "Config file")]
    pub config: String,

    #[arg(short, long, default_value = "false", help = "Enable debug mode")]
    pub debug: bool,
}
