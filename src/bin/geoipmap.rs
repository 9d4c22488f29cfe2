mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use cli_utils::{init_logging, GeometryArgs};
use commands::{cmd_match, cmd_project, cmd_validate, MatchOptions};

#[derive(Parser)]
#[command(name = "geoipmap")]
#[command(
    about = "Plot IPv4 addresses on a world map using a geolocated network database",
    long_about = "geoipmap - Resolve IPv4 addresses to map pixel coordinates\n\n\
    Matches every address in an address list against a CSV database of\n\
    'network,lat,lon' rows and projects each matched location onto a map\n\
    image with a Mercator projection bounded by the image's geographic window.\n\n\
    Examples:\n\
      geoipmap match -g data/geoip_ipv4.csv -i data/ips.lst\n\
      geoipmap match -g geoip.csv.gz -i ips.lst --splits 10 --format csv\n\
      geoipmap project 40.4168 -3.7038 -W 2058 -H 1746\n\
      geoipmap validate data/geoip_ipv4.csv"
)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match an address list against a network database and print coordinates
    Match {
        /// File of IPs to plot, one per line ("-" for stdin, .gz supported)
        #[arg(short = 'i', long, default_value = "data/ips.lst")]
        iplist: PathBuf,

        /// CSV database with columns 'network,lat,lon' (.gz supported)
        #[arg(short = 'g', long, default_value = "data/geoip_ipv4.csv")]
        geodb: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,

        /// Scan everything on a single thread (default when no strategy is given)
        #[arg(long)]
        sequential: bool,

        /// Split the database into N slices scanned by N threads
        /// (N <= 1 runs sequentially)
        #[arg(
            short = 'n',
            long,
            value_name = "N",
            allow_negative_numbers = true,
            conflicts_with = "sequential"
        )]
        splits: Option<i64>,

        /// Split the address list across a pool of N worker threads
        /// (N <= 1 runs sequentially)
        #[arg(
            short = 'w',
            long,
            value_name = "N",
            allow_negative_numbers = true,
            conflicts_with_all = ["sequential", "splits"]
        )]
        workers: Option<i64>,

        /// Output format: json (default, NDJSON), csv, text, or summary (statistics only)
        #[arg(long, default_value = "json")]
        format: String,

        /// Show match statistics in stderr
        #[arg(short, long)]
        stats: bool,
    },

    /// Project a single latitude/longitude pair to pixel coordinates
    Project {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Validate a network database file
    Validate {
        /// CSV database with columns 'network,lat,lon' (.gz supported)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Match {
            iplist,
            geodb,
            geometry,
            sequential,
            splits,
            workers,
            format,
            stats,
        } => cmd_match(MatchOptions {
            iplist,
            geodb,
            geometry,
            sequential,
            splits,
            workers,
            format,
            show_stats: stats,
        }),
        Commands::Project { lat, lon, geometry } => cmd_project(lat, lon, geometry),
        Commands::Validate { database, json } => cmd_validate(database, json),
    }
}
