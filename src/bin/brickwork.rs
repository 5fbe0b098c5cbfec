// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use brickwork::actor::balancer::{Balancer, Event};
use brickwork::actor::channel;
use brickwork::config::{self, Config};
use brickwork::log;
use brickwork::sys::host::Viewport;
use brickwork::sys::memory::MemoryHost;
use brickwork::sys::page::{LoadedPage, Page};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tokio::join;
use tokio::time::sleep;
use tracing::info;

/// Balance items across masonry columns.
#[derive(Parser)]
#[command(version, name = "brickwork")]
struct Cli {
    /// Path to a custom config file.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone)]
enum Command {
    Plan(CmdPlan),
    Simulate(CmdSimulate),
    #[command(subcommand)]
    Config(CmdConfig),
}

/// Prints the initial layout of a page.
#[derive(Parser, Clone)]
struct CmdPlan {
    /// Page document to lay out.
    page: PathBuf,

    /// Print the plan as RON instead of a table.
    #[arg(long)]
    ron: bool,
}

/// Replays a sequence of viewport resizes against a page.
///
/// Resize events go through the same throttle as in a live host, so a fast
/// burst of widths results in a single layout check.
#[derive(Parser, Clone)]
struct CmdSimulate {
    /// Page document to lay out.
    page: PathBuf,

    /// Viewport width to resize to. May be repeated.
    #[arg(long = "resize", value_name = "WIDTH")]
    widths: Vec<f64>,

    /// Time to wait between resize events.
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,
}

/// Commands to manage the config file.
#[derive(Subcommand, Clone)]
enum CmdConfig {
    /// Checks that the config file parses.
    Verify,
    /// Prints the effective config, with defaults filled in.
    Show,
}

fn main() -> Result<(), anyhow::Error> {
    let opt: Cli = Parser::parse();
    let guards = log::init_logging().context("Could not open log file")?;
    info!(log_file = %guards.log_file.display(), "brickwork starting");

    match opt.command {
        Command::Plan(cmd) => plan(&cmd, opt.config.as_deref()),
        Command::Simulate(cmd) => simulate(cmd, opt.config.as_deref()),
        Command::Config(CmdConfig::Verify) => {
            let path = match opt.config.clone().or_else(config::config_path_default) {
                Some(path) => path,
                None => bail!("No config path given and no home directory found"),
            };
            if !path.exists() {
                bail!("Config file {} missing", path.display());
            }
            Config::load(Some(&path))?;
            eprintln!("config ok");
            Ok(())
        }
        Command::Config(CmdConfig::Show) => {
            let config = Config::load(opt.config.as_deref())?;
            print!("{}", toml::to_string(&config)?);
            Ok(())
        }
    }
}

fn load_balancer(page: &Path, config: &Config) -> anyhow::Result<(Balancer<MemoryHost>, Page)> {
    let page = Page::read(page)?;
    let LoadedPage { host, columns, items } = page.load();
    let balancer = Balancer::new(host, columns, items, config)
        .context("Could not lay out page")?;
    Ok((balancer, page))
}

fn plan(cmd: &CmdPlan, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let (balancer, page) = load_balancer(&cmd.page, &config)?;
    let Some(plan) = balancer.plan() else {
        bail!("No layout was committed");
    };
    if cmd.ron {
        println!("{}", ron::ser::to_string_pretty(plan, ron::ser::PrettyConfig::new())?);
    } else {
        print_columns(&balancer, &page);
    }
    Ok(())
}

fn simulate(cmd: CmdSimulate, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let (balancer, page) = load_balancer(&cmd.page, &config)?;
    println!("initial layout at width {}:", page.viewport.width);
    print_columns(&balancer, &page);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let interval = Duration::from_millis(cmd.interval_ms);
    let height = page.viewport.height;
    let balancer = runtime.block_on(async move {
        let (tx, rx) = channel();
        let script = async move {
            for width in cmd.widths {
                tx.send(Event::Resized(Viewport::new(width, height)));
                if !interval.is_zero() {
                    sleep(interval).await;
                }
            }
        };
        let (balancer, ()) = join!(balancer.run(rx), script);
        balancer
    });

    println!();
    println!(
        "after resizing to width {} ({} layout pass(es) in total):",
        balancer.host().viewport().width,
        balancer.passes()
    );
    print_columns(&balancer, &page);
    Ok(())
}

fn print_columns(balancer: &Balancer<MemoryHost>, page: &Page) {
    let host = balancer.host();
    let width = page.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for (key, column) in host.column_keys().into_iter().zip(balancer.columns()) {
        let name = host.column_name(key).unwrap_or("?");
        if !column.active {
            println!("  {name:width$}  hidden");
            continue;
        }
        let children = host.children(key);
        let height: f64 = children
            .iter()
            .filter_map(|child| balancer.items().get(child.0))
            .map(|item| item.height.get())
            .sum();
        println!(
            "  {name:width$}  height {height:>6}  {}",
            children.iter().filter_map(|&child| host.item_name(child)).join(", ")
        );
    }
}
