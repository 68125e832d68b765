//! CLI tool for xlpage - lays out a grid JSON file and outputs instructions
//!
//! Usage:
//!   xlpage_cli <grid.json>                        # Output JSON to stdout
//!   xlpage_cli <grid.json> -o out.json            # Output JSON to file
//!   xlpage_cli <grid.json> --config cfg.json      # Layout configuration
//!   xlpage_cli <grid.json> --region B2:F40        # Override the addressed region
//!   xlpage_cli <grid.json> --flowing              # Flow rows over several pages
//!   xlpage_cli <grid.json> --svg pages/           # Also write one SVG per page
//!
//! Set `RUST_LOG=debug` to see per-render summaries and every degradation.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use xlpage::cell_ref::parse_region;
use xlpage::page_setup::PaginationPolicy;
use xlpage::{GridModel, LayoutConfig, LayoutEngine, RenderBackend, SvgRenderer};

const USAGE: &str = "Usage: xlpage_cli <grid.json> [--config cfg.json] [--region A1:D10] \
                     [--flowing] [--svg out_dir] [-o output.json]";

#[derive(Default)]
struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    region: Option<String>,
    flowing: bool,
    svg_dir: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut input = None;
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next().unwrap_or_else(|| {
                eprintln!("{flag} needs a value\n{USAGE}");
                process::exit(1);
            })
        };
        match arg.as_str() {
            "--config" => args.config = Some(value("--config").into()),
            "--region" => args.region = Some(value("--region")),
            "--svg" => args.svg_dir = Some(value("--svg").into()),
            "-o" => args.output = Some(value("-o").into()),
            "--flowing" => args.flowing = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option {other}\n{USAGE}");
                process::exit(1);
            }
            other => input = Some(PathBuf::from(other)),
        }
    }

    match input {
        Some(path) => args.input = path,
        None => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    }
    args
}

fn read(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = parse_args();

    let grid = match GridModel::from_json(&read(&args.input)) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error parsing grid: {}", e);
            process::exit(1);
        }
    };

    let mut config = match &args.config {
        Some(path) => match LayoutConfig::from_json(&read(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config: {}", e);
                process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };
    if let Some(region) = &args.region {
        match parse_region(region) {
            Ok(r) => config.addressed_region = Some(r),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }
    if args.flowing {
        config.pagination = PaginationPolicy::Flowing;
    }

    let output = match LayoutEngine::new(config).render(&grid) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Layout failed: {}", e);
            process::exit(1);
        }
    };
    log::info!(
        "{} page(s), {} instruction(s), {} diagnostic(s)",
        output.page_count,
        output.instructions.len(),
        output.diagnostics.len()
    );

    if let Some(dir) = &args.svg_dir {
        let pages = match SvgRenderer::new(&grid.images).render(&output) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("SVG rendering failed: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Error creating {}: {}", dir.display(), e);
            process::exit(1);
        }
        for (i, svg) in pages.iter().enumerate() {
            let path = dir.join(format!("page-{}.svg", i + 1));
            if let Err(e) = fs::write(&path, svg) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        eprintln!("Written: {} SVG page(s) to {}", pages.len(), dir.display());
    }

    let json = match output.to_json_pretty() {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Written: {}", path.display());
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
