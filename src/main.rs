//! formlayout-viz CLI
//!
//! Usage:
//!   formlayout-viz [OPTIONS] [SCRIPT]
//!
//! Options:
//!   -s, --size <WxH>           Container size (default 400x300)
//!       --stylesheet <FILE>    Stylesheet file for the color palette (TOML format)
//!       --hide <CATEGORIES>    Marker categories to hide, comma separated
//!   -p, --pointer <X,Y>        Pointer position highlighting an anchor
//!   -i, --info                 Print the highlighted anchor's info instead of SVG
//!   -d, --debug                Log layout passes to stderr
//!   -h, --help                 Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use formlayout_viz::layout::{Point, Size};
use formlayout_viz::{AnchorCategory, RenderConfig, Stylesheet, SvgConfig};

#[derive(Parser)]
#[command(name = "formlayout-viz")]
#[command(about = "Lay out a form script and draw its anchors as SVG")]
struct Cli {
    /// Layout script (reads from stdin if not provided)
    script: Option<PathBuf>,

    /// Container size as WIDTHxHEIGHT
    #[arg(short, long, value_parser = parse_size, default_value = "400x300")]
    size: Size,

    /// Stylesheet file for color palette (TOML format)
    #[arg(long)]
    stylesheet: Option<PathBuf>,

    /// Marker categories to hide: border, margin, autosize, fixed
    #[arg(long, value_delimiter = ',')]
    hide: Vec<AnchorCategory>,

    /// Pointer position as X,Y; the anchor under it is highlighted
    #[arg(short, long, value_parser = parse_point)]
    pointer: Option<Point>,

    /// Print the highlighted anchor's information instead of SVG
    #[arg(short, long)]
    info: bool,

    /// Use the alternate background color
    #[arg(long)]
    alternate_background: bool,

    /// Log layout passes and diagram rebuilds to stderr
    #[arg(short, long)]
    debug: bool,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (width, height) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = width.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let height = height.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok(Size::new(width, height))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {}", e))?;
    Ok(Point::new(x, y))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // If no script file and stdin is a terminal (interactive), show usage
    if cli.script.is_none() && io::stdin().is_terminal() {
        print_intro();
        return ExitCode::SUCCESS;
    }

    // Load stylesheet
    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Stylesheet::default(),
    };

    // Read input
    let (source, filename) = match &cli.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let mut config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_svg(SvgConfig::default().with_alternate_background(cli.alternate_background))
        .with_size(cli.size.width, cli.size.height);
    for category in &cli.hide {
        config = config.hide(*category);
    }

    let mut visualizer = config.visualizer();
    let result = visualizer.update(&source);
    if let Some(point) = cli.pointer {
        visualizer.pointer_moved(point);
    }

    if cli.info {
        println!("{}", visualizer.info());
    } else {
        // An error is drawn in place of the diagram
        println!("{}", visualizer.render_svg());
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            ExitCode::FAILURE
        }
    }
}

fn print_intro() {
    println!(
        r#"formlayout-viz - anchor layout visualizer

USAGE:
    formlayout-viz [OPTIONS] [SCRIPT]
    echo '<script>' | formlayout-viz

OPTIONS:
    -s, --size WxH          Container size (default 400x300)
    --stylesheet FILE       Custom color palette (TOML file)
    --hide CATEGORIES       Hide border, margin, autosize and/or fixed markers
    -p, --pointer X,Y       Highlight the anchor under the pointer
    -i, --info              Print the highlighted anchor's info
    -d, --debug             Log layout passes to stderr
    -h, --help              Print help

SCRIPT:
    margins 10 10 10 10                 -- inset of the margin anchors
    gap 5 5                             -- column and row gaps
    let a = anchor(left_margin, 40)     -- fixed offset from another anchor
    let b = anchor(a)                   -- auto-size anchor following a
    let c = anchor(vertical, 25)        -- absolute position
    relate a to col_right(0) + 5        -- change an anchor's relation
    absolute c 30
    autosize b off
    stub "Name" (60, 20) at cell(0, 0)
    stub at cells(1, 0, -1, 0)
    stub #204a87 at (row_top(1), a, null, right_margin)

QUICK START:
    echo 'stub "OK" at cell(0, 0)' | formlayout-viz -p 70,20 > output.svg"#
    );
}
