use std::io::Read;

use clap::{ArgAction, Parser};
use kurbo::Vec2;
use tracing_subscriber::EnvFilter;

use mindmap::ast::NodePath;
use mindmap::display_width::MonospaceMeasure;
use mindmap::RenderOptions;

#[derive(Parser)]
#[command(name = "mindmap", about = "Render an indented outline as a collapsible mind-map SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Zoom steps around the center (negative zooms out)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    zoom: f64,

    /// Pan offset in pixels, as `dx,dy`
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pan: Option<Vec2>,

    /// Collapse the node at this path (dotted child indices, e.g. `0.1`)
    #[arg(long)]
    collapse: Vec<NodePath>,

    /// Pixel width of one text column
    #[arg(long, default_value_t = 8.0)]
    char_width: f64,

    /// Pixel height of one label line
    #[arg(long, default_value_t = 18.0)]
    line_height: f64,

    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    debug: u8,
}

fn parse_pan(s: &str) -> Result<Vec2, String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `dx,dy`, got `{s}`"))?;
    let dx: f64 = dx.trim().parse().map_err(|e| format!("bad dx `{dx}`: {e}"))?;
    let dy: f64 = dy.trim().parse().map_err(|e| format!("bad dy `{dy}`: {e}"))?;
    Ok(Vec2::new(dx, dy))
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let input = match cli.file {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let options = RenderOptions {
        measure: MonospaceMeasure {
            char_width: cli.char_width,
            line_height: cli.line_height,
        },
        zoom_steps: cli.zoom,
        pan: cli.pan.unwrap_or(Vec2::ZERO),
        collapse: cli.collapse,
        ..RenderOptions::default()
    };

    print!("{}", mindmap::render_svg(&input, &options));
}
