use crate::config::{Config, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::normalize::{normalize_tree, parse_raw};
use crate::render::{render_svg, write_output_svg};
use crate::scene::build_scene;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mindmap-render",
    version,
    about = "Lay out an AI-generated topic tree as a radial mind map"
)]
pub struct Args {
    /// Raw tree (JSON, JSON5, fenced model output or outline) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for collision repair (overrides the config file)
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Also write a JSON dump of placements and repair outcomes
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Pretty-print scene JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let input = read_input(args.input.as_deref())?;
    let raw = parse_raw(&input);
    let tree = normalize_tree(&raw, &config);
    tracing::debug!(nodes = tree.len(), "normalized tree");
    let layout = compute_layout(tree, &config.layout);
    let exhausted = layout.exhausted();
    if !exhausted.is_empty() {
        tracing::warn!(count = exhausted.len(), "some nodes overlap after collision repair");
    }
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }
    let scene = build_scene(&layout, &config.style, &config.theme);

    match args.output_format {
        OutputFormat::Json => {
            let mut json = if args.pretty {
                scene.to_json_pretty()?
            } else {
                scene.to_json()?
            };
            json.push('\n');
            write_output_text(&json, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let svg = render_svg(&scene, &config.theme);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&scene, &config, args.output.as_deref())?,
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.layout.seed = seed;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

#[cfg(feature = "png")]
fn write_png(scene: &crate::scene::Scene, config: &Config, output: Option<&Path>) -> Result<()> {
    let output = ensure_output(output, "png")?;
    let svg = render_svg(scene, &config.theme);
    crate::render::write_output_png(&svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_scene: &crate::scene::Scene, _config: &Config, _output: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}

fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
