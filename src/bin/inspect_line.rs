use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use leap_features::feature_record::FeatureRecord;
use leap_features::line_parser::{LineParser, ParseOptions};

struct InspectOptions {
    line_number: usize,
    averaged: bool,
    dump_json: bool,
}

const USAGE: &str = "Uso: inspect_line [--line N] [--averaged] [--json] <archivo.txt>";

fn parse_args() -> Result<(PathBuf, InspectOptions)> {
    let mut opts = InspectOptions {
        line_number: 1,
        averaged: false,
        dump_json: false,
    };
    let mut path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--averaged" => opts.averaged = true,
            "--json" => opts.dump_json = true,
            "--line" => {
                let value = args.next().ok_or_else(|| anyhow!(USAGE))?;
                opts.line_number = value
                    .parse()
                    .with_context(|| format!("Número de línea inválido: {}", value))?;
            }
            _ => {
                if path.is_some() {
                    bail!(USAGE);
                }
                path = Some(PathBuf::from(arg));
            }
        }
    }

    let path = path.ok_or_else(|| anyhow!("Debes especificar un archivo de datos"))?;
    Ok((path, opts))
}

fn main() -> Result<()> {
    let (path, opts) = parse_args()?;
    println!("🔎 Inspeccionando línea {} de {:?}", opts.line_number, path);

    let content = fs::read_to_string(&path).with_context(|| format!("No se pudo leer {:?}", path))?;
    let line = content
        .lines()
        .nth(opts.line_number.saturating_sub(1))
        .ok_or_else(|| anyhow!("El archivo no tiene la línea {}", opts.line_number))?;

    let parser = LineParser::new(ParseOptions {
        average_frames: opts.averaged,
        ..Default::default()
    });
    let frames = parser.parse(line)?;

    println!("\n🖐️  {} frames, signo '{}'", frames.len(), frames[0].sign);
    println!(
        "   Distancia media: {:.4}  Spread medio: {:.4}  Spread triangular: {:.4}",
        frames[0].average_distance, frames[0].average_spread, frames[0].average_triangular_spread
    );

    for (idx, frame) in frames.iter().enumerate() {
        println!(
            "\nFrame {:>3}: grab {:.3} pinch {:.3} tilt {:.4}",
            idx, frame.palm.grab_strength, frame.palm.pinch_strength, frame.palm.tilt_angle
        );
        for finger in &frame.fingers {
            println!(
                "  dedo {}: orden {:>4.1}  ext {:>9.3}  dip-tip {:>8.3}  ángulo {:.4}",
                finger.index + 1,
                finger.order,
                finger.distance_from_palm_center,
                finger.dip_tip_projection,
                finger.angle
            );
        }

        if opts.dump_json {
            println!("  {}", serde_json::to_string(&FeatureRecord::from(frame))?);
        }
    }

    Ok(())
}
