/*
Exportador de datos de entrenamiento desde capturas de Leap Motion.

Cada línea de entrada contiene uno o más frames terminados en " . " y la
clase (signo) como último carácter. Se escribe un registro de features por
frame: las primeras entradas van a entrenamiento y el resto a test.

Ejemplo:
    ./target/release/leap-features --config export.json
    ./target/release/leap-features -i a.txt -i b.txt -i c.txt --format csv \
        --train-output train.csv --test-output test.csv
*/

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use leap_features::config::{ExportConfig, OutputFormat};
use leap_features::export::Exporter;
use leap_features::TriSpreadPairing;

#[derive(Parser, Debug)]
#[command(name = "leap-features", version, about = "Exporta features de frames de Leap Motion")]
struct Cli {
    /// Archivo de configuración JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Archivo de datos crudos (repetible, sustituye a los de la configuración)
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Salida de entrenamiento
    #[arg(long)]
    train_output: Option<PathBuf>,

    /// Salida de test
    #[arg(long)]
    test_output: Option<PathBuf>,

    /// Índice de la primera entrada que va a test
    #[arg(long)]
    split: Option<usize>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Promediar bloques de frames consecutivos
    #[arg(long)]
    average_frames: bool,

    /// Frames por bloque al promediar
    #[arg(long)]
    averaging_size: Option<usize>,

    /// Pareja de dedos del spread triangular
    #[arg(long, value_enum)]
    tri_spread_pairing: Option<TriSpreadPairing>,

    /// Sustituir el orden de cada dedo por su media en la línea
    #[arg(long)]
    line_order_averaging: bool,

    /// Omitir líneas mal formadas en lugar de abortar
    #[arg(long)]
    skip_malformed: bool,

    /// Logs de depuración
    #[arg(short, long)]
    verbose: bool,
}

fn set_output(paths: &mut Vec<PathBuf>, idx: usize, path: PathBuf) {
    if paths.len() <= idx {
        paths.resize(idx + 1, PathBuf::new());
    }
    paths[idx] = path;
}

fn build_config(cli: Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::read(path)?,
        None => ExportConfig::default(),
    };

    if !cli.inputs.is_empty() {
        config.input_paths = cli.inputs;
    }
    if let Some(path) = cli.train_output {
        set_output(&mut config.output_paths, 0, path);
    }
    if let Some(path) = cli.test_output {
        set_output(&mut config.output_paths, 1, path);
    }
    if cli.split.is_some() {
        config.train_test_split_index = cli.split;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.average_frames {
        config.parse.average_frames = true;
    }
    if let Some(size) = cli.averaging_size {
        config.parse.averaging_size = size;
    }
    if let Some(pairing) = cli.tri_spread_pairing {
        config.parse.tri_spread_pairing = pairing;
    }
    if cli.line_order_averaging {
        config.parse.line_order_averaging = true;
    }
    if cli.skip_malformed {
        config.skip_malformed = true;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = build_config(cli)?;
    let exporter = Exporter::new(config)?;

    let config = exporter.config();
    println!("📂 {} archivos de entrada", config.input_paths.len());
    for (idx, output) in config.output_paths.iter().enumerate() {
        println!("   → {:?}: {} archivos", output, config.inputs_for(idx).len());
    }
    if config.parse.average_frames {
        println!("🧮 Promediando bloques de {} frames", config.parse.averaging_size);
    }

    let start = Instant::now();
    let summary = exporter.run()?;

    println!("\n✅ Exportación terminada en {:.2?}", start.elapsed());
    println!("   Líneas parseadas: {}", summary.lines_parsed);
    if summary.lines_skipped > 0 {
        println!("⚠️  Líneas omitidas: {}", summary.lines_skipped);
    }
    println!(
        "   Registros: {} entrenamiento, {} test",
        summary.records_written[0], summary.records_written[1]
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Result<ExportConfig> {
        let argv = std::iter::once("leap-features").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        build_config(cli)
    }

    #[test]
    fn test_parse_option_overrides() {
        let config = config_from(&[
            "-i",
            "a.txt",
            "--tri-spread-pairing",
            "adjacent",
            "--line-order-averaging",
            "--average-frames",
            "--averaging-size",
            "3",
        ])
        .unwrap();

        assert_eq!(config.parse.tri_spread_pairing, TriSpreadPairing::Adjacent);
        assert!(config.parse.line_order_averaging);
        assert!(config.parse.average_frames);
        assert_eq!(config.parse.averaging_size, 3);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = config_from(&["-i", "a.txt", "-i", "b.txt"]).unwrap();

        assert_eq!(config.parse.tri_spread_pairing, TriSpreadPairing::Legacy);
        assert!(!config.parse.line_order_averaging);
        assert_eq!(config.inputs_for(1), &[PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_unknown_pairing_is_rejected() {
        assert!(config_from(&["-i", "a.txt", "--tri-spread-pairing", "diagonal"]).is_err());
    }
}
