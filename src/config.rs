//! Configuración del exportador de datos de entrenamiento

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::line_parser::ParseOptions;

/// Formato de los archivos de salida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Un objeto JSON por línea
    #[default]
    Json,
    /// CSV con cabecera
    Csv,
}

/// Parámetros de exportación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Archivos de datos crudos, en orden
    pub input_paths: Vec<PathBuf>,
    /// Exactamente dos salidas: entrenamiento y test
    pub output_paths: Vec<PathBuf>,
    /// Entradas con índice menor van a entrenamiento, el resto a test
    /// (default: la última entrada es test)
    pub train_test_split_index: Option<usize>,
    pub format: OutputFormat,
    /// Omitir líneas mal formadas en lugar de abortar
    pub skip_malformed: bool,
    /// Capacidad del canal entre el hilo lector y el parser
    pub channel_capacity: usize,
    pub parse: ParseOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_paths: Vec::new(),
            output_paths: vec![
                PathBuf::from("TrainingData.json"),
                PathBuf::from("TestData.json"),
            ],
            train_test_split_index: None,
            format: OutputFormat::Json,
            skip_malformed: false,
            channel_capacity: 1024,
            parse: ParseOptions::default(),
        }
    }
}

impl ExportConfig {
    /// Lee la configuración de un archivo JSON sin validarla
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer la configuración {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Configuración inválida en {:?}", path))
    }

    /// Lee y valida la configuración
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.input_paths.is_empty(), "No hay archivos de entrada");
        ensure!(
            self.output_paths.len() == 2,
            "Se esperan 2 archivos de salida (entrenamiento y test), hay {}",
            self.output_paths.len()
        );
        ensure!(
            self.output_paths.iter().all(|p| !p.as_os_str().is_empty()),
            "Ruta de salida vacía"
        );
        if let Some(split) = self.train_test_split_index {
            ensure!(
                split <= self.input_paths.len(),
                "train_test_split_index {} fuera de rango ({} entradas)",
                split,
                self.input_paths.len()
            );
        }
        ensure!(self.parse.averaging_size > 0, "averaging_size debe ser > 0");
        ensure!(self.channel_capacity > 0, "channel_capacity debe ser > 0");
        Ok(())
    }

    /// Índice de la primera entrada que va a test
    pub fn split_index(&self) -> usize {
        self.train_test_split_index
            .unwrap_or_else(|| self.input_paths.len().saturating_sub(1))
    }

    /// Entradas asignadas a la salida `output_idx` (0 = entrenamiento, 1 = test)
    pub fn inputs_for(&self, output_idx: usize) -> &[PathBuf] {
        let split = self.split_index().min(self.input_paths.len());
        match output_idx {
            0 => &self.input_paths[..split],
            1 => &self.input_paths[split..],
            _ => &[],
        }
    }
}
