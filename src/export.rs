//! Exportación de archivos crudos a datos de entrenamiento y test

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::config::{ExportConfig, OutputFormat};
use crate::feature_record::FeatureRecord;
use crate::line_parser::LineParser;
use crate::line_reader::{spawn_line_reader, RawLine};

/// Escritor de registros en JSON por líneas o CSV
pub enum RecordWriter<W: Write> {
    Json(W),
    Csv(csv::Writer<W>),
}

impl<W: Write> RecordWriter<W> {
    /// Crea el escritor; en CSV escribe la cabecera
    pub fn new(inner: W, format: OutputFormat) -> Result<Self> {
        match format {
            OutputFormat::Json => Ok(RecordWriter::Json(inner)),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(inner);
                writer.write_record(FeatureRecord::header())?;
                Ok(RecordWriter::Csv(writer))
            }
        }
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<()> {
        match self {
            RecordWriter::Json(inner) => {
                serde_json::to_writer(&mut *inner, record)?;
                inner.write_all(b"\n")?;
            }
            RecordWriter::Csv(writer) => writer.write_record(record.to_row())?,
        }
        Ok(())
    }

    /// Vacía el buffer y devuelve el escritor interno
    pub fn finish(self) -> Result<W> {
        match self {
            RecordWriter::Json(mut inner) => {
                inner.flush()?;
                Ok(inner)
            }
            RecordWriter::Csv(writer) => writer
                .into_inner()
                .map_err(|e| anyhow!("No se pudo vaciar el CSV: {}", e.error())),
        }
    }
}

/// Resultado de una exportación
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub lines_parsed: usize,
    pub lines_skipped: usize,
    /// Registros escritos por salida: [entrenamiento, test]
    pub records_written: [usize; 2],
}

pub struct Exporter {
    config: ExportConfig,
    parser: LineParser,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let parser = LineParser::new(config.parse);
        Ok(Self { config, parser })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Parsea todas las entradas y escribe las salidas de entrenamiento y test
    pub fn run(&self) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();

        for (output_idx, output_path) in self.config.output_paths.iter().enumerate() {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("No se pudo crear el directorio {:?}", parent))?;
            }
            let file = File::create(output_path)
                .with_context(|| format!("No se pudo crear {:?}", output_path))?;
            let mut writer = RecordWriter::new(BufWriter::new(file), self.config.format)?;

            for input in self.config.inputs_for(output_idx) {
                let written = self.export_file(input, &mut writer, &mut summary)?;
                summary.records_written[output_idx] += written;
            }

            writer
                .finish()
                .with_context(|| format!("Error al escribir {:?}", output_path))?;
            info!(
                output = ?output_path,
                records = summary.records_written[output_idx],
                "salida escrita"
            );
        }

        Ok(summary)
    }

    /// Lee un archivo en un hilo aparte y escribe sus registros
    fn export_file<W: Write>(
        &self,
        path: &Path,
        writer: &mut RecordWriter<W>,
        summary: &mut ExportSummary,
    ) -> Result<usize> {
        let (rx, handle) = spawn_line_reader(path, self.config.channel_capacity)?;
        let written = self.export_lines(path, rx.iter(), writer, summary)?;

        let lines_read = handle
            .join()
            .map_err(|_| anyhow!("El hilo lector de {:?} terminó con pánico", path))?
            .with_context(|| format!("Error leyendo {:?}", path))?;
        debug!(path = ?path, lines_read, written, "archivo exportado");

        Ok(written)
    }

    /// Parsea cada línea y escribe un registro por frame.
    /// Devuelve el número de registros escritos.
    pub fn export_lines<W: Write>(
        &self,
        source: &Path,
        lines: impl IntoIterator<Item = RawLine>,
        writer: &mut RecordWriter<W>,
        summary: &mut ExportSummary,
    ) -> Result<usize> {
        let mut written = 0;

        for line in lines {
            let frames = match self.parser.parse(&line.text) {
                Ok(frames) => frames,
                Err(e) if self.config.skip_malformed => {
                    warn!(source = ?source, line = line.number, error = %e, "línea omitida");
                    summary.lines_skipped += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Línea {} inválida en {:?}", line.number, source)
                    });
                }
            };

            for frame in &frames {
                writer.write(&FeatureRecord::from(frame))?;
                written += 1;
            }
            summary.lines_parsed += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_parser::ParseOptions;
    use crate::test_support::moving_line;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn raw(number: usize, text: String) -> RawLine {
        RawLine { number, text }
    }

    fn exporter(skip_malformed: bool, parse: ParseOptions) -> Exporter {
        Exporter::new(ExportConfig {
            input_paths: vec![PathBuf::from("unused.txt")],
            skip_malformed,
            parse,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_json_lines_one_per_frame() {
        let exporter = exporter(false, ParseOptions::default());
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json).unwrap();
        let mut summary = ExportSummary::default();

        let lines = vec![raw(1, moving_line(3, 1.0, 'A')), raw(2, moving_line(2, 1.0, 'B'))];
        let written = exporter
            .export_lines(Path::new("mem"), lines, &mut writer, &mut summary)
            .unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(written, 5);
        assert_eq!(rows.len(), 5);
        assert!(rows[0].ends_with("\"Sign\":\"A\"}"));
        assert!(rows[4].ends_with("\"Sign\":\"B\"}"));
        assert_eq!(summary.lines_parsed, 2);
    }

    #[test]
    fn test_averaged_export() {
        let options = ParseOptions {
            average_frames: true,
            ..Default::default()
        };
        let exporter = exporter(false, options);
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json).unwrap();
        let mut summary = ExportSummary::default();

        let written = exporter
            .export_lines(
                Path::new("mem"),
                vec![raw(1, moving_line(12, 1.0, 'A'))],
                &mut writer,
                &mut summary,
            )
            .unwrap();
        assert_eq!(written, 3);
    }

    #[test]
    fn test_malformed_line_aborts_or_skips() {
        let lines = || vec![raw(1, moving_line(1, 0.0, 'A')), raw(2, "basura".to_string())];

        let strict = exporter(false, ParseOptions::default());
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json).unwrap();
        let err = strict
            .export_lines(Path::new("mem"), lines(), &mut writer, &mut ExportSummary::default())
            .unwrap_err();
        assert!(err.to_string().contains("Línea 2"));

        let lenient = exporter(true, ParseOptions::default());
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json).unwrap();
        let mut summary = ExportSummary::default();
        let written = lenient
            .export_lines(Path::new("mem"), lines(), &mut writer, &mut summary)
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(summary.lines_skipped, 1);
    }

    #[test]
    fn test_csv_writer_header_and_rows() {
        let exporter = exporter(false, ParseOptions::default());
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Csv).unwrap();
        exporter
            .export_lines(
                Path::new("mem"),
                vec![raw(1, moving_line(2, 1.0, 'C'))],
                &mut writer,
                &mut ExportSummary::default(),
            )
            .unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 26);
        assert_eq!(&headers[25], "Sign");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][25], "C");
    }

    #[test]
    fn test_run_splits_train_and_test() {
        let dir = TempDir::new().unwrap();
        let inputs: Vec<PathBuf> = ['A', 'B', 'C']
            .iter()
            .enumerate()
            .map(|(i, &sign)| {
                let path = dir.path().join(format!("datos{}.txt", i));
                let content = format!(
                    "{}\n{}\n",
                    moving_line(2, 1.0, sign),
                    moving_line(1, 0.0, sign)
                );
                fs::write(&path, content).unwrap();
                path
            })
            .collect();

        let config = ExportConfig {
            input_paths: inputs,
            output_paths: vec![
                dir.path().join("out").join("TrainingData.json"),
                dir.path().join("out").join("TestData.json"),
            ],
            ..Default::default()
        };
        let summary = Exporter::new(config.clone()).unwrap().run().unwrap();

        assert_eq!(summary.lines_parsed, 6);
        assert_eq!(summary.records_written, [6, 3]);

        let train = fs::read_to_string(&config.output_paths[0]).unwrap();
        let test = fs::read_to_string(&config.output_paths[1]).unwrap();
        assert_eq!(train.lines().count(), 6);
        assert!(test.lines().all(|l| l.ends_with("\"Sign\":\"C\"}")));
    }
}
