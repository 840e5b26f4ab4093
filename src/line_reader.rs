use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Una línea cruda con su número (1-based) dentro del archivo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

/// Abre `path` y lanza un hilo que envía sus líneas por un canal acotado.
/// El archivo pertenece al hilo y se cierra cuando este termina.
pub fn spawn_line_reader(
    path: impl AsRef<Path>,
    capacity: usize,
) -> Result<(Receiver<RawLine>, JoinHandle<io::Result<usize>>)> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("No se pudo abrir {:?}", path))?;
    let (tx, rx) = bounded(capacity);

    let handle = thread::spawn(move || read_lines(BufReader::new(file), &tx));
    Ok((rx, handle))
}

/// Envía cada línea no vacía; termina antes si el receptor se cierra.
/// Devuelve el número de líneas enviadas.
pub fn read_lines<R: BufRead>(reader: R, tx: &Sender<RawLine>) -> io::Result<usize> {
    let mut sent = 0;
    for (idx, line) in reader.lines().enumerate() {
        let text = line?;
        if text.trim().is_empty() {
            continue;
        }

        if tx.send(RawLine { number: idx + 1, text }).is_err() {
            break;
        }
        sent += 1;
    }
    Ok(sent)
}
