use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Unified input reader that handles both file and pipe input with buffered reading
pub struct InputReader {
    reader: Box<dyn Read>,
    is_pipe: bool,
    len: Option<u64>,
}

impl InputReader {
    /// Create a new InputReader from a path
    /// Use "-" for stdin pipe input
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path = input_path.as_ref();
        let is_pipe = path.to_string_lossy() == "-";

        let (reader, len): (Box<dyn Read>, _) = if is_pipe {
            (Box::new(io::stdin().lock()), None)
        } else {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            let len = file.metadata().ok().map(|m| m.len());
            (Box::new(BufReader::new(file)), len)
        };

        Ok(Self {
            reader,
            is_pipe,
            len,
        })
    }

    #[cfg(test)]
    pub fn from_reader(reader: Box<dyn Read>) -> Self {
        Self {
            reader,
            is_pipe: true,
            len: None,
        }
    }

    /// Read a chunk of data into the provided buffer
    /// Returns the number of bytes read, 0 indicates EOF
    pub fn read_chunk(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let bytes_read = self.reader.read(buffer)?;
        Ok(bytes_read)
    }

    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    /// Size of the source when it is a regular file.
    pub fn len(&self) -> Option<u64> {
        self.len
    }

    /// Reads the whole source into memory, reporting progress on `multi`.
    pub fn read_all(&mut self, multi: Option<&MultiProgress>) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.len.unwrap_or(0) as usize);

        let pb = match multi {
            Some(multi) => Some(multi.add(self.progress_bar()?)),
            None => None,
        };

        self.process_chunks(64 * 1024, |chunk| {
            data.extend_from_slice(chunk);
            if let Some(pb) = &pb {
                pb.inc(chunk.len() as u64);
            }
            Ok(true)
        })?;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(data)
    }

    /// Process data in chunks using a callback function
    /// The callback receives each chunk and should return Ok(true) to continue or Ok(false) to stop
    pub fn process_chunks<F>(&mut self, chunk_size: usize, mut callback: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<bool>,
    {
        let mut buffer = vec![0u8; chunk_size];

        loop {
            let bytes_read = self.read_chunk(&mut buffer)?;
            if bytes_read == 0 {
                break; // EOF
            }

            if !callback(&buffer[..bytes_read])? {
                break;
            }
        }

        Ok(())
    }

    fn progress_bar(&self) -> Result<ProgressBar> {
        let pb = match self.len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
                    )?
                    .progress_chars("#>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(ProgressStyle::with_template(
                    "{spinner:.green} {bytes} read ({bytes_per_sec}) {msg}",
                )?);
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb
            }
        };
        pb.set_message("Reading input...");
        Ok(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_all_spans_chunks() {
        let payload: Vec<u8> = (0..200_000u32).map(|i| i as u8).collect();
        let mut reader = InputReader::from_reader(Box::new(Cursor::new(payload.clone())));

        assert!(reader.is_pipe());
        assert_eq!(reader.read_all(None).unwrap(), payload);
    }

    #[test]
    fn file_length_is_known() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"RIFF").unwrap();

        let mut reader = InputReader::new(file.path()).unwrap();
        assert!(!reader.is_pipe());
        assert_eq!(reader.len(), Some(4));
        assert_eq!(reader.read_all(None).unwrap(), b"RIFF");
    }
}
