use crate::error::VcError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};

pub fn get_buf_reader(file_path: &str) -> Result<BufReader<File>, VcError> {
    Ok(BufReader::new(
        File::open(file_path).map_err(|e| VcError::ReadFile(file_path.to_owned(), e.to_string()))?,
    ))
}

/// Buffered csv writer that remembers its path for error reporting.
pub struct VcWriter {
    csv_writer: csv::Writer<BufWriter<File>>,
    file_path: String,
}

impl VcWriter {
    pub fn new(file_path: String, separator: u8, has_headers: bool) -> Result<Self, VcError> {
        let buf_writer = BufWriter::new(
            File::create(&file_path)
                .map_err(|e| VcError::CreateFile(file_path.clone(), e.to_string()))?,
        );
        let csv_writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .has_headers(has_headers)
            .from_writer(buf_writer);
        Ok(Self { csv_writer, file_path })
    }

    #[inline]
    pub fn write_rows<T: Serialize>(
        &mut self,
        rows: impl Iterator<Item = T>,
    ) -> Result<(), VcError> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    #[inline]
    pub fn write_row<T: Serialize>(&mut self, row: T) -> Result<(), VcError> {
        self.csv_writer
            .serialize(row)
            .map_err(|e| VcError::WriteFile(self.file_path.clone(), e.to_string()))
    }

    pub fn finish(mut self) -> Result<(), VcError> {
        self.csv_writer.flush().map_err(|e| VcError::WriteFile(self.file_path, e.to_string()))
    }
}
