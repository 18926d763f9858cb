use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use isbnproc::{BookRecord, Error, ErrorKind, RecordStore, TextDetector};

use eyre::{eyre, Context};
use log::{info, trace};

/// OCR stand-in: the detections for the upload were already written to a text file.
pub struct DetectionsFile {
    path: PathBuf,
}

impl DetectionsFile {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TextDetector for DetectionsFile {
    fn detect_text(&self, bucket: &str, key: &str) -> Result<Vec<String>, Error> {
        trace!(
            "Reading detections for s3://{bucket}/{key} from {}",
            self.path.display()
        );
        read_lines(&self.path).map_err(|e| Error::wrap(ErrorKind::IO, e))
    }
}

fn read_lines(path: &Path) -> eyre::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| eyre!("Cannot read the detections file '{}'", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Persistence stand-in: each put appends one JSON line to `<dir>/<table>.jsonl`.
#[allow(clippy::module_name_repetitions)]
pub struct JsonLinesStore {
    dir: PathBuf,
}

impl JsonLinesStore {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(table).with_extension("jsonl")
    }
}

impl RecordStore for JsonLinesStore {
    fn put(&self, table: &str, record: &BookRecord) -> Result<(), Error> {
        let path = self.table_path(table);
        append_line(&path, record).map_err(|e| Error::wrap(ErrorKind::PersistenceWrite, e))?;
        info!("Object loaded into {}", path.display());
        Ok(())
    }
}

fn append_line(path: &Path, record: &BookRecord) -> eyre::Result<()> {
    let mut line = serde_json::to_vec(record).wrap_err("Cannot serialize the record")?;
    line.push(b'\n');

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open the '{}' file for appending.", path.display()))?
        .write_all(&line)
        .wrap_err_with(|| format!("Cannot write record to '{}'", path.display()))
}

#[cfg(test)]
mod tests {

    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        NamedTempFile, TempDir,
    };

    #[test]
    fn detections_are_read_in_order_without_blank_lines() {
        let file = NamedTempFile::new("detections.txt").unwrap();
        file.write_str("ISBN 978-0-13-468599-1\n\n  Addison-Wesley  \n")
            .unwrap();

        let lines = DetectionsFile::new(file.path().to_owned())
            .detect_text("b", "k")
            .unwrap();

        assert_eq!(vec!["ISBN 978-0-13-468599-1", "Addison-Wesley"], lines);
    }

    #[test]
    fn empty_detections_file_is_no_lines() {
        let file = NamedTempFile::new("detections.txt").unwrap();
        file.write_str("").unwrap();

        let lines = DetectionsFile::new(file.path().to_owned())
            .detect_text("b", "k")
            .unwrap();

        assert!(lines.is_empty());
    }

    #[test]
    fn missing_detections_file_is_io_error() {
        let err = DetectionsFile::new(PathBuf::from("does not exist.txt"))
            .detect_text("b", "k")
            .unwrap_err();

        assert_eq!(ErrorKind::IO, err.kind());
        assert!(
            err.to_string().contains("Cannot read the detections file"),
            "{err}"
        );
    }

    #[test]
    fn puts_are_appended_as_json_lines() {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(dir.path().to_owned());

        let first = BookRecord::unmatched("9780134685991").with_timestamp("2024-05-01T12:00:00Z");
        let second = BookRecord::unmatched("0735619670").with_timestamp("2024-05-02T08:30:00Z");
        store.put("isbn_events", &first).unwrap();
        store.put("isbn_events", &second).unwrap();

        let content = fs::read_to_string(dir.child("isbn_events.jsonl").path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(2, lines.len());
        assert_eq!("9780134685991", lines[0]["isbn"]);
        assert_eq!(1, lines[0]["exception"]);
        assert_eq!("2024-05-02T08:30:00Z", lines[1]["timestamp"]);
    }

    #[test]
    fn unwritable_table_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(dir.path().join("missing"));

        let err = store
            .put("isbn_events", &BookRecord::unmatched("0735619670"))
            .unwrap_err();

        assert_eq!(ErrorKind::PersistenceWrite, err.kind());
    }
}
