//! Rotating file sink
//!
//! One file per calendar day under `<root>/<YYYY>/<MM>/<DD>.<ext>`. Paths
//! are derived fresh on every write, so rotation is simply the date moving
//! on. The sink never deletes or truncates; pruning old days is left to
//! whatever manages the log root.

use crate::error::{LogError, Result};
use crate::reader::{self, ParsedRecord};
use chrono::{Datelike, NaiveDate};
use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

pub const DEFAULT_EXTENSION: &str = "log";
pub const DEFAULT_FOLDER_MODE: u32 = 0o777;
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// First line of every new file. Record parsers skip it; anything that
/// serves the log root as documents sees a comment rather than records.
pub const GUARD_HEADER: &str = "# daylog record file - not for direct access";

#[derive(Debug)]
pub struct RotatingFileSink {
    root: PathBuf,
    extension: String,
    folder_mode: u32,
    file_mode: u32,
    /// Serializes readiness checks and appends from this process.
    write_lock: Mutex<()>,
}

impl RotatingFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            folder_mode: DEFAULT_FOLDER_MODE,
            file_mode: DEFAULT_FILE_MODE,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_folder_mode(mut self, mode: u32) -> Self {
        self.folder_mode = mode;
        self
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of `date`'s month.
    pub fn dir_for(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir_for(date)
            .join(format!("{:02}.{}", date.day(), self.extension))
    }

    /// Create the month directory and the day file if they are missing.
    ///
    /// Never truncates. Two writers racing here both end up appending to
    /// the same file. The header is appended too, so a record that lands
    /// before it is never overwritten.
    pub fn ensure_ready(&self, date: NaiveDate) -> Result<PathBuf> {
        let dir = self.dir_for(date);
        if !dir.is_dir() {
            self.create_dirs(&dir)?;
        }

        let path = self.path_for(date);
        match OpenOptions::new().append(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(format!("{GUARD_HEADER}\n\n").as_bytes())
                    .and_then(|_| set_mode(&path, self.file_mode))
                    .map_err(|e| LogError::sink(&path, e))?;
                debug!(path = %path.display(), "Created log file");
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(LogError::sink(&path, e)),
        }
        Ok(path)
    }

    /// Append one record line to `date`'s file.
    pub fn append(&self, date: NaiveDate, line: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.ensure_ready(date)?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // One write call on an O_APPEND handle per record.
        OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(buf.as_bytes()))
            .map_err(|e| LogError::sink(&path, e))
    }

    /// All records written on `date`. A day without a file has no records.
    pub fn read_day(&self, date: NaiveDate) -> Result<Vec<ParsedRecord>> {
        let path = self.path_for(date);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(reader::parse_records(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(LogError::sink(&path, e)),
        }
    }

    /// Create `dir` and its missing parents, then chmod the ones we created.
    ///
    /// Modes are applied with an explicit chmod instead of clearing the
    /// process umask, which would race with every other thread creating
    /// files.
    fn create_dirs(&self, dir: &Path) -> Result<()> {
        let mut missing: Vec<&Path> = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .collect();
        missing.reverse();
        self.create_missing(&missing)
    }

    /// Create each of `missing`, outermost first. A directory that appeared
    /// in the meantime belongs to whoever made it and keeps its mode.
    fn create_missing(&self, missing: &[&Path]) -> Result<()> {
        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        builder.mode(self.folder_mode);

        let mut created = 0;
        for dir in missing {
            match builder.create(dir) {
                Ok(()) => {
                    set_mode(dir, self.folder_mode).map_err(|e| LogError::sink(*dir, e))?;
                    created += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
                Err(e) => return Err(LogError::sink(*dir, e)),
            }
        }
        if let Some(dir) = missing.last() {
            debug!(path = %dir.display(), created, "Created log directory");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn path_layout() {
        let sink = RotatingFileSink::new("/var/log/app");
        assert_eq!(
            sink.path_for(date(2024, 3, 7)),
            PathBuf::from("/var/log/app/2024/03/07.log")
        );
        let next = sink.path_for(date(2024, 3, 8));
        assert_eq!(next, PathBuf::from("/var/log/app/2024/03/08.log"));
        assert_eq!(next.parent(), sink.path_for(date(2024, 3, 7)).parent());
    }

    #[test]
    fn extension_dot_is_optional() {
        let sink = RotatingFileSink::new("/logs").with_extension(".txt");
        assert_eq!(sink.path_for(date(2025, 12, 31)), PathBuf::from("/logs/2025/12/31.txt"));
    }

    #[test]
    fn ensure_ready_creates_tree_and_header_once() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::new(tmp.path());
        let day = date(2024, 3, 7);

        let path = sink.ensure_ready(day).unwrap();
        assert!(path.is_file());
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.starts_with(GUARD_HEADER));

        fs::write(&path, format!("{first}INFO - 2024-03-07 10:00:00 --> kept\n")).unwrap();
        sink.ensure_ready(day).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("--> kept\n"));
    }

    #[cfg(unix)]
    #[test]
    fn created_dirs_get_configured_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::new(tmp.path().join("root"))
            .with_folder_mode(0o750)
            .with_file_mode(0o640);
        let path = sink.ensure_ready(date(2024, 1, 2)).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&tmp.path().join("root")), 0o750);
        assert_eq!(mode(&tmp.path().join("root/2024/01")), 0o750);
        assert_eq!(mode(&path), 0o640);
    }

    #[test]
    fn append_adds_lines_and_read_day_parses_them() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::new(tmp.path());
        let day = date(2024, 3, 7);

        sink.append(day, "ERROR - 2024-03-07 09:15:00 --> Cache::flush - disk full").unwrap();
        sink.append(day, "DEBUG - 2024-03-07 09:15:01 --> second").unwrap();

        let records = sink.read_day(day).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].body, "Cache::flush - disk full");
        assert!(sink.read_day(date(2024, 3, 8)).unwrap().is_empty());
    }

    #[test]
    fn sinks_sharing_a_root_never_overwrite_each_other() {
        use std::sync::Barrier;
        const DAYS: i64 = 300;

        let tmp = tempfile::tempdir().unwrap();
        let sinks = [RotatingFileSink::new(tmp.path()), RotatingFileSink::new(tmp.path())];
        let barrier = Barrier::new(sinks.len());
        let first = date(2000, 1, 1);

        std::thread::scope(|s| {
            for (n, sink) in sinks.iter().enumerate() {
                let barrier = &barrier;
                s.spawn(move || {
                    for offset in 0..DAYS {
                        let day = first + chrono::Duration::days(offset);
                        barrier.wait();
                        let line = format!("INFO - 2000-01-01 00:00:00 --> writer {n}");
                        sink.append(day, &line).unwrap();
                    }
                });
            }
        });

        for offset in 0..DAYS {
            let day = first + chrono::Duration::days(offset);
            let contents = fs::read_to_string(sinks[0].path_for(day)).unwrap();
            assert_eq!(contents.matches(GUARD_HEADER).count(), 1, "{contents}");
            let mut bodies: Vec<_> = sinks[0]
                .read_day(day)
                .unwrap()
                .into_iter()
                .map(|r| r.body)
                .collect();
            bodies.sort();
            assert_eq!(bodies, vec!["writer 0", "writer 1"], "day {day}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn directory_created_by_someone_else_keeps_its_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::new(tmp.path()).with_folder_mode(0o750);
        let year = tmp.path().join("2024");
        let month = year.join("05");

        // `year` shows up between the existence check and the create.
        DirBuilder::new().mode(0o700).create(&year).unwrap();
        fs::set_permissions(&year, fs::Permissions::from_mode(0o700)).unwrap();
        sink.create_missing(&[year.as_path(), month.as_path()]).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&year), 0o700);
        assert_eq!(mode(&month), 0o750);
    }

    #[test]
    fn multi_line_records_read_back_whole() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::new(tmp.path());
        let day = date(2024, 3, 7);

        sink.append(day, "DEBUG - 2024-03-07 09:15:00 --> Job::run - [\n\t  1\n\t]").unwrap();
        sink.append(day, "INFO - 2024-03-07 09:15:01 --> next").unwrap();

        let records = sink.read_day(day).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body, "Job::run - [\n  1\n]");
        assert_eq!(records[1].body, "next");
    }

    #[test]
    fn append_reports_unwritable_root() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let sink = RotatingFileSink::new(&blocker);
        let err = sink.append(date(2024, 3, 7), "INFO - x").unwrap_err();
        assert!(matches!(err, LogError::SinkWrite { .. }));
    }
}
