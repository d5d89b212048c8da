use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log files are cut back to their newest half once they reach this size.
pub const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub fn parse_level(raw: &str) -> Level {
    Level::from_str(raw).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", raw);
        Level::INFO
    })
}

pub fn init_logging(level: Level, log_file: Option<&str>) {
    let filter = LevelFilter::from_level(level);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_filter(filter);

    let file_layer = log_file.map(|path| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(CappedFile::maker(PathBuf::from(path), MAX_LOG_FILE_BYTES))
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Append-only log file that keeps only its newest bytes once it grows past
/// `max_len`.
struct CappedFile {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedFile {
    fn maker(path: PathBuf, max_len: u64) -> impl Fn() -> CappedFile + Send + Sync + 'static {
        let lock = Arc::new(Mutex::new(()));
        move || CappedFile {
            path: path.clone(),
            max_len,
            lock: lock.clone(),
        }
    }

    fn shrink_if_full(&self) -> io::Result<()> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_len {
            return Ok(());
        }

        let keep = self.max_len / 2;
        let mut tail = Vec::new();
        {
            let mut file = OpenOptions::new().read(true).open(&self.path)?;
            file.seek(SeekFrom::Start(size.saturating_sub(keep)))?;
            file.read_to_end(&mut tail)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(&tail)
    }
}

impl Write for CappedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.shrink_if_full()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
