//! Progress tracking for artifact downloads

use std::sync::Arc;

/// Progress callback for download operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while an artifact streams to disk
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    DownloadStarted {
        url: String,
        total_size: Option<u64>,
    },
    DownloadProgress {
        url: String,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    },
    DownloadComplete {
        url: String,
        final_size: u64,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_download_started(&self, _url: &str, _total_size: Option<u64>) {}
    fn on_download_progress(&self, _url: &str, _downloaded: u64, _total: Option<u64>, _speed_bps: f64) {}
    fn on_download_complete(&self, _url: &str, _final_size: u64) {}
}

/// Extension trait to convert a ProgressReporter into a ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        let reporter = Arc::new(self);
        Arc::new(move |event| match event {
            ProgressEvent::DownloadStarted { url, total_size } => {
                reporter.on_download_started(&url, total_size)
            }
            ProgressEvent::DownloadProgress { url, downloaded, total, speed_bps } => {
                reporter.on_download_progress(&url, downloaded, total, speed_bps)
            }
            ProgressEvent::DownloadComplete { url, final_size } => {
                reporter.on_download_complete(&url, final_size)
            }
        })
    }
}

/// Reporter that writes one line per event to stderr
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter;

impl ProgressReporter for ConsoleProgressReporter {
    fn on_download_started(&self, url: &str, total_size: Option<u64>) {
        match total_size {
            Some(size) => eprintln!("Downloading {} ({:.1} MB)", url, size as f64 / 1_048_576.0),
            None => eprintln!("Downloading {}", url),
        }
    }

    fn on_download_progress(&self, _url: &str, downloaded: u64, total: Option<u64>, speed_bps: f64) {
        let speed_mb = speed_bps / 1_048_576.0;
        match total {
            Some(total) if total > 0 => {
                let percent = (downloaded as f64 / total as f64) * 100.0;
                eprintln!("  {:.1}% ({:.1} MB/s)", percent, speed_mb);
            }
            _ => eprintln!("  {:.1} MB ({:.1} MB/s)", downloaded as f64 / 1_048_576.0, speed_mb),
        }
    }

    fn on_download_complete(&self, _url: &str, final_size: u64) {
        eprintln!("Done: {} bytes", final_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting {
        completed: Arc<Mutex<Vec<u64>>>,
    }

    impl ProgressReporter for Counting {
        fn on_download_complete(&self, _url: &str, final_size: u64) {
            self.completed.lock().unwrap().push(final_size);
        }
    }

    #[test]
    fn test_reporter_callback_dispatches_by_event() {
        let completed = Arc::new(Mutex::new(Vec::new()));
        let callback = Counting { completed: completed.clone() }.into_callback();

        callback(ProgressEvent::DownloadStarted { url: "u".into(), total_size: None });
        callback(ProgressEvent::DownloadComplete { url: "u".into(), final_size: 42 });

        assert_eq!(*completed.lock().unwrap(), vec![42]);
    }
}
