//! Background worker running an import.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::HtmlImport;
use crate::error::ImportError;
use crate::report::{Report, ReportSeverity};
use crate::vfs::Repository;

/// An import running on its own thread.
///
/// Poll [`ImportThread::poll_update`] for progress while it runs, then
/// [`ImportThread::join`] to get the import (and its repository) back.
pub struct ImportThread<R: Repository + 'static> {
    report: Arc<Report>,
    handle: JoinHandle<HtmlImport<R>>,
}

impl<R: Repository + 'static> ImportThread<R> {
    /// Spawn the worker and start the import
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn start(mut import: HtmlImport<R>) -> Result<Self, ImportError> {
        let report = import.report();
        let handle = thread::Builder::new()
            .name("html-import".to_string())
            .spawn(move || {
                import.start_import();
                import
            })?;
        Ok(Self { report, handle })
    }

    #[must_use]
    pub fn report(&self) -> Arc<Report> {
        Arc::clone(&self.report)
    }

    /// Report text written since the previous poll
    pub fn poll_update(&self) -> String {
        self.report.poll_update()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the import to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker panicked; the panic is also written to
    /// the report.
    pub fn join(self) -> Result<HtmlImport<R>, ImportError> {
        self.handle.join().map_err(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Import worker panicked: {message}");
            self.report
                .println(format!("Import aborted: {message}"), ReportSeverity::Error);
            self.report.mark_finished();
            ImportError::Other(format!("import worker panicked: {message}"))
        })
    }
}
