use std::io::{self, Write};
use std::sync::Mutex;

use rustyline_async::SharedWriter;
use tracing_subscriber::fmt::MakeWriter;

/// A writer that coordinates with rustyline-async's SharedWriter
/// to ensure logs don't interfere with the readline prompt
#[derive(Clone, Default)]
pub struct LogWriter {
    shared: Option<SharedWriter>,
}

/// Prompt writer of the active chat session, if one is running.
static ACTIVE: Mutex<Option<SharedWriter>> = Mutex::new(None);

/// Writer to install with `fmt().with_writer(...)` at startup. Falls
/// back to stderr whenever no chat session is active.
pub fn stderr_writer() -> LogWriter {
    LogWriter::default()
}

/// Route subsequent log lines through the chat prompt's writer
pub fn attach(writer: SharedWriter) {
    if let Ok(mut guard) = ACTIVE.lock() {
        *guard = Some(writer);
    }
}

/// Return log lines to stderr once the chat session ends
pub fn detach() {
    if let Ok(mut guard) = ACTIVE.lock() {
        *guard = None;
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.shared {
            Some(writer) => writer.write(buf),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.shared {
            Some(writer) => writer.flush(),
            None => io::stderr().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        // Re-check the active session per event so lines emitted mid-chat
        // go through the prompt writer
        let shared = ACTIVE.lock().ok().and_then(|guard| guard.clone());
        LogWriter { shared }
    }
}
