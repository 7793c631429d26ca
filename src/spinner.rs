//! Activity indicator shown on stderr while a request is in flight.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);
const CLEAR_LINE: &str = "\r\x1b[2K";

pub struct Spinner {
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Spinner {
    #[must_use]
    pub fn start() -> Self {
        Self::start_with(io::stderr())
    }

    pub fn start_with<W>(mut writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread = thread::spawn({
            let stop_flag = Arc::clone(&stop_flag);
            move || {
                let mut frame = 0;
                while !stop_flag.load(Ordering::SeqCst) {
                    let _ = write!(writer, "\r{}", SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]);
                    let _ = writer.flush();
                    frame += 1;
                    thread::sleep(FRAME_INTERVAL);
                }
                let _ = write!(writer, "{CLEAR_LINE}");
                let _ = writer.flush();
            }
        });

        Self {
            stop_flag,
            thread: Some(thread),
        }
    }

    /// Stops the animation, clears its line and waits for the thread.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
