//! Bounded capture of the daemon's stderr stream

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStderr;
use tokio::sync::Mutex;

type LineBuffer = Arc<Mutex<VecDeque<String>>>;

/// Drains a child's stderr into a bounded ring of lines
///
/// The stream must be drained even when nobody wants the output, otherwise a
/// chatty daemon fills the pipe buffer and blocks. Only the newest `cap`
/// lines are retained; a readiness failure snapshots them for the operator.
#[derive(Debug)]
pub struct StderrTail {
    lines: LineBuffer,
}

impl StderrTail {
    /// Start draining `stderr` in a background task, keeping at most `cap` lines
    pub fn capture(stderr: ChildStderr, cap: usize) -> Self {
        let lines: LineBuffer = Arc::new(Mutex::new(VecDeque::new()));
        let buffer = Arc::clone(&lines);

        tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if cap == 0 {
                    continue;
                }
                let mut guard = buffer.lock().await;
                while guard.len() >= cap {
                    guard.pop_front();
                }
                guard.push_back(line);
            }
        });

        Self { lines }
    }

    /// Join the retained lines into one diagnostic string
    pub async fn snapshot(&self) -> String {
        let guard = self.lines.lock().await;
        guard.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}
