//! Destination of everything the runtime prints.

use std::cell::RefCell;
use std::io::{self, Write};
use tracing::warn;

thread_local! {
    static CAPTURE: RefCell<Option<Vec<u8>>> = const { RefCell::new(None) };
}

/// Runs `f` with program output redirected into a buffer and returns that
/// buffer alongside the result. Only output produced on the calling thread is
/// captured, which is where JIT-compiled code runs.
pub fn capture_output<R>(f: impl FnOnce() -> R) -> (R, String) {
    let previous = CAPTURE.with(|cell| cell.replace(Some(Vec::new())));
    let result = f();
    let captured = CAPTURE.with(|cell| cell.replace(previous)).unwrap_or_default();

    (result, String::from_utf8_lossy(&captured).into_owned())
}

/// Writes `bytes` to the capture buffer if one is installed, stdout otherwise.
/// Returns the number of bytes written in the C convention.
pub(crate) fn write_output(bytes: &[u8]) -> i32 {
    let captured = CAPTURE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(buffer) => {
            buffer.extend_from_slice(bytes);
            true
        }
        None => false,
    });

    if !captured {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(bytes).and_then(|_| stdout.flush()) {
            warn!("failed to write program output: {}", e);
            return -1;
        }
    }

    i32::try_from(bytes.len()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capture_collects_writes() {
        let (written, output) = capture_output(|| write_output(b"abc") + write_output(b"de"));

        assert_eq!(written, 5);
        assert_eq!(output, "abcde");
    }

    #[test]
    fn test_nested_capture_restores_outer_buffer() {
        let (inner, outer) = capture_output(|| {
            write_output(b"outer ");
            let (_, inner) = capture_output(|| write_output(b"inner"));
            write_output(b"again");
            inner
        });

        assert_eq!(inner, "inner");
        assert_eq!(outer, "outer again");
    }
}
