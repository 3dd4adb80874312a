//! Per-client session: handshake → recipe → run → summary.
//!
//! Mirrors `original_source/taskd.c`'s `main` loop body, minus the
//! daemonization and raw `AF_VSOCK` setup (out of scope per spec.md §1).
//! Framing is newline-delimited JSON (see `DESIGN.md` for why), read with
//! a buffered line reader and written back through the same stream.

use std::io::{BufRead, BufReader, Read, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value as Json;
use tracing::{debug, info};

use crate::error::ConnectionError;
use crate::executor::Executor;
use crate::interpreter::{ReportEvent, ReportSink};
use crate::wire::{parse_handshake, parse_recipe, ResponseBuilder, Status};

fn read_json_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<Json>> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(serde_json::from_str(line.trim_end()).ok())
}

fn write_json_line<W: Write>(writer: &mut W, value: &Json) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line)
}

/// Serve one accepted connection to completion.
pub fn handle_connection<S: Read + Write>(stream: S, executor: &Executor) -> Result<(), ConnectionError> {
    let mut reader = BufReader::new(stream);

    let Some(handshake_json) = read_json_line(&mut reader)? else {
        return Ok(());
    };
    let handshake = parse_handshake(&handshake_json);
    let status = if handshake.is_some() { Status::OK } else { Status::REJECTED };
    write_json_line(reader.get_mut(), &status.to_json())?;

    let Some(handshake) = handshake else {
        return Err(ConnectionError::MalformedHandshake);
    };
    debug!(hello = %handshake.hello, version = handshake.version, "handshake accepted");

    let Some(recipe_json) = read_json_line(&mut reader)? else {
        return Ok(());
    };
    let Some(program) = parse_recipe(&recipe_json) else {
        return Err(ConnectionError::MalformedRecipe);
    };
    info!(instructions = program.len(), "running recipe");

    let collected: Arc<Mutex<Vec<ReportEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_target = Arc::clone(&collected);
    let sink: ReportSink = Box::new(move |event| {
        sink_target.lock().unwrap().push(event);
    });

    let submitted = executor.submit(program, Some(sink));
    let return_value = submitted.wait();
    debug!(return_value, "job completed");

    let events = Arc::try_unwrap(collected)
        .unwrap_or_else(|arc| Mutex::new(arc.lock().unwrap().clone()))
        .into_inner()
        .unwrap();

    let mut builder = ResponseBuilder::new();
    for event in events {
        builder.push(event);
    }
    write_json_line(reader.get_mut(), &builder.finish())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// A `Read + Write` stream over a fixed request buffer, mirroring every
    /// write into a shared, independently inspectable buffer.
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Arc<Mutex<Vec<u8>>>,
    }

    impl MockStream {
        fn new(input: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
            let output = Arc::new(Mutex::new(Vec::new()));
            let stream = MockStream {
                input: Cursor::new(input.as_bytes().to_vec()),
                output: Arc::clone(&output),
            };
            (stream, output)
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.output.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn lines_of(output: &Arc<Mutex<Vec<u8>>>) -> Vec<Json> {
        let bytes = output.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn handshake_only_then_disconnect() {
        let executor = Executor::start();
        let (stream, output) = MockStream::new("{\"hello\":\"hi\",\"version\":1}\n");
        let result = handle_connection(stream, &executor);
        assert!(result.is_ok());
        let lines = lines_of(&output);
        assert_eq!(lines, vec![serde_json::json!({"status": 0})]);
        executor.stop();
    }

    #[test]
    fn bad_handshake_rejected() {
        let executor = Executor::start();
        let (stream, output) = MockStream::new("{\"foo\":\"bar\"}\n");
        let result = handle_connection(stream, &executor);
        assert!(matches!(result, Err(ConnectionError::MalformedHandshake)));
        let lines = lines_of(&output);
        assert_eq!(lines, vec![serde_json::json!({"status": -1})]);
        executor.stop();
    }

    #[test]
    fn trivial_recipe_reports_status_and_runs() {
        let executor = Executor::start();
        let input = "{\"hello\":\"hi\",\"version\":1}\n[{\"op\":\"SM_OP_RETURN\",\"data\":{\"value\":7}}]\n";
        let (stream, output) = MockStream::new(input);
        let result = handle_connection(stream, &executor);
        assert!(result.is_ok());
        let lines = lines_of(&output);
        assert_eq!(lines[0], serde_json::json!({"status": 0}));
        assert_eq!(lines[1], serde_json::json!([{"status": 0}]));
        executor.stop();
    }

    #[test]
    fn recipe_with_reports_includes_them_before_terminal_status() {
        let executor = Executor::start();
        let input = "{\"hello\":\"hi\",\"version\":1}\n\
                     [{\"op\":\"SM_OP_LOAD_CONST\",\"data\":{\"dest\":0,\"value\":9}},\
                     {\"op\":\"SM_OP_REPORT\",\"data\":{\"regs\":[0]}}]\n";
        let (stream, output) = MockStream::new(input);
        let result = handle_connection(stream, &executor);
        assert!(result.is_ok());
        let lines = lines_of(&output);
        assert_eq!(lines[0], serde_json::json!({"status": 0}));
        let response = lines[1].as_array().unwrap();
        assert_eq!(response.len(), 2);
        assert_eq!(response[0]["0"], 9);
        assert_eq!(response[1], serde_json::json!({"status": 0}));
        executor.stop();
    }
}
