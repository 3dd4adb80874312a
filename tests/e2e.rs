//! End-to-end scenarios driving a real `TcpStream` against a real bound
//! `Server`, per spec.md §8's six literal-I/O scenarios. Mirrors
//! `fuel-vm`'s own `tests/*.rs` layout: integration tests live outside
//! `src/`, colocated as one file per concern.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde_json::Value as Json;

use taskd::executor::Executor;
use taskd::server::Server;

/// Bind on an OS-assigned port and serve forever on a background thread.
/// The thread (and the executor it owns) outlives the test; that's fine
/// for a process-per-test daemon stand-in.
fn spawn_daemon() -> std::net::SocketAddr {
    let server = Server::bind("127.0.0.1", 0).expect("bind");
    let addr = server.local_addr();
    std::thread::spawn(move || {
        let executor = Executor::start();
        server.serve(&executor);
    });
    addr
}

fn send_line(stream: &mut TcpStream, value: &Json) {
    let mut line = serde_json::to_vec(value).unwrap();
    line.push(b'\n');
    stream.write_all(&line).unwrap();
}

fn read_line(reader: &mut BufReader<TcpStream>) -> Option<Json> {
    let mut line = String::new();
    let n = reader.read_line(&mut line).unwrap();
    if n == 0 {
        return None;
    }
    Some(serde_json::from_str(line.trim_end()).unwrap())
}

fn connect(addr: std::net::SocketAddr) -> (TcpStream, BufReader<TcpStream>) {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let reader = BufReader::new(stream.try_clone().unwrap());
    (stream, reader)
}

#[test]
fn handshake_only_then_daemon_keeps_accepting() {
    let addr = spawn_daemon();

    let (mut stream, mut reader) = connect(addr);
    send_line(&mut stream, &serde_json::json!({"hello": "hi", "version": 1}));
    assert_eq!(read_line(&mut reader).unwrap(), serde_json::json!({"status": 0}));
    drop(stream);

    // daemon remains accepting: a second, independent client still works.
    let (mut stream2, mut reader2) = connect(addr);
    send_line(&mut stream2, &serde_json::json!({"hello": "again", "version": 1}));
    assert_eq!(read_line(&mut reader2).unwrap(), serde_json::json!({"status": 0}));
}

#[test]
fn bad_handshake_is_rejected_and_daemon_keeps_accepting() {
    let addr = spawn_daemon();

    let (mut stream, mut reader) = connect(addr);
    send_line(&mut stream, &serde_json::json!({"foo": "bar"}));
    assert_eq!(read_line(&mut reader).unwrap(), serde_json::json!({"status": -1}));
    drop(stream);

    let (mut stream2, mut reader2) = connect(addr);
    send_line(&mut stream2, &serde_json::json!({"hello": "hi", "version": 1}));
    assert_eq!(read_line(&mut reader2).unwrap(), serde_json::json!({"status": 0}));
}

#[test]
fn trivial_recipe_returns_response_with_only_terminal_status() {
    let addr = spawn_daemon();
    let (mut stream, mut reader) = connect(addr);

    send_line(&mut stream, &serde_json::json!({"hello": "hi", "version": 1}));
    assert_eq!(read_line(&mut reader).unwrap(), serde_json::json!({"status": 0}));

    send_line(
        &mut stream,
        &serde_json::json!([{"op": "SM_OP_RETURN", "data": {"value": 7}}]),
    );
    let response = read_line(&mut reader).unwrap();
    assert_eq!(response, serde_json::json!([{"status": 0}]));
}

#[test]
fn load_const_then_report_surfaces_the_register_value() {
    let addr = spawn_daemon();
    let (mut stream, mut reader) = connect(addr);

    send_line(&mut stream, &serde_json::json!({"hello": "hi", "version": 1}));
    read_line(&mut reader).unwrap();

    send_line(
        &mut stream,
        &serde_json::json!([
            {"op": "SM_OP_LOAD_CONST", "data": {"dest": 0, "value": 42}},
            {"op": "SM_OP_REPORT", "data": {"regs": [0]}},
            {"op": "SM_OP_RETURN", "data": {"value": 0}},
        ]),
    );
    let response = read_line(&mut reader).unwrap();
    let array = response.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["0"], 42);
    assert_eq!(array[1], serde_json::json!({"status": 0}));
}

#[test]
fn filesystem_smoke_create_write_read_delete() {
    let addr = spawn_daemon();
    let (mut stream, mut reader) = connect(addr);

    send_line(&mut stream, &serde_json::json!({"hello": "hi", "version": 1}));
    read_line(&mut reader).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().join("sub").to_string_lossy().into_owned();
    let file_path = format!("{dir_path}/f.txt");

    // Registers: 0=dir path, 1="dir" type marker, 2=file path, 3="file"
    // type marker, 4=content, 5="w" write mode, 6=create-result,
    // 7 reused across steps for read-back / the final equality check.
    let recipe = serde_json::json!([
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 0, "value": dir_path}},
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 1, "value": "dir"}},
        {"op": "SM_OP_FS_CREATE", "data": {"dest": 6, "path": 0, "type": 1}},
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 2, "value": file_path}},
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 3, "value": "file"}},
        {"op": "SM_OP_FS_CREATE", "data": {"dest": 6, "path": 2, "type": 3}},
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 4, "value": "hello taskd"}},
        {"op": "SM_OP_LOAD_CONST", "data": {"dest": 5, "value": "w"}},
        {"op": "SM_OP_FS_WRITE", "data": {"dest": 6, "path": 2, "content": 4, "mode": 5}},
        {"op": "SM_OP_FS_READ", "data": {"dest": 7, "path": 2}},
        {"op": "SM_OP_EQ", "data": {"dest": 7, "lhs": 7, "rhs": 4}},
        {"op": "SM_OP_REPORT", "data": {"regs": [7]}},
        {"op": "SM_OP_FS_DELETE", "data": {"dest": 6, "path": 0}},
        {"op": "SM_OP_FS_READ", "data": {"dest": 7, "path": 2}},
        {"op": "SM_OP_EQ", "data": {"dest": 7, "lhs": 7, "rhs": 4}},
        {"op": "SM_OP_REPORT", "data": {"regs": [7]}},
        {"op": "SM_OP_RETURN", "data": {"value": 0}},
    ]);
    send_line(&mut stream, &recipe);

    let response = read_line(&mut reader).unwrap();
    let array = response.as_array().unwrap();
    assert_eq!(array.len(), 3);
    // read-back before deletion matches what was written.
    assert_eq!(array[0]["7"], 1);
    // after FS_DELETE removed the directory, FS_READ fails and reports
    // empty, which no longer equals the written content.
    assert_eq!(array[1]["7"], 0);
    assert_eq!(array[2], serde_json::json!({"status": 0}));
}

#[test]
fn unknown_opcode_is_tolerated_and_execution_continues() {
    let addr = spawn_daemon();
    let (mut stream, mut reader) = connect(addr);

    send_line(&mut stream, &serde_json::json!({"hello": "hi", "version": 1}));
    read_line(&mut reader).unwrap();

    send_line(
        &mut stream,
        &serde_json::json!([
            {"op": "SM_OP_NOPE", "data": {}},
            {"op": "SM_OP_RETURN", "data": {"value": 3}},
        ]),
    );
    let response = read_line(&mut reader).unwrap();
    assert_eq!(response, serde_json::json!([{"status": 0}]));
}
