use chrono::{TimeZone, Utc};
use logasaurus::{
    HitFormatter, HttpSearchClient, RenderOptions, SearchRequest, SearchRunner, TailConfig,
    TailError, WindowTracker,
};
use pretty_assertions::assert_eq;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Minimal HTTP/1.1 stub that answers each connection with the next body.
fn spawn_backend(bodies: Vec<&'static str>) -> (u16, mpsc::Receiver<SearchRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for body in bodies {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(&mut stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request = vec![0; content_length];
            reader.read_exact(&mut request).unwrap();
            tx.send(serde_json::from_slice(&request).unwrap()).unwrap();

            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
        }
    });

    (port, rx)
}

fn config(port: u16) -> TailConfig {
    TailConfig {
        elasticsearch_url: "127.0.0.1".to_string(),
        elasticsearch_port: port,
        sync_interval: 1,
        count: 50,
        search_host: true,
        ..Default::default()
    }
}

fn no_sleep(_: Duration) {}

fn runner(config: &TailConfig, query: &str) -> SearchRunner<HttpSearchClient, Vec<u8>> {
    let client = HttpSearchClient::new(config.search_url(), Duration::from_secs(5)).unwrap();
    let formatter = HitFormatter::new(config.render_options(), query).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let tracker = WindowTracker::new(
        now,
        config.start_time,
        config.sync_depth,
        config.sync_interval,
    )
    .unwrap();

    SearchRunner::new(client, formatter, tracker, Vec::new(), query, config.count)
        .with_max_polls(config.max_polls)
        .with_sleep(no_sleep)
}

#[test]
fn tails_hits_across_polls() {
    colored::control::set_override(false);
    let (port, requests) = spawn_backend(vec![
        r#"{"hits": {"total": 2, "hits": [
            {"_source": {"message": "error A", "host": "h1"}},
            {"_source": {"message": "ok B", "host": "h2"}}
        ]}}"#,
        r#"{"hits": {"total": 1, "hits": [
            {"_source": {"message": "error C", "host": "h1"}}
        ]}}"#,
    ]);
    let config = TailConfig {
        max_polls: Some(2),
        ..config(port)
    };

    let mut runner = runner(&config, "error");
    runner.run().unwrap();

    let output = String::from_utf8(runner.into_output()).unwrap();
    assert_eq!(output, "h1 error A\nh2 ok B\nh1 error C\n");

    let first = requests.recv().unwrap();
    let second = requests.recv().unwrap();
    let first_window = first.window().unwrap();
    let second_window = second.window().unwrap();

    assert_eq!(first.query_string(), "error");
    assert_eq!(first.size, 50);
    assert_eq!(
        first_window.gte,
        first_window.lte - chrono::Duration::minutes(10)
    );
    assert_eq!(second_window.lte, first_window.lte);
    assert_eq!(
        second_window.gte,
        first_window.lte - chrono::Duration::seconds(1)
    );
}

#[test]
fn highlight_mode_drops_lines_without_the_term() {
    colored::control::set_override(false);
    let (port, _requests) = spawn_backend(vec![
        r#"{"hits": {"hits": [
            {"_source": {"message": "error A ok", "host": "h1"}},
            {"_source": {"message": "nothing matches here", "host": "h2"}}
        ]}}"#,
    ]);
    let config = TailConfig {
        search_host: false,
        highlight: true,
        max_polls: Some(1),
        ..config(port)
    };

    let mut runner = runner(&config, "error");
    runner.run().unwrap();

    let output = String::from_utf8(runner.into_output()).unwrap();
    assert_eq!(output, "error A ok\n");
}

#[test]
fn response_without_hits_stops_the_loop() {
    let (port, _requests) = spawn_backend(vec![r#"{"took": 1, "timed_out": false}"#]);
    let config = TailConfig {
        max_polls: Some(3),
        ..config(port)
    };

    let mut runner = runner(&config, "error");
    assert!(matches!(runner.run(), Err(TailError::MissingHits)));
    assert_eq!(runner.polls(), 1);
    assert!(runner.into_output().is_empty());
}
