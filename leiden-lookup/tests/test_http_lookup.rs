//! HTTP lookup client against a throwaway local server.
#![cfg(feature = "http")]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use leiden_core::models::VariantCoordinate;
use leiden_core::protein::AminoAcid;
use leiden_lookup::{
    HttpLookupClient, HttpLookupConfig, LookupClient, LookupError, LookupMode, LookupRequest,
    RetryPolicy, Retrying,
};
use pretty_assertions::assert_eq;
use rstest::*;

/// Serve `responses` in order, one per connection. Returns the base URL and
/// a handle yielding the request lines seen.
fn serve(responses: Vec<Option<String>>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/lookup", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            seen.push(request_line.trim().to_string());
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }

            match response {
                Some(body) => {
                    let mut stream = stream;
                    let status = if body.is_empty() { "404 Not Found" } else { "200 OK" };
                    let _ = write!(
                        stream,
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.flush();
                }
                None => {
                    // never answer; hold the connection past the client timeout
                    thread::spawn(move || {
                        thread::sleep(Duration::from_millis(400));
                        drop(stream);
                    });
                }
            }
        }
        seen
    });

    (url, handle)
}

fn request() -> LookupRequest {
    let coordinate = VariantCoordinate::new("11", 5248000, "AC", "A").unwrap();
    LookupRequest::new("ENST00000335295", &coordinate, LookupMode::Frameshift)
}

const ANSWER: &str = r#"{"residue_position": 34, "reference_amino_acid": "Val", "altered_amino_acids": "GX", "next_stop_position": 35}"#;

#[rstest]
fn test_http_answer() {
    let (url, handle) = serve(vec![Some(ANSWER.to_string())]);
    let client = HttpLookupClient::new(HttpLookupConfig::new(&url));

    let answer = client.lookup(&request()).unwrap();
    assert_eq!(answer.residue_position, 34);
    assert_eq!(answer.reference_amino_acid, AminoAcid::Val);
    assert_eq!(answer.altered_amino_acids, vec![AminoAcid::Gly, AminoAcid::Stop]);

    let seen = handle.join().unwrap();
    assert!(seen[0].starts_with("GET /lookup?"));
    for param in ["transcript=ENST00000335295", "chrom=11", "pos=5248000", "ref=AC", "alt=A", "mode=frameshift"] {
        assert!(seen[0].contains(param), "missing {} in {}", param, seen[0]);
    }
}

#[rstest]
fn test_http_not_found_is_no_answer() {
    let (url, handle) = serve(vec![Some(String::new())]);
    let client = HttpLookupClient::new(HttpLookupConfig::new(&url));
    assert!(matches!(client.lookup(&request()), Err(LookupError::NoAnswer(_))));
    handle.join().unwrap();
}

#[rstest]
fn test_http_timeout_then_retry_succeeds() {
    let (url, handle) = serve(vec![None, Some(ANSWER.to_string())]);
    let http = HttpLookupClient::new(
        HttpLookupConfig::new(&url).with_timeout(Duration::from_millis(150)),
    );
    let client = Retrying::new(http, RetryPolicy::immediate(3));

    let answer = client.lookup(&request()).unwrap();
    assert_eq!(answer.next_stop_position, Some(35));
    assert_eq!(handle.join().unwrap().len(), 2);
}
