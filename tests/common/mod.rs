// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use pangan::dataset::Dataset;
use pangan::models::PriceRecord;
use pangan::state::AppState;
use rust_decimal::Decimal;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

pub fn rec(date: &str, price: i64, name: &str, market: &str) -> PriceRecord {
    PriceRecord::new(date, Decimal::from(price), name, market)
}

/// Two markets, a rising chili, a falling shallot and a steady rice.
pub fn sample_history() -> Vec<PriceRecord> {
    let mut out = Vec::new();
    for day in 1..=8 {
        let date = format!("2025-06-{:02}", day);
        let cabe = if day == 8 { 110 } else { 100 };
        out.push(rec(&date, cabe, "Cabe Merah Lokal", "Pasar Manis"));
        let bawang = if day == 8 { 80 } else { 100 };
        out.push(rec(&date, bawang, "Bawang Merah", "Pasar Subuh"));
        out.push(rec(&date, 13000, "Beras Medium", "Pasar Manis"));
        out.push(rec(&date, 13100, "Beras Medium", "Pasar Subuh"));
    }
    out
}

pub fn sample_state() -> AppState {
    AppState::default().with_dataset(Dataset::from_records(sample_history()))
}

/// Minimal HTTP/1.1 server answering each path with a fixed status and body.
/// Unknown paths get a 404. Runs until the test process exits.
pub fn serve(routes: Vec<(String, u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = routes
                .iter()
                .find(|(p, _, _)| *p == path)
                .map(|(_, s, b)| (*s, b.clone()))
                .unwrap_or((404, "not found".to_string()));
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{}", addr)
}
