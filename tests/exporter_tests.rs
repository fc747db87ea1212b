// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{rec, sample_state};
use pangan::{cli, commands::exporter};
use tempfile::tempdir;

fn run_export(args: &[&str]) -> anyhow::Result<()> {
    let state = sample_state();
    let mut argv = vec!["pangan", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&state, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_has_header_plus_one_line_per_record() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("cabe.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&["cabe", "--format", "csv", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 8 + 1);
    assert_eq!(lines[0], "date,price,commodity");
    assert_eq!(lines[1], "2025-06-01,100,cabe");
    assert!(!contents.ends_with("\n\n"));
}

#[test]
fn csv_respects_market_filter() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("beras.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&["Beras Medium", "--market", "subuh", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.lines().count(), 9);
    assert!(contents.lines().skip(1).all(|l| l.contains(",13100,")));
}

#[test]
fn history_csv_quotes_commas() {
    let r = rec("2025-06-01", 2500, "Tahu, Putih", "Pasar Manis");
    let body = exporter::history_csv(&[&r], "Tahu, Putih").unwrap();
    assert_eq!(body, "date,price,commodity\n2025-06-01,2500,\"Tahu, Putih\"\n");
}

#[test]
fn unknown_format_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("cabe.xml");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&["cabe", "--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn unknown_commodity_is_an_error() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("none.csv");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&["durian", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

/// `points` attributes of every `<polyline>` in an SVG document.
fn polyline_point_counts(svg: &str) -> Vec<usize> {
    svg.split("<polyline")
        .skip(1)
        .filter_map(|el| {
            let start = el.find("points=\"")? + "points=\"".len();
            let end = el[start..].find('"')?;
            Some(el[start..start + end].split_whitespace().count())
        })
        .collect()
}

#[test]
fn svg_draws_one_line_per_market() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("beras.svg");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&["beras", "--format", "svg", "--out", &out_str]).unwrap();

    let svg = std::fs::read_to_string(&out_path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Pasar Manis"));
    assert!(svg.contains("Pasar Subuh"));
    // Eight days of prices in each of the two markets.
    let full_lines = polyline_point_counts(&svg).into_iter().filter(|n| *n == 8).count();
    assert_eq!(full_lines, 2);
}

#[test]
fn png_export_writes_an_image() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("beras.png");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&[
        "beras", "--format", "png", "--out", &out_str, "--width", "640", "--height", "320",
    ])
    .unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.len() > 8);
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
