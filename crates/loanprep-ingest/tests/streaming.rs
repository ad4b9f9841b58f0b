//! Tests for sample-then-batches reading of a source file.

use std::fs;
use std::path::PathBuf;

use polars::prelude::AnyValue;

use loanprep_ingest::{BatchReader, CsvSink, StreamingOptions, read_sample};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("loanprep_streaming_{stamp}_{name}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_file(path);
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

fn numbered_source(rows: usize) -> String {
    let mut contents = String::from("ID,Purpose\n");
    for i in 1..=rows {
        contents.push_str(&format!("{i},purpose {}\n", i % 4));
    }
    contents
}

fn first_id(batch: &polars::prelude::DataFrame) -> String {
    match batch.column("id").unwrap().get(0).unwrap() {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn sample_and_remaining_batches_cover_every_record_once() {
    let path = temp_file("cover.csv", &numbered_source(25));
    let options = StreamingOptions::default()
        .with_sample_size(10)
        .with_chunk_size(4);

    let sample = read_sample(&path, &options).expect("read sample");
    assert_eq!(sample.height(), 10);

    let mut reader = BatchReader::open(&path, &options).expect("open reader");
    assert_eq!(reader.skip_records(options.sample_size).unwrap(), 10);

    let mut heights = Vec::new();
    let mut first_ids = Vec::new();
    while let Some(batch) = reader.next_batch().expect("read batch") {
        heights.push(batch.height());
        first_ids.push(first_id(&batch));
    }

    assert_eq!(heights, vec![4, 4, 4, 3]);
    assert_eq!(first_ids, vec!["11", "15", "19", "23"]);
    assert_eq!(reader.records_read(), 25);

    cleanup(&path);
}

#[test]
fn sample_larger_than_file_leaves_nothing_to_batch() {
    let path = temp_file("small.csv", &numbered_source(5));
    let options = StreamingOptions::default()
        .with_sample_size(100)
        .with_chunk_size(2);

    let sample = read_sample(&path, &options).expect("read sample");
    assert_eq!(sample.height(), 5);

    let mut reader = BatchReader::open(&path, &options).expect("open reader");
    assert_eq!(reader.skip_records(options.sample_size).unwrap(), 5);
    assert!(reader.next_batch().unwrap().is_none());

    cleanup(&path);
}

#[test]
fn quoted_fields_count_as_one_record() {
    let contents = "id,desc\n1,\"car, used\"\n2,\"multi\nline\"\n3,plain\n";
    let path = temp_file("quoted.csv", contents);
    let options = StreamingOptions::default()
        .with_sample_size(1)
        .with_chunk_size(10);

    let mut reader = BatchReader::open(&path, &options).expect("open reader");
    reader.skip_records(1).unwrap();
    let batch = reader.next_batch().unwrap().expect("one batch");
    assert_eq!(batch.height(), 2);
    assert_eq!(first_id(&batch), "2");

    cleanup(&path);
}

#[test]
fn sink_round_trips_through_reader() {
    let path = temp_file("source.csv", &numbered_source(3));
    let options = StreamingOptions::default();
    let sample = read_sample(&path, &options).expect("read sample");

    let out = path.with_file_name("copy.csv");
    let header: Vec<String> = sample
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let mut sink = CsvSink::create(&out, &header).expect("create sink");
    sink.append(&sample).expect("append");
    assert_eq!(sink.finish().expect("finish"), 3);

    let written = fs::read_to_string(&out).expect("read output");
    assert_eq!(
        written,
        "id,purpose\n1,purpose 1\n2,purpose 2\n3,purpose 3\n"
    );

    let _ = fs::remove_file(&out);
    cleanup(&path);
}
