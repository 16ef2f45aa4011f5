//! Pipeline tests: chunking, pool sizing, submission-order aggregation, failures, end-to-end runs.

use custsift::engine::process_chunk;
use custsift::pipeline::{
    PipelineTuning, Scheduler, aggregate, collect_results, run_pipeline, run_pipeline_with,
};
use custsift::{ChunkFailure, CustOpts, PartitionedResult, RunOutcome, process_customers};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// `n` lines; every third one has a bad phone, every fifth one is short.
fn sample_input(n: usize) -> String {
    let mut s = String::new();
    for i in 0..n {
        let line = if i % 5 == 4 {
            format!("Short{i},Line")
        } else if i % 3 == 2 {
            format!("F{i},L{i},City,ST,{i:05},bad-phone,u{i}@x.com")
        } else {
            format!("F{i},L{i},City,ST,{i:05},212-555-{:04},u{i}@x.com,10.0.0.{}", i % 10_000, i % 256)
        };
        s.push_str(&line);
        s.push('\n');
    }
    s
}

fn tuning(chunk_size: usize, workers: usize) -> PipelineTuning {
    PipelineTuning {
        chunk_size,
        workers,
        export_batch_size: 100_000,
    }
}

fn first_names(c: &custsift::CombinedResult) -> Vec<String> {
    c.valid
        .iter()
        .map(|v| v.0.first_name.clone())
        .chain(c.invalid.iter().map(|i| i.customer.first_name.clone()))
        .collect()
}

fn opts_for(dir: &Path) -> CustOpts {
    CustOpts {
        output_dir: dir.to_path_buf(),
        chunk_size: 7,
        workers: 4,
        export_batch_size: 10,
        no_db: true,
        ..Default::default()
    }
}

#[test]
fn test_record_count_independent_of_pool_size() {
    let input = sample_input(1_003);
    let mut seen = Vec::new();
    for workers in [1, 8] {
        let (combined, stats) =
            collect_results(Cursor::new(input.clone()), &tuning(100, workers), process_chunk, None)
                .unwrap();
        assert_eq!(stats.lines_read, 1_003);
        assert_eq!(stats.chunks, 11);
        assert_eq!(combined.record_count(), 1_003, "workers={workers}");
        assert!(combined.failures.is_empty());
        seen.push((combined.valid.clone(), combined.invalid.clone()));
    }
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn test_last_chunk_may_be_smaller() {
    let (combined, stats) =
        collect_results(Cursor::new(sample_input(10)), &tuning(4, 2), process_chunk, None).unwrap();
    assert_eq!(stats.chunks, 3);
    assert_eq!(combined.record_count(), 10);
}

#[test]
fn test_empty_input_submits_nothing() {
    let (combined, stats) =
        collect_results(Cursor::new(String::new()), &tuning(4, 2), process_chunk, None).unwrap();
    assert_eq!(stats.lines_read, 0);
    assert_eq!(stats.chunks, 0);
    assert_eq!(combined.record_count(), 0);
}

#[test]
fn test_order_kept_when_completion_order_is_scrambled() {
    // Earlier chunks sleep longer so they finish last.
    let input: String = (0..40)
        .map(|i| format!("N{i:02},L,C,S,Z,212-555-0100,a@b.co\n"))
        .collect();
    let slow_first = |lines: &[String]| {
        let idx: u64 = lines[0][1..3].parse().unwrap();
        thread::sleep(Duration::from_millis((40 - idx) * 3));
        process_chunk(lines)
    };
    let (combined, _) =
        collect_results(Cursor::new(input), &tuning(4, 8), slow_first, None).unwrap();
    let expected: Vec<String> = (0..40).map(|i| format!("N{i:02}")).collect();
    assert_eq!(first_names(&combined), expected);
}

#[test]
fn test_scheduler_waits_in_submission_order() {
    let mut scheduler = Scheduler::new(3).unwrap();
    let handles: Vec<_> = (0..6_u64)
        .map(|i| {
            let line = format!("C{i},L,C,S,Z,212-555-0100,a@b.co");
            scheduler.submit(vec![line], move |lines| {
                thread::sleep(Duration::from_millis((6 - i) * 5));
                process_chunk(lines)
            })
        })
        .collect();
    assert_eq!(
        handles.iter().map(|h| h.index()).collect::<Vec<_>>(),
        [0, 1, 2, 3, 4, 5]
    );
    let combined = scheduler.finish(handles);
    let names: Vec<_> = combined.valid.iter().map(|v| v.0.first_name.as_str()).collect();
    assert_eq!(names, ["C0", "C1", "C2", "C3", "C4", "C5"]);
}

#[test]
fn test_in_flight_chunks_never_exceed_workers() {
    let input: String = (0..24)
        .map(|i| format!("N{i:02},L,C,S,Z,212-555-0100,a@b.co\n"))
        .collect();
    for workers in [1, 3] {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (now, max) = (Arc::clone(&in_flight), Arc::clone(&peak));
        let tracked = move |lines: &[String]| {
            let running = now.fetch_add(1, Ordering::SeqCst) + 1;
            max.fetch_max(running, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(15));
            now.fetch_sub(1, Ordering::SeqCst);
            process_chunk(lines)
        };
        let (combined, stats) =
            collect_results(Cursor::new(input.clone()), &tuning(2, workers), tracked, None).unwrap();
        assert_eq!(stats.chunks, 12);
        assert_eq!(combined.record_count(), 24);
        let peak = peak.load(Ordering::SeqCst);
        assert!((1..=workers).contains(&peak), "workers={workers} peak={peak}");
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn test_zero_workers_rejected() {
    assert!(Scheduler::new(0).is_err());
}

#[test]
fn test_panicking_chunk_is_reported_and_rest_kept() {
    let input = sample_input(30);
    let boom = |lines: &[String]| {
        if lines[0].starts_with("F10,") {
            panic!("bad chunk");
        }
        process_chunk(lines)
    };
    let (combined, stats) =
        collect_results(Cursor::new(input), &tuning(10, 4), boom, None).unwrap();
    assert_eq!(stats.chunks, 3);
    assert_eq!(
        combined.failures,
        vec![ChunkFailure {
            index: 1,
            first_line: 11,
            line_count: 10,
            message: "chunk task panicked: bad chunk".to_string(),
        }]
    );
    assert_eq!(combined.record_count(), 20);
    assert_eq!(combined.failed_line_count(), 10);
}

#[test]
fn test_aggregate_unions_sets_and_concatenates_lists() {
    let a = process_chunk(&["A,B,C,D,1,555-0100,a@b.co".to_string()]);
    let b = process_chunk(&[
        "E,F,G,H,2,555-0100,a@b.co".to_string(),
        "I,J,K,L,3,nope,x@y.zz".to_string(),
    ]);
    let combined = aggregate([Ok(a), Ok::<PartitionedResult, ChunkFailure>(b)]);
    assert_eq!(combined.valid.len(), 2);
    assert_eq!(combined.invalid.len(), 1);
    assert_eq!(combined.phones.len(), 1);
    assert_eq!(combined.emails.len(), 1);
}

#[test]
fn test_end_to_end_example() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("customers.txt");
    fs::write(
        &input,
        "Jo,Ann,NY,NY,10001,212-555-0100,jo@x.com\nBa,Lee,LA,CA,90001,bad-phone,bad-email\n",
    )
    .unwrap();
    let out = dir.path().join("out");
    let opts = CustOpts {
        output_dir: out.clone(),
        ..Default::default()
    };

    let report = process_customers(&input, &opts).unwrap();
    assert_eq!(report.outcome(), RunOutcome::Complete);
    assert_eq!((report.valid, report.invalid), (1, 1));
    assert!(report.persisted);
    assert_eq!(
        fs::read_to_string(out.join("valid_customers_1.txt")).unwrap(),
        "Jo,Ann,NY,NY,10001,212-555-0100,jo@x.com,\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("invalid_customers.txt")).unwrap(),
        "Ba,Lee,LA,CA,90001,bad-phone,bad-email,\n"
    );
    assert!(!out.join("valid_customers_2.txt").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("customers.txt");
    fs::write(&input, sample_input(503)).unwrap();
    let out = dir.path().join("out");
    let opts = opts_for(&out);

    let snapshot = |report: &custsift::RunReport| -> Vec<(String, Vec<u8>)> {
        report
            .valid_files
            .iter()
            .chain(report.invalid_file.iter())
            .map(|p| {
                (
                    p.file_name().unwrap().to_string_lossy().into_owned(),
                    fs::read(p).unwrap(),
                )
            })
            .collect()
    };

    let first = run_pipeline(&input, &opts, None).unwrap();
    let a = snapshot(&first);
    let second = run_pipeline(&input, &opts, None).unwrap();
    let b = snapshot(&second);
    assert!(!a.is_empty());
    assert_eq!(a, b);
    assert!(!first.persisted);
}

#[test]
fn test_rerun_with_smaller_input_leaves_no_stale_exports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("customers.txt");
    let out = dir.path().join("out");
    let opts = CustOpts {
        output_dir: out.clone(),
        export_batch_size: 1,
        no_db: true,
        ..Default::default()
    };

    fs::write(
        &input,
        "A,B,C,D,1,212-555-0100,a@x.com\nE,F,G,H,2,212-555-0101,e@x.com\nX,Y,Z,W,3,bad,bad\n",
    )
    .unwrap();
    let first = run_pipeline(&input, &opts, None).unwrap();
    assert_eq!(first.valid_files.len(), 2);
    assert!(first.invalid_file.is_some());

    fs::write(&input, "A,B,C,D,1,212-555-0100,a@x.com\n").unwrap();
    let second = run_pipeline(&input, &opts, None).unwrap();
    assert_eq!(second.invalid_file, None);

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["valid_customers_1.txt"]);
}

#[test]
fn test_run_with_failed_chunk_is_partial() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("customers.txt");
    fs::write(&input, sample_input(21)).unwrap();
    let opts = opts_for(&dir.path().join("out"));
    let boom = |lines: &[String]| {
        if lines[0].starts_with("F7,") {
            panic!("injected");
        }
        process_chunk(lines)
    };

    let report = run_pipeline_with(&input, &opts, None, boom).unwrap();
    assert_eq!(report.outcome(), RunOutcome::Partial);
    assert_eq!(report.chunks, 3);
    assert_eq!(report.failed_lines, 7);
    assert_eq!(report.valid + report.invalid, 14);
    assert_eq!(report.failed_chunks[0].first_line, 8);
}

#[test]
fn test_missing_input_is_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let opts = opts_for(dir.path());
    let err = run_pipeline(&dir.path().join("nope.txt"), &opts, None).unwrap_err();
    assert!(format!("{err:#}").contains("open input"));
}

#[test]
fn test_zero_chunk_size_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CustOpts {
        chunk_size: 0,
        ..opts_for(dir.path())
    };
    assert!(run_pipeline(&dir.path().join("nope.txt"), &opts, None).is_err());
}
