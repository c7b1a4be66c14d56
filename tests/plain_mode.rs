// ABOUTME: Drives the plain-mode loop with in-memory input and output.
// ABOUTME: Covers prompt display, input echo, blank lines, and EOF without a trailing newline.

use monkeyterm::app::{run_plain_loop, spawn_session};
use monkeyterm::config::EvalConfig;
use monkeyterm::session::TranscriptLogger;
use monkeyterm::transcript::PlainSink;

async fn run(input: &str, echo: bool, interactive: bool) -> (String, usize) {
    let session = spawn_session(&EvalConfig::default()).unwrap();
    let mut sink = PlainSink::new(Vec::new(), ">>>", echo);
    let submitted = run_plain_loop(&session, input.as_bytes(), &mut sink, interactive)
        .await
        .unwrap();
    (String::from_utf8(sink.into_inner()).unwrap(), submitted)
}

#[tokio::test]
async fn piped_input_is_echoed_and_evaluated_in_order() {
    let (out, submitted) = run("let x = 4;\nprint(x); x * 2\n", true, false).await;
    assert_eq!(submitted, 2);
    assert_eq!(out, ">>> let x = 4;\nnull\n>>> print(x); x * 2\n4\n8\n");
}

#[tokio::test]
async fn last_line_without_newline_is_still_submitted() {
    let (out, submitted) = run("1 + 1\n2 + 2", false, false).await;
    assert_eq!(submitted, 2);
    assert_eq!(out, "2\n4\n");
}

#[tokio::test]
async fn blank_lines_are_skipped() {
    let (out, submitted) = run("\n   \n7\n", false, false).await;
    assert_eq!(submitted, 1);
    assert_eq!(out, "7\n");
}

#[tokio::test]
async fn interactive_mode_prompts_before_each_read() {
    let (out, _) = run("y\n", false, true).await;
    // One prompt before the line and one more before EOF is seen.
    assert_eq!(out, ">>> ! NameError: name 'y' is not defined\n>>> ");
}

#[tokio::test]
async fn empty_input_submits_nothing() {
    let (out, submitted) = run("", true, false).await;
    assert_eq!(submitted, 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn transcript_log_records_plain_mode_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let logger = TranscriptLogger::new_in_dir(tmp.path()).unwrap();
    let path = logger.path.clone();

    let session = spawn_session(&EvalConfig::default()).unwrap();
    let mut sink = PlainSink::new(Vec::new(), ">>>", false).with_logger(logger);
    run_plain_loop(&session, "1 / 0\n\"ok\"\n".as_bytes(), &mut sink, false)
        .await
        .unwrap();
    drop(sink);

    let records: Vec<serde_json::Value> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = records.iter().map(|r| r["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["input", "output_err", "input", "output_ok"]);
    assert_eq!(records[1]["lines"][0], "ZeroDivisionError: division by zero");
    assert_eq!(records[3]["lines"][0], "ok");
}
