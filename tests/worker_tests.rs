mod common;

use std::sync::Arc;

use common::{ChatCall, FakeChat, FakeSummaries, bot_with, fast_poll};
use wordcab_slack::core::models::{MessageRef, SharedFile, SourceKind, SummarySource};
use wordcab_slack::core::params::parse_params;
use wordcab_slack::core::status::JobStatus;
use wordcab_slack::worker::{DispatchOutcome, dispatch, finish_job, poll_job};

fn message() -> MessageRef {
    MessageRef::new("C0123", "1700000000.000100")
}

fn audio_file() -> SharedFile {
    SharedFile {
        id: "F1".to_string(),
        name: "standup.mp3".to_string(),
        url: "https://files.slack.com/files-pri/T1-F1/download/standup.mp3".to_string(),
    }
}

#[tokio::test]
async fn test_dispatch_failure_adds_one_error_reaction_and_no_job() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::rejecting());
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    let outcome = dispatch(&bot, &message(), parse_params("2 brief"), &[audio_file()]).await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(chat.added("x"), 1);
    assert_eq!(chat.current_reactions(), vec!["x".to_string()]);
    assert_eq!(chat.posts().len(), 1);
    assert!(chat.posts()[0].contains("Invalid API key"));
    assert_eq!(bot.registry().active_jobs().await, 0);
    assert!(!bot.registry().is_claimed(&message()).await);
}

#[tokio::test]
async fn test_unsupported_file_is_rejected_before_submission() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::default());
    let bot = bot_with(&chat, &summaries, fast_poll(3));
    let pdf = SharedFile {
        name: "slides.pdf".to_string(),
        ..audio_file()
    };

    let outcome = dispatch(&bot, &message(), parse_params(""), &[pdf]).await;

    match outcome {
        DispatchOutcome::Failed(text) => {
            assert!(text.starts_with("Invalid file extension: `.pdf`"));
            assert!(text.contains("`.mp3`"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(summaries.submitted().is_empty());
    assert_eq!(chat.added("x"), 1);
}

#[tokio::test]
async fn test_job_runs_from_pending_to_done_and_relays_files() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_statuses(&[
        "Pending",
        "Transcribing",
        "Summarizing",
        "SummaryComplete",
    ]));
    let bot = bot_with(&chat, &summaries, fast_poll(10));

    let outcome = dispatch(&bot, &message(), parse_params("1,3 fr"), &[audio_file()]).await;
    assert_eq!(outcome, DispatchOutcome::Started("job_abc".to_string()));
    assert!(chat.current_reactions().contains(&"hourglass_flowing_sand".to_string()));
    assert!(chat.current_reactions().contains(&"one".to_string()));

    let status = poll_job(&bot, "job_abc").await;

    assert_eq!(status, JobStatus::Done);
    assert_eq!(
        chat.uploads(),
        vec![
            "narrative_1_sum_123.txt".to_string(),
            "narrative_3_sum_123.txt".to_string()
        ]
    );
    assert_eq!(
        chat.current_reactions(),
        vec!["flag-us".to_string(), "white_check_mark".to_string()]
    );
    assert_eq!(chat.added("white_check_mark"), 1);
    assert_eq!(chat.added("three"), 1);
    assert_eq!(chat.added("five"), 1);
    assert!(chat.posts().is_empty());
    assert_eq!(summaries.deleted(), vec!["job_abc".to_string()]);
    assert_eq!(summaries.status_queries(), 4);
    assert_eq!(bot.registry().active_jobs().await, 0);
    assert!(!bot.registry().is_claimed(&message()).await);

    let submitted = summaries.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(matches!(
        submitted[0].source,
        SummarySource::File {
            kind: SourceKind::Audio,
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_ephemeral_job_is_kept() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_statuses(&["SummaryComplete"]));
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    let params = parse_params("transcript_id:generic_transcript_ABC ephemeral:false");
    let outcome = dispatch(&bot, &message(), params, &[]).await;
    assert!(matches!(outcome, DispatchOutcome::Started(_)));

    assert_eq!(poll_job(&bot, "job_abc").await, JobStatus::Done);
    assert!(summaries.deleted().is_empty());
    assert_eq!(chat.uploads().len(), 2);
}

#[tokio::test]
async fn test_poll_timeout_ends_in_error() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_statuses(&["Transcribing"]));
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    let status = poll_job(&bot, "job_abc").await;

    assert_eq!(status, JobStatus::Error);
    assert_eq!(summaries.status_queries(), 3);
    assert_eq!(
        chat.current_reactions(),
        vec!["flag-us".to_string(), "x".to_string()]
    );
    assert_eq!(chat.posts().len(), 1);
    assert!(chat.posts()[0].contains("timed out"));
    assert!(chat.uploads().is_empty());
    assert_eq!(bot.registry().active_jobs().await, 0);
}

#[tokio::test]
async fn test_remote_error_status_ends_in_error() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_statuses(&["PreparingTranscript", "Error"]));
    let bot = bot_with(&chat, &summaries, fast_poll(10));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    assert_eq!(poll_job(&bot, "job_abc").await, JobStatus::Error);

    assert_eq!(chat.added("x"), 1);
    assert_eq!(chat.added("two"), 1);
    assert!(chat.posts()[0].contains("Error"));
    assert!(summaries.deleted().is_empty());
}

#[tokio::test]
async fn test_duplicate_event_does_not_start_second_job() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::default());
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    let first = dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    let second = dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;

    assert!(matches!(first, DispatchOutcome::Started(_)));
    assert_eq!(second, DispatchOutcome::Duplicate);
    assert_eq!(summaries.submitted().len(), 1);
    assert_eq!(bot.registry().active_jobs().await, 1);
}

#[tokio::test]
async fn test_terminal_status_is_reflected_once() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::default());
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    assert_eq!(finish_job(&bot, "job_abc", Ok(())).await, JobStatus::Done);
    finish_job(&bot, "job_abc", Ok(())).await;

    assert_eq!(chat.added("white_check_mark"), 1);
}

#[tokio::test]
async fn test_failed_message_is_not_dispatched_again() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::rejecting());
    let bot = bot_with(&chat, &summaries, fast_poll(3));

    let first = dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    let second = dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;

    assert!(matches!(first, DispatchOutcome::Failed(_)));
    assert_eq!(second, DispatchOutcome::Duplicate);
    assert_eq!(summaries.submit_attempts(), 1);
    assert_eq!(chat.added("x"), 1);
    assert_eq!(chat.posts().len(), 1);
}

#[tokio::test]
async fn test_rejected_file_is_not_dispatched_again() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::default());
    let bot = bot_with(&chat, &summaries, fast_poll(3));
    let pdf = SharedFile {
        name: "slides.pdf".to_string(),
        ..audio_file()
    };

    dispatch(&bot, &message(), parse_params(""), std::slice::from_ref(&pdf)).await;
    let second = dispatch(&bot, &message(), parse_params(""), &[pdf]).await;

    assert_eq!(second, DispatchOutcome::Duplicate);
    assert_eq!(chat.added("x"), 1);
    assert_eq!(chat.posts().len(), 1);
}

#[tokio::test]
async fn test_failed_status_query_counts_as_attempt() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_script(&[
        Err("connection reset"),
        Ok("SummaryComplete"),
    ]));
    let bot = bot_with(&chat, &summaries, fast_poll(5));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    let status = poll_job(&bot, "job_abc").await;

    assert_eq!(status, JobStatus::Done);
    assert_eq!(summaries.status_queries(), 2);
    assert_eq!(chat.uploads().len(), 2);
    assert!(chat.posts().is_empty());
}

#[tokio::test]
async fn test_failed_status_queries_exhaust_attempts() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_script(&[Err("connection reset")]));
    let bot = bot_with(&chat, &summaries, fast_poll(2));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;

    assert_eq!(poll_job(&bot, "job_abc").await, JobStatus::Error);
    assert_eq!(summaries.status_queries(), 2);
    assert!(chat.posts()[0].contains("timed out"));
}

#[tokio::test]
async fn test_unknown_status_keeps_previous_reactions() {
    let chat = Arc::new(FakeChat::default());
    let summaries = Arc::new(FakeSummaries::with_statuses(&[
        "Transcribing",
        "Reticulating",
        "SummaryComplete",
    ]));
    let bot = bot_with(&chat, &summaries, fast_poll(10));

    dispatch(&bot, &message(), parse_params(""), &[audio_file()]).await;
    assert_eq!(poll_job(&bot, "job_abc").await, JobStatus::Done);

    assert_eq!(summaries.status_queries(), 3);
    assert_eq!(chat.added("three"), 1);
    assert_eq!(chat.removed("three"), 1);

    // nothing happens between reaching step three and completion
    let calls = chat.reaction_calls();
    let three_at = calls
        .iter()
        .position(|c| *c == ChatCall::AddReaction("three".to_string()))
        .unwrap();
    let done_at = calls
        .iter()
        .position(|c| *c == ChatCall::AddReaction("white_check_mark".to_string()))
        .unwrap();
    let between: Vec<_> = calls[three_at + 1..done_at]
        .iter()
        .filter(|c| matches!(c, ChatCall::AddReaction(_)))
        .collect();
    assert!(between.is_empty());
    assert_eq!(
        chat.current_reactions(),
        vec!["flag-us".to_string(), "white_check_mark".to_string()]
    );
}
