//! Feedback capture integration tests

use std::time::Duration;

use veronica::feedback::{
    FEEDBACK_NOT_PROVIDED, FeedbackCollector, FeedbackConfig, FeedbackQueue, feedback_prompt,
};

mod common;

use common::{ScriptedCapture, setup_test_store};

#[tokio::test]
async fn test_timeout_records_sentinel() {
    let store = setup_test_store();
    let capture = ScriptedCapture::new(&[]);
    let collector = FeedbackCollector::new(capture, store.clone(), FeedbackConfig::default());

    collector.collect("abrir a janela").await;

    let feedback = store.feedback().list().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].command, "abrir a janela");
    assert_eq!(feedback[0].feedback, FEEDBACK_NOT_PROVIDED);
}

#[tokio::test]
async fn test_captured_explanation_is_recorded() {
    let store = setup_test_store();
    let capture = ScriptedCapture::new(&["quero ar fresco"]);
    let collector =
        FeedbackCollector::new(capture.clone(), store.clone(), FeedbackConfig::default());

    collector.collect("abrir a janela").await;

    let feedback = store.feedback().list().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].feedback, "quero ar fresco");

    let calls = capture.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, feedback_prompt("abrir a janela"));
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(5)));
    assert_eq!(calls[0].phrase_limit, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_queue_records_one_row_per_submit() {
    let store = setup_test_store();
    let capture = ScriptedCapture::new(&["primeira explicação", "", "terceira explicação"]);
    let collector = FeedbackCollector::new(capture, store.clone(), FeedbackConfig::default());
    let (queue, worker) = FeedbackQueue::spawn(collector);

    queue.submit("um");
    queue.submit("dois");
    queue.submit("três");

    drop(queue);
    worker.await.unwrap();

    let feedback = store.feedback().list().unwrap();
    let rows: Vec<(&str, &str)> = feedback
        .iter()
        .map(|f| (f.command.as_str(), f.feedback.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("um", "primeira explicação"),
            ("dois", FEEDBACK_NOT_PROVIDED),
            ("três", "terceira explicação"),
        ]
    );
}

#[tokio::test]
async fn test_full_queue_records_sentinel_without_capture() {
    let store = setup_test_store();
    let capture = ScriptedCapture::new(&["a", "b", "c"]);
    let config = FeedbackConfig {
        queue_capacity: 2,
        ..FeedbackConfig::default()
    };
    let collector = FeedbackCollector::new(capture.clone(), store.clone(), config);
    let (queue, worker) = FeedbackQueue::spawn(collector);

    // The worker cannot run until this task yields, so the third submit
    // finds the queue full
    queue.submit("um");
    queue.submit("dois");
    queue.submit("três");

    assert_eq!(store.feedback().count().unwrap(), 1);

    drop(queue);
    worker.await.unwrap();

    let feedback = store.feedback().list().unwrap();
    assert_eq!(feedback.len(), 3);

    let overflow = feedback.iter().find(|f| f.command == "três").unwrap();
    assert_eq!(overflow.feedback, FEEDBACK_NOT_PROVIDED);
    assert_eq!(capture.calls().len(), 2);
}

#[tokio::test]
async fn test_stopped_worker_records_sentinel() {
    let store = setup_test_store();
    let capture = ScriptedCapture::new(&["nunca ouvido"]);
    let collector =
        FeedbackCollector::new(capture.clone(), store.clone(), FeedbackConfig::default());
    let (queue, worker) = FeedbackQueue::spawn(collector);

    worker.abort();
    assert!(worker.await.unwrap_err().is_cancelled());

    queue.submit("fechar a porta");

    let feedback = store.feedback().list().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].command, "fechar a porta");
    assert_eq!(feedback[0].feedback, FEEDBACK_NOT_PROVIDED);
    assert!(capture.calls().is_empty());
}
