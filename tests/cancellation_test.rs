//! Abandoning a stream must release the transport and freeze the answer.

mod common;

use common::*;
use futures::StreamExt;
use hospital_chat::models::{ChatRequest, MessageStatus};
use hospital_chat::{ChatClient, SendError, SendOutcome, StreamEvent, TransportError};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_cancel_mid_answer() {
    let mock = MockHttpConfig::new()
        .with_hanging_stream(
            STREAM_URL,
            &[StreamEvent::status("Searching"), StreamEvent::token("Par")],
        )
        .build();
    let (mut session, _rx) = test_session(&mock);
    let (cancel_tx, cancel_rx) = oneshot::channel();

    let canceller = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_tx.send(()).unwrap();
    };
    let (result, _) = tokio::join!(session.send_with_cancel("Hello", cancel_rx), canceller);
    let summary = result.unwrap();

    assert_eq!(summary.outcome, SendOutcome::Cancelled);
    assert_eq!(summary.stats.events, 2);
    assert_eq!(mock.open_streams(), 0);

    let answer = session.state().message(summary.message_id).unwrap();
    assert_eq!(answer.text(), "Par");
    assert_eq!(answer.status(), MessageStatus::Truncated);
    assert!(!session.state().is_busy());
}

#[tokio::test]
async fn test_session_usable_after_cancel() {
    let mock = MockHttpConfig::new()
        .with_hanging_stream(STREAM_URL, &[StreamEvent::token("Par")])
        .build();
    let (mut session, _rx) = test_session(&mock);

    let (cancel_tx, cancel_rx) = oneshot::channel();
    cancel_tx.send(()).unwrap();
    let summary = session.send_with_cancel("Hello", cancel_rx).await.unwrap();
    assert_eq!(summary.outcome, SendOutcome::Cancelled);

    mock.set_response(
        STREAM_URL,
        MockResponse::Stream(vec![
            StreamEvent::token("Done").to_sse_frame().into(),
            StreamEvent::end("c1").to_sse_frame().into(),
        ]),
    );
    let summary = session.send("Again").await.unwrap();
    assert_eq!(summary.outcome, SendOutcome::Completed);
    assert_eq!(session.state().len(), 4);
    assert_eq!(mock.open_streams(), 0);
}

#[tokio::test]
async fn test_timed_out_send_leaves_session_usable() {
    let mock = MockHttpConfig::new()
        .with_hanging_stream(STREAM_URL, &[StreamEvent::token("Par")])
        .build();
    let (mut session, _rx) = test_session(&mock);

    let timed_out = tokio::time::timeout(Duration::from_millis(50), session.send("Hello")).await;
    assert!(timed_out.is_err());

    assert!(!session.state().is_busy());
    assert_eq!(mock.open_streams(), 0);
    let answer = session.state().last_message().unwrap();
    assert_eq!(answer.text(), "Par");
    assert_eq!(answer.status(), MessageStatus::Truncated);

    mock.set_response(
        STREAM_URL,
        MockResponse::Stream(vec![
            StreamEvent::token("Done").to_sse_frame().into(),
            StreamEvent::end("c1").to_sse_frame().into(),
        ]),
    );
    let summary = session.send("Again").await.unwrap();
    assert_eq!(summary.outcome, SendOutcome::Completed);
    assert_eq!(session.state().len(), 4);
    assert_eq!(
        session.state().message(summary.message_id).unwrap().text(),
        "Done"
    );
    session.new_conversation().await.unwrap();
}

#[tokio::test]
async fn test_dropping_decoder_releases_body() {
    let mock = MockHttpConfig::new()
        .with_hanging_stream(STREAM_URL, &[StreamEvent::token("Par")])
        .build();
    let client = ChatClient::new(mock.clone(), test_config());

    let mut events = client
        .stream_chat(&ChatRequest::streaming("Hello", None))
        .await
        .unwrap();
    assert_eq!(events.next().await, Some(Ok(StreamEvent::token("Par"))));
    assert_eq!(mock.open_streams(), 1);

    drop(events);
    assert_eq!(mock.open_streams(), 0);
}

#[tokio::test]
async fn test_body_released_after_transport_error() {
    let mock = MockHttpConfig::new()
        .with_broken_stream(
            STREAM_URL,
            &[StreamEvent::token("Par")],
            TransportError::Io("connection reset".to_string()),
        )
        .build();
    let (mut session, _rx) = test_session(&mock);

    let err = session.send("Hello").await.unwrap_err();

    assert!(matches!(err, SendError::Transport(TransportError::Io(_))));
    assert_eq!(mock.open_streams(), 0);
    let answer = session.state().last_message().unwrap();
    assert_eq!(answer.status(), MessageStatus::Failed);
}
