use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use no_brainer_chat::core::interface::{
    AnswerRequest, HistoryEntry, responder_fn,
};
use no_brainer_chat::core::{ChatWidget, SubmitOutcome, Trigger};
use no_brainer_chat::responders::EchoResponder;
use no_brainer_chat::{TerminalEvent, TerminalSurface};
use tokio::sync::watch;
use tokio::time::timeout;

#[tokio::test(start_paused = true)]
async fn test_echo_chat() {
    let events = Arc::new(Mutex::new(vec![]));
    let surface = TerminalSurface::new({
        let events = Arc::clone(&events);
        move |event| events.lock().unwrap().push(event)
    });
    let input = surface.input();

    let (idle_tx, mut idle_rx) = watch::channel(false);
    let widget = ChatWidget::builder(surface)
        .agent_name("echo")
        .answer(EchoResponder::new().with_word_delay(Duration::from_millis(10)))
        .on_idle(move || {
            idle_tx.send(true).unwrap();
        })
        .build();
    widget.open().unwrap();

    input.type_text("hello world");
    let outcome = widget.submit(Trigger::enter()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(input.text(), "");

    timeout(Duration::from_secs(5), idle_rx.wait_for(|v| *v))
        .await
        .unwrap()
        .unwrap();

    let history = widget.history().await.unwrap();
    assert_eq!(
        history.to_vec(),
        vec![
            HistoryEntry::new("hello world", "user"),
            HistoryEntry::new("You said: hello world", "Echo"),
        ]
    );

    let events = events.lock().unwrap().clone();
    assert!(events.contains(&TerminalEvent::Loading(true)));
    assert!(events.contains(&TerminalEvent::Loading(false)));
    // The streamed line is ended once the answer resolves.
    assert_eq!(events.last(), Some(&TerminalEvent::Line(String::new())));
    let deltas: String = events
        .iter()
        .filter_map(|event| match event {
            TerminalEvent::Delta(delta) => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert!(deltas.ends_with("You said: hello world"));
}

#[tokio::test]
async fn test_warning_is_printed() {
    let events = Arc::new(Mutex::new(vec![]));
    let surface = TerminalSurface::new({
        let events = Arc::clone(&events);
        move |event| events.lock().unwrap().push(event)
    });
    let input = surface.input();
    let widget = ChatWidget::builder(surface).build();

    input.type_text("drop table users");
    let outcome = widget.submit(Trigger::enter()).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Warned(_)));

    let events = events.lock().unwrap().clone();
    assert!(events.iter().any(|event| matches!(
        event,
        TerminalEvent::Line(line) if line.contains("SQL Injection detected")
    )));
}

fn recorded_surface() -> (TerminalSurface, Arc<Mutex<Vec<TerminalEvent>>>) {
    let events = Arc::new(Mutex::new(vec![]));
    let surface = TerminalSurface::new({
        let events = Arc::clone(&events);
        move |event| events.lock().unwrap().push(event)
    });
    (surface, events)
}

fn count_lines(events: &Mutex<Vec<TerminalEvent>>, text: &str) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| {
            matches!(event, TerminalEvent::Line(line) if line.contains(text))
        })
        .count()
}

#[tokio::test]
async fn test_repeated_feedback_is_printed() {
    let (surface, events) = recorded_surface();
    let input = surface.input();
    let widget = ChatWidget::builder(surface).build();

    for text in ["drop table users", "select 1"] {
        input.type_text(text);
        let outcome = widget.submit(Trigger::enter()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Warned(_)));
    }
    assert_eq!(count_lines(&events, "SQL Injection detected"), 2);

    for text in ["hi", "yo"] {
        input.type_text(text);
        let outcome = widget.submit(Trigger::enter()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    }
    assert_eq!(count_lines(&events, "at least 3 characters"), 2);
}

#[tokio::test]
async fn test_written_answer_is_printed_once() {
    let (surface, events) = recorded_surface();
    let input = surface.input();
    let (idle_tx, mut idle_rx) = watch::channel(0);
    let replies = Arc::new(Mutex::new(vec![None, Some("final".to_owned())]));

    let widget = ChatWidget::builder(surface)
        .answer(responder_fn({
            let replies = Arc::clone(&replies);
            move |request: AnswerRequest| {
                let reply = replies.lock().unwrap().pop().flatten();
                async move {
                    request.bubble.set_content("draft");
                    Ok::<_, Infallible>(reply)
                }
            }
        }))
        .on_idle(move || {
            idle_tx.send_modify(|count| *count += 1);
        })
        .build();

    // Resolves with a reply that replaces the draft.
    input.type_text("first message");
    widget.submit(Trigger::enter()).await.unwrap();
    let idle = idle_rx.wait_for(|count| *count >= 1);
    timeout(Duration::from_millis(500), idle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(count_lines(&events, "draft"), 0);
    assert_eq!(count_lines(&events, "final"), 1);

    // Resolves with nothing, so the draft is the answer.
    input.type_text("second message");
    widget.submit(Trigger::enter()).await.unwrap();
    let idle = idle_rx.wait_for(|count| *count >= 2);
    timeout(Duration::from_millis(500), idle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(count_lines(&events, "draft"), 1);
    assert_eq!(count_lines(&events, "final"), 1);

    let history = widget.history().await.unwrap();
    assert_eq!(history[1].content, "final");
    assert_eq!(history[3].content, "draft");
}
