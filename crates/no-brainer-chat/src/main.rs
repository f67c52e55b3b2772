//! A simple program demonstrates how to use `no-brainer-chat` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::error::Error as StdError;
use std::fs;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use no_brainer_chat::TerminalSurface;
use no_brainer_chat::core::config::WidgetOptions;
use no_brainer_chat::core::{ChatWidget, SubmitOutcome, Trigger};
use no_brainer_chat::responders::EchoResponder;
use no_brainer_chat::terminal::TerminalEvent;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum UiEvent {
    Idle,
    Fault(String),
    Terminal(TerminalEvent),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = match load_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("cannot load widget options: {err}");
            return;
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let surface = TerminalSurface::new({
        let event_tx = event_tx.clone();
        move |event| {
            event_tx.send(UiEvent::Terminal(event)).ok();
        }
    });
    let input = surface.input();

    let widget = ChatWidget::builder(surface)
        .with_options(options)
        .answer(EchoResponder::new())
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(UiEvent::Idle).ok();
            }
        })
        .on_fault({
            let event_tx = event_tx.clone();
            move |err| {
                event_tx.send(UiEvent::Fault(err.to_string())).ok();
            }
        })
        .build();

    if let Err(err) = widget
        .open()
        .and_then(|widget| widget.push_agent_message("Hi! Say something."))
    {
        eprintln!("cannot start the widget: {err}");
        return;
    }

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    'outer: loop {
        // Print what happened since the last prompt.
        while let Ok(event) = event_rx.try_recv() {
            print_event(event);
        }

        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let result = match line.trim() {
            "/quit" => break,
            "/open" => widget.open().map(|_| None),
            "/close" => widget.close().map(|_| None),
            text => {
                input.type_text(text);
                widget.submit(Trigger::enter()).await.map(Some)
            }
        };

        let outcome = match result {
            Ok(Some(outcome)) => outcome,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{}", err.red());
                continue;
            }
        };
        // Feedback of other outcomes is printed with the next prompt.
        if outcome != SubmitOutcome::Accepted {
            continue;
        }

        let mut loading = true;
        let mut progress_bar = None;

        loop {
            if loading {
                // Create a new progress bar if it has been finished.
                progress_bar
                    .get_or_insert_with(|| {
                        let progress_bar = ProgressBar::new_spinner();
                        progress_bar.set_style(progress_style.clone());
                        progress_bar.set_message("🤔 Thinking...");
                        progress_bar
                    })
                    .inc(1);
            }

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = progress_bar.take() {
                progress_bar.finish_and_clear();
            }

            match event {
                UiEvent::Terminal(TerminalEvent::Loading(active)) => {
                    loading = active;
                }
                UiEvent::Idle => {
                    break;
                }
                event => print_event(event),
            }
        }
    }

    widget.destroy();
}

fn print_event(event: UiEvent) {
    match event {
        UiEvent::Terminal(TerminalEvent::Line(line)) => println!("{line}"),
        UiEvent::Terminal(TerminalEvent::Delta(delta)) => {
            print!("{delta}");
            std::io::stdout().flush().ok();
        }
        UiEvent::Fault(fault) => eprintln!("{}", fault.red()),
        UiEvent::Terminal(TerminalEvent::Loading(_)) | UiEvent::Idle => {}
    }
}

fn load_options() -> Result<WidgetOptions, Box<dyn StdError>> {
    let Some(path) = env::args().nth(1) else {
        return Ok(WidgetOptions::default());
    };
    let json = fs::read_to_string(&path)?;
    let options = serde_json::from_str(&json)?;
    debug!("loaded options from {path}");
    Ok(options)
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
