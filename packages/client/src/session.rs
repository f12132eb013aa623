//! Interactive chat session.

use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use hiroba_server::infrastructure::dto::websocket::ChatFrame;

use crate::{
    api::ApiClient,
    config::ClientConfig,
    error::ClientError,
    formatter::{Input, format_chat, parse_input},
};

/// Authenticate, print history and chat until `/quit` or the server closes
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let api = ApiClient::new(&config.server)?;

    let auth = if config.register {
        api.register(&config.username, &config.password).await?
    } else {
        api.login(&config.username, &config.password).await?
    };
    tracing::info!(username = %auth.username, "Authenticated");

    let history = api.history(&auth.token).await?;
    let skip = history.len().saturating_sub(config.history);
    for frame in &history[skip..] {
        println!("{}", format_chat(frame, &auth.username, &Local));
    }

    let (ws, _) = connect_async(api.ws_url(&auth.token)).await?;
    tracing::info!("Connected to {}", config.server);
    println!("Connected as {}. Type /quit to exit.", auth.username);

    let (mut sender, mut receiver) = ws.split();
    let mut lines = spawn_prompt(format!("{}> ", auth.username));

    loop {
        tokio::select! {
            line = lines.recv() => {
                let input = match line {
                    Some(Ok(line)) => parse_input(&line),
                    Some(Err(e)) => return Err(e),
                    // Ctrl-C / Ctrl-D
                    None => Input::Quit,
                };
                match input {
                    Input::Quit => {
                        if let Err(e) = sender.send(Message::Close(None)).await {
                            tracing::debug!("Failed to send close frame: {}", e);
                        }
                        break;
                    }
                    Input::Empty => {}
                    Input::Send(payload) => sender.send(Message::Text(payload.into())).await?,
                }
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ChatFrame>(text.as_str()) {
                    Ok(frame) => println!("{}", format_chat(&frame, &auth.username, &Local)),
                    Err(e) => tracing::warn!("Ignoring unexpected frame: {}", e),
                },
                Some(Ok(Message::Close(frame))) => {
                    match frame {
                        Some(frame) => println!("Disconnected: {} ({})", frame.reason, u16::from(frame.code)),
                        None => println!("Disconnected"),
                    }
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => {
                    println!("Disconnected");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Read lines on a dedicated thread; the channel closes on Ctrl-C or Ctrl-D.
///
/// A plain thread rather than `spawn_blocking` so that a prompt still waiting
/// for input does not hold the runtime open on exit.
fn spawn_prompt(prompt: String) -> mpsc::UnboundedReceiver<Result<String, ClientError>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = tx.send(Err(e.into()));
                return;
            }
        };

        loop {
            match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    let _ = tx.send(Err(e.into()));
                    break;
                }
            }
        }
    });

    rx
}
