//! Terminal rendering of chat frames and parsing of typed lines.

use chrono::TimeZone;
use hiroba_server::infrastructure::dto::websocket::ChatFrame;
use hiroba_shared::time::parse_iso8601;

/// Line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/quit`
    Quit,
    /// Blank line, nothing to send
    Empty,
    /// JSON frame ready to send
    Send(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "/quit" => Input::Quit,
        text => Input::Send(serde_json::json!({ "text": text }).to_string()),
    }
}

/// `[HH:MM:SS] author: text`, with the time shown in `tz`
pub fn format_chat<Tz>(frame: &ChatFrame, me: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let time = parse_iso8601(&frame.timestamp)
        .map(|t| t.with_timezone(tz).format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| frame.timestamp.clone());
    let author = if frame.author == me {
        format!("{} (you)", frame.author)
    } else {
        frame.author.clone()
    };
    format!("[{}] {}: {}", time, author, frame.text)
}
