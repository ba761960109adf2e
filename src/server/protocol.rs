// Wire protocol of the TCP command server.
//
// Each read from the socket is one request. The command is a fixed ASCII
// prefix with the argument glued directly after it, e.g. `AddЗима` or
// `TextВчера я играл в мяч`. Replies are the classifier message wrapped in
// braces.

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckHealth,
    Add(String),
    Remove(String),
    List,
    Text(String),
    Unknown,
}

/// Reply to `CheckHealth`.
pub const READY_REPLY: &str = "{Ready}";

/// Parse one request frame. Arguments are decoded as UTF-8, lossily.
pub fn parse_command(frame: &[u8]) -> Command {
    if frame == b"CheckHealth" {
        Command::CheckHealth
    } else if let Some(rest) = frame.strip_prefix(b"Add") {
        Command::Add(argument(rest))
    } else if let Some(rest) = frame.strip_prefix(b"Remove") {
        Command::Remove(argument(rest))
    } else if frame.starts_with(b"List") {
        Command::List
    } else if let Some(rest) = frame.strip_prefix(b"Text") {
        Command::Text(String::from_utf8_lossy(rest).into_owned())
    } else {
        Command::Unknown
    }
}

/// Theme names arrive without framing; strip the line ending clients add.
fn argument(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

/// Wrap a message for the wire.
pub fn frame_reply(message: &str) -> String {
    format!("{{{message}}}")
}
