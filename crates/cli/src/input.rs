//! Parsing of lines typed at the chat prompt.

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Plain text: becomes the draft and is sent.
    Message(String),
    /// `/read`: acknowledge the conversation.
    MarkRead,
    /// `/history`: reload history over REST.
    History,
    /// `/logout`: clear the stored session and quit.
    Logout,
    /// `/quit` or `/exit`.
    Quit,
    Help,
    /// A `/command` that is not recognised.
    Unknown(String),
    /// Whitespace only.
    Blank,
}

pub const HELP: &str = "Commands: /read, /history, /logout, /quit. Anything else is sent as a message.";

pub fn parse_line(line: &str) -> InputLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputLine::Blank;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return InputLine::Message(line.to_string());
    };
    match command.to_ascii_lowercase().as_str() {
        "read" => InputLine::MarkRead,
        "history" => InputLine::History,
        "logout" => InputLine::Logout,
        "quit" | "exit" => InputLine::Quit,
        "help" | "?" => InputLine::Help,
        // `//text` escapes a leading slash.
        _ if command.starts_with('/') => InputLine::Message(command.to_string()),
        _ => InputLine::Unknown(trimmed.to_string()),
    }
}
