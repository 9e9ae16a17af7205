//! REPL command parsing.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: sent as a query.
    Send(String),
    /// Show the FAQ catalog.
    Faqs,
    /// Pick the Nth FAQ entry (1-based) from the last listing.
    Faq(usize),
    /// Pick the Nth visible suggestion chip (1-based).
    Pick(usize),
    /// Run the autocomplete pipeline on the text and show the result.
    Complete(String),
    /// Replace the last answer with the text.
    Edit(String),
    /// Save the last answer, optionally under a file name.
    Download(Option<String>),
    /// Show settings, or set the download path.
    Settings(Option<String>),
    /// List the data files the backend has received.
    Files,
    /// List training entries.
    Training,
    /// Teach the backend the last answer for the last question.
    Teach,
    Minimize,
    Restore,
    Fullscreen,
    Help,
    Quit,
}

pub const COMMANDS: &[&str] = &[
    ":faqs",
    ":faq",
    ":pick",
    ":complete",
    ":edit",
    ":download",
    ":settings",
    ":files",
    ":training",
    ":teach",
    ":minimize",
    ":restore",
    ":fullscreen",
    ":help",
    ":quit",
];

impl Command {
    /// Parses a trimmed, non-empty line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Command::Quit);
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Send(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        match (name, arg) {
            ("faqs", _) => Ok(Command::Faqs),
            ("faq", Some(n)) => parse_index(n).map(Command::Faq),
            ("pick", Some(n)) => parse_index(n).map(Command::Pick),
            ("complete", Some(text)) => Ok(Command::Complete(text.to_string())),
            ("edit", Some(text)) => Ok(Command::Edit(text.to_string())),
            ("download", name) => Ok(Command::Download(name.map(str::to_string))),
            ("settings", path) => Ok(Command::Settings(path.map(str::to_string))),
            ("files", _) => Ok(Command::Files),
            ("training", _) => Ok(Command::Training),
            ("teach", _) => Ok(Command::Teach),
            ("minimize", _) => Ok(Command::Minimize),
            ("restore", _) => Ok(Command::Restore),
            ("fullscreen", _) => Ok(Command::Fullscreen),
            ("help", _) => Ok(Command::Help),
            ("quit" | "q", _) => Ok(Command::Quit),
            ("faq" | "pick" | "complete" | "edit", None) => {
                Err(format!(":{} needs an argument", name))
            }
            _ => Err(format!("Unknown command :{}", name)),
        }
    }
}

fn parse_index(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Expected a number starting at 1, got '{}'", raw)),
    }
}
