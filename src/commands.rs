//! Line commands understood by the terminal front end.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the pending selection with these paths.
    Attach(Vec<String>),
    /// Remove the pending file at this zero-based index.
    Remove(usize),
    /// List pending files.
    Files,
    /// Clear the conversation on the server and locally.
    ClearHistory,
    Help,
    Quit,
    /// Anything that is not a command is message text.
    Message(String),
    /// A command with bad arguments.
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /attach <path>...  select files (replaces the current selection)
  /remove <n>        drop pending file number n (as listed by /files)
  /files             list pending files
  /clear             clear chat history
  /help              show this help
  /quit              exit
Anything else is sent as a message together with the pending files.";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<String> = words.map(str::to_string).collect();

        match name {
            "attach" if args.is_empty() => Self::Invalid("/attach needs at least one path".into()),
            "attach" => Self::Attach(args),
            "remove" => match args.as_slice() {
                [n] => n
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .map_or_else(|| Self::Invalid(format!("not a file number: {n}")), Self::Remove),
                _ => Self::Invalid("/remove takes one file number".into()),
            },
            "files" => Self::Files,
            "clear" => Self::ClearHistory,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command: /{other}")),
        }
    }
}
