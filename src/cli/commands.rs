//! Line commands accepted by the interactive front end

use crate::controller::Event;
use std::path::PathBuf;

pub(crate) const HELP: &str = "\
Commands:
  open <path>       select an image and upload it
  remove            remove the background of the uploaded image
  change            pick a different image
  reset             start over
  download [path]   save the processed image
  close             dismiss the error message
  status            show the current step
  help              show this help
  quit              exit";

/// A parsed interactive command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Open(PathBuf),
    Remove,
    Change,
    Reset,
    Download(Option<PathBuf>),
    Close,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `Ok(None)`
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "open" | "o" => {
                if rest.is_empty() {
                    return Err("usage: open <path>".to_string());
                }
                Self::Open(PathBuf::from(rest))
            },
            "remove" | "r" => Self::Remove,
            "change" => Self::Change,
            "reset" => Self::Reset,
            "download" | "d" => {
                Self::Download((!rest.is_empty()).then(|| PathBuf::from(rest)))
            },
            "close" => Self::Close,
            "status" | "s" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{}', type 'help'", other)),
        };

        Ok(Some(command))
    }

    /// The workflow event a command maps to, for commands that have one
    ///
    /// `open` is absent because its event needs the file read first.
    pub(crate) fn event(&self) -> Option<Event> {
        match self {
            Self::Remove => Some(Event::RemoveBackground),
            Self::Change => Some(Event::ChangeImage),
            Self::Reset => Some(Event::Reset),
            Self::Download(_) => Some(Event::Download),
            Self::Close => Some(Event::CloseError),
            Self::Open(_) | Self::Status | Self::Help | Self::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::EventKind;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("open photos/cat 1.jpg").unwrap(),
            Some(Command::Open(PathBuf::from("photos/cat 1.jpg")))
        );
        assert_eq!(Command::parse("  REMOVE ").unwrap(), Some(Command::Remove));
        assert_eq!(Command::parse("download").unwrap(), Some(Command::Download(None)));
        assert_eq!(
            Command::parse("d out.png").unwrap(),
            Some(Command::Download(Some(PathBuf::from("out.png"))))
        );
        assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("open").unwrap_err().contains("usage"));
        assert!(Command::parse("frobnicate").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn test_command_events() {
        assert_eq!(
            Command::Remove.event().map(|e| e.kind()),
            Some(EventKind::RemoveBackground)
        );
        assert_eq!(Command::Change.event().map(|e| e.kind()), Some(EventKind::ChangeImage));
        assert_eq!(Command::Close.event().map(|e| e.kind()), Some(EventKind::CloseError));
        assert!(Command::Status.event().is_none());
        assert!(Command::Open(PathBuf::from("a.png")).event().is_none());
    }
}
