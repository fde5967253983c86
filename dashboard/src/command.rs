//! Operator commands read from stdin.

use std::str::FromStr;

use crate::view::{PriceRange, SortKey};

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  login <password>        log in
  logout                  log out
  connect [url]           connect to the feed (default: configured url)
  disconnect              close the connection
  filter [text]           filter by sticker (empty clears)
  price <min|-> <max|->   filter by price range
  sort name|price         sort, repeat to flip direction
  stickers                list stickers seen so far
  show                    redraw the dashboard
  help                    show this help
  quit                    exit";

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in with a password.
    Login(String),
    /// Log out.
    Logout,
    /// Connect, to the given URL or the configured one.
    Connect(Option<String>),
    /// Disconnect.
    Disconnect,
    /// Set the sticker filter.
    Filter(String),
    /// Set the price range.
    Price(PriceRange),
    /// Sort by a key.
    Sort(SortKey),
    /// List distinct stickers.
    Stickers,
    /// Redraw.
    Show,
    /// Print help.
    Help,
    /// Exit.
    Quit,
}

/// Command parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Blank line.
    #[error("empty command")]
    Empty,

    /// Unrecognized command word.
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),

    /// Known command with bad arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "login" if rest.is_empty() => Err(CommandError::Usage("login <password>")),
            "login" => Ok(Self::Login(rest.to_string())),
            "logout" => Ok(Self::Logout),
            "connect" => Ok(Self::Connect(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "disconnect" => Ok(Self::Disconnect),
            "filter" => Ok(Self::Filter(rest.to_string())),
            "price" => {
                let mut bounds = rest.split_whitespace();
                match (bounds.next(), bounds.next(), bounds.next()) {
                    (Some(min), Some(max), None) => Ok(Self::Price(PriceRange::parse(min, max))),
                    (None, None, None) => Ok(Self::Price(PriceRange::default())),
                    _ => Err(CommandError::Usage("price <min|-> <max|->")),
                }
            }
            "sort" => rest
                .parse()
                .map(Self::Sort)
                .map_err(|_| CommandError::Usage("sort name|price")),
            "stickers" => Ok(Self::Stickers),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("logout".parse(), Ok(Command::Logout));
        assert_eq!("  DISCONNECT ".parse(), Ok(Command::Disconnect));
        assert_eq!("stickers".parse(), Ok(Command::Stickers));
        assert_eq!("show".parse(), Ok(Command::Show));
        assert_eq!("help".parse(), Ok(Command::Help));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            "login admin123".parse(),
            Ok(Command::Login("admin123".to_string()))
        );
        assert_eq!(
            "login".parse::<Command>(),
            Err(CommandError::Usage("login <password>"))
        );
    }

    #[test]
    fn test_parse_connect() {
        assert_eq!("connect".parse(), Ok(Command::Connect(None)));
        assert_eq!(
            "connect ws://127.0.0.1:9000".parse(),
            Ok(Command::Connect(Some("ws://127.0.0.1:9000".to_string())))
        );
    }

    #[test]
    fn test_parse_filter_keeps_spaces() {
        assert_eq!(
            "filter Titan | Katowice".parse(),
            Ok(Command::Filter("Titan | Katowice".to_string()))
        );
        assert_eq!("filter".parse(), Ok(Command::Filter(String::new())));
    }

    #[test]
    fn test_parse_price() {
        let Ok(Command::Price(range)) = "price 10 -".parse::<Command>() else {
            panic!("expected price command");
        };
        assert_eq!(range.min, Some(Decimal::from(10)));
        assert_eq!(range.max, None);

        assert_eq!("price".parse(), Ok(Command::Price(PriceRange::default())));
        assert_eq!(
            "price 10".parse::<Command>(),
            Err(CommandError::Usage("price <min|-> <max|->"))
        );
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!("sort price".parse(), Ok(Command::Sort(SortKey::Price)));
        assert_eq!("sort Name".parse(), Ok(Command::Sort(SortKey::Name)));
        assert!("sort volume".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "buy".parse::<Command>(),
            Err(CommandError::Unknown("buy".to_string()))
        );
    }
}
