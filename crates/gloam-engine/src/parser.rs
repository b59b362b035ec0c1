//! Command parsing for player input.
//!
//! The grammar is a small, fixed verb set — deliberately not a scripting
//! language. A raw line is tokenized (whitespace split, double-quoted spans
//! kept whole), the first token is lowercased and resolved through the alias
//! table, and the rest become arguments.

use thiserror::Error;

/// How a verb registers with the presence when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    /// Provokes the presence (touching things, moving around).
    Risky,
    /// Soothes it (observing, asking for help).
    Calming,
    /// Beneath its notice.
    Neutral,
}

/// The canonical verb set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Describe the current room or a named artifact.
    Look,
    /// Unlock and read an artifact.
    Open,
    /// Move to a linked room.
    Go,
    /// Abandon the dive and resolve the session.
    Escape,
    /// Turn the terminal against the presence and resolve the session.
    Reclaim,
    /// Compile the session transcript for download.
    Export,
    /// Show the command surface.
    Help,
}

/// Verb synonyms, canonical form first.
const LOOK_VERBS: &[&str] = &["look", "l", "ls", "examine"];
const OPEN_VERBS: &[&str] = &["open", "cat", "read", "unlock"];
const GO_VERBS: &[&str] = &["go", "cd", "move", "enter"];
const ESCAPE_VERBS: &[&str] = &["escape", "flee"];
const RECLAIM_VERBS: &[&str] = &["reclaim", "purge"];
const EXPORT_VERBS: &[&str] = &["export", "save"];
const HELP_VERBS: &[&str] = &["help", "h", "?"];

impl Verb {
    /// Resolve a lowercased token to a canonical verb.
    pub fn parse(token: &str) -> Option<Self> {
        if LOOK_VERBS.contains(&token) {
            Some(Self::Look)
        } else if OPEN_VERBS.contains(&token) {
            Some(Self::Open)
        } else if GO_VERBS.contains(&token) {
            Some(Self::Go)
        } else if ESCAPE_VERBS.contains(&token) {
            Some(Self::Escape)
        } else if RECLAIM_VERBS.contains(&token) {
            Some(Self::Reclaim)
        } else if EXPORT_VERBS.contains(&token) {
            Some(Self::Export)
        } else if HELP_VERBS.contains(&token) {
            Some(Self::Help)
        } else {
            None
        }
    }

    /// The canonical spelling.
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Look => "look",
            Self::Open => "open",
            Self::Go => "go",
            Self::Escape => "escape",
            Self::Reclaim => "reclaim",
            Self::Export => "export",
            Self::Help => "help",
        }
    }

    /// How this verb registers with the presence.
    pub fn risk(&self) -> Risk {
        match self {
            Self::Open | Self::Go => Risk::Risky,
            Self::Look | Self::Help => Risk::Calming,
            Self::Escape | Self::Reclaim | Self::Export => Risk::Neutral,
        }
    }
}

/// A parsed player command. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The canonical verb.
    pub verb: Verb,
    /// Ordered arguments, quoted spans kept whole.
    pub args: Vec<String>,
    /// The raw input line.
    pub raw: String,
}

impl Command {
    /// All arguments joined into one target phrase.
    pub fn target(&self) -> String {
        self.args.join(" ")
    }
}

/// Failures the parser can report. Always recovered locally — the engine
/// renders these as in-fiction text and the session continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Empty input or an unterminated quoted span.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The first token is not in the recognized verb set.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Parse a raw input line into a [`Command`].
pub fn parse(raw: &str) -> Result<Command, ParseError> {
    let tokens = tokenize(raw)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Err(ParseError::MalformedInput("empty input".to_string()));
    };
    let token = head.to_lowercase();
    let verb =
        Verb::parse(&token).ok_or_else(|| ParseError::UnknownCommand(token.clone()))?;
    Ok(Command {
        verb,
        args: rest.to_vec(),
        raw: raw.to_string(),
    })
}

/// Split a line on whitespace, keeping double-quoted spans as single tokens.
fn tokenize(raw: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    tokens.push(std::mem::take(&mut current));
                    in_quotes = false;
                } else {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    in_quotes = true;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::MalformedInput("unterminated quote".to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_verb() {
        let cmd = parse("look").unwrap();
        assert_eq!(cmd.verb, Verb::Look);
        assert!(cmd.args.is_empty());
        assert_eq!(cmd.raw, "look");
    }

    #[test]
    fn parse_verb_with_args() {
        let cmd = parse("open key fragment").unwrap();
        assert_eq!(cmd.verb, Verb::Open);
        assert_eq!(cmd.args, vec!["key", "fragment"]);
        assert_eq!(cmd.target(), "key fragment");
    }

    #[test]
    fn aliases_resolve_to_canonical_verbs() {
        assert_eq!(parse("ls").unwrap().verb, Verb::Look);
        assert_eq!(parse("cat locker").unwrap().verb, Verb::Open);
        assert_eq!(parse("cd archive").unwrap().verb, Verb::Go);
        assert_eq!(parse("flee").unwrap().verb, Verb::Escape);
        assert_eq!(parse("purge").unwrap().verb, Verb::Reclaim);
        assert_eq!(parse("save").unwrap().verb, Verb::Export);
        assert_eq!(parse("?").unwrap().verb, Verb::Help);
    }

    #[test]
    fn verb_case_is_normalized() {
        assert_eq!(parse("LOOK").unwrap().verb, Verb::Look);
        assert_eq!(parse("Open locker").unwrap().verb, Verb::Open);
    }

    #[test]
    fn quoted_span_is_one_argument() {
        let cmd = parse(r#"open "strange file""#).unwrap();
        assert_eq!(cmd.args, vec!["strange file"]);
    }

    #[test]
    fn quoted_span_mid_line() {
        let cmd = parse(r#"go "server room" now"#).unwrap();
        assert_eq!(cmd.args, vec!["server room", "now"]);
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        assert!(matches!(
            parse(r#"open "strange"#),
            Err(ParseError::MalformedInput(_))
        ));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(parse(""), Err(ParseError::MalformedInput(_))));
        assert!(matches!(parse("   "), Err(ParseError::MalformedInput(_))));
    }

    #[test]
    fn unknown_verb_reported() {
        assert_eq!(
            parse("dance wildly"),
            Err(ParseError::UnknownCommand("dance".to_string()))
        );
    }

    #[test]
    fn risk_classes() {
        assert_eq!(Verb::Open.risk(), Risk::Risky);
        assert_eq!(Verb::Go.risk(), Risk::Risky);
        assert_eq!(Verb::Look.risk(), Risk::Calming);
        assert_eq!(Verb::Help.risk(), Risk::Calming);
        assert_eq!(Verb::Escape.risk(), Risk::Neutral);
        assert_eq!(Verb::Export.risk(), Risk::Neutral);
    }

    #[test]
    fn no_side_effects_on_failure() {
        // Parsing is pure; the same input always yields the same result.
        assert_eq!(parse("dance"), parse("dance"));
    }
}
