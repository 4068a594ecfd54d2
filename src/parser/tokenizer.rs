use crate::error::{Result, ShellError};

/// Longest accepted input line and normalized buffer, in bytes.
pub const MAX_LINE: usize = 1024;

/// Lexer position relative to the last thing it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Start,
    InToken,
    AfterToken,
    AfterPipe,
    AfterAmp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Space,
    Pipe,
    Amp,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        match c {
            ' ' | '\t' => CharClass::Space,
            '|' => CharClass::Pipe,
            '&' => CharClass::Amp,
            _ => CharClass::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// Tokens separated by single spaces; `|` kept as a token, trailing `&` removed.
    pub normalized: String,
    pub stages: usize,
    pub background: bool,
}

/// Single transition of the lexer. A separator at the start of the line or
/// right after another separator is rejected, as is anything after `&`.
pub fn next_state(state: LexState, class: CharClass) -> Result<LexState> {
    use CharClass::*;
    use LexState::*;

    match (state, class) {
        (AfterAmp, Space) => Ok(AfterAmp),
        (AfterAmp, Pipe) => Err(ShellError::UnexpectedChar('|')),
        (AfterAmp, Amp | Other) => Err(ShellError::UnexpectedChar('&')),

        (Start | AfterPipe, Pipe) => Err(ShellError::UnexpectedChar('|')),
        (Start | AfterPipe, Amp) => Err(ShellError::UnexpectedChar('&')),
        (s @ (Start | AfterPipe), Space) => Ok(s),

        (InToken | AfterToken, Space) => Ok(AfterToken),
        (InToken | AfterToken, Pipe) => Ok(AfterPipe),
        (InToken | AfterToken, Amp) => Ok(AfterAmp),

        (_, Other) => Ok(InToken),
    }
}

fn push_checked(buf: &mut String, c: char) -> Result<()> {
    buf.push(c);
    if buf.len() > MAX_LINE {
        return Err(ShellError::TooLong);
    }
    Ok(())
}

/// Validates a raw line (newline already stripped) and normalizes it.
pub fn tokenize(line: &str) -> Result<TokenizedLine> {
    if line.len() > MAX_LINE {
        return Err(ShellError::TooLong);
    }

    let mut buf = String::with_capacity(line.len());
    let mut state = LexState::Start;
    let mut stages = 0;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        let class = CharClass::of(c);
        let next = next_state(state, class)?;

        match class {
            CharClass::Space => {}
            CharClass::Pipe | CharClass::Amp => {
                if !buf.is_empty() {
                    push_checked(&mut buf, ' ')?;
                }
                push_checked(&mut buf, c)?;
                if class == CharClass::Pipe {
                    stages += 1;
                }
            }
            CharClass::Other => {
                if state != LexState::InToken && !buf.is_empty() {
                    push_checked(&mut buf, ' ')?;
                }
                push_checked(&mut buf, c)?;
                // The escape marker stays in the buffer; the builder resolves it.
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        push_checked(&mut buf, escaped)?;
                    }
                }
            }
        }
        state = next;
    }

    let background = match state {
        LexState::Start => false,
        // The stage before a trailing `|` was already counted; drop the `|`.
        LexState::AfterPipe => {
            buf.pop();
            false
        }
        LexState::InToken | LexState::AfterToken => {
            stages += 1;
            false
        }
        LexState::AfterAmp => {
            stages += 1;
            buf.pop();
            true
        }
    };
    let normalized = buf.trim_end().to_string();

    Ok(TokenizedLine {
        normalized,
        stages,
        background,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ok(line: &str) -> TokenizedLine {
        tokenize(line).expect("line should tokenize")
    }

    #[test]
    fn pipeline_in_background() {
        assert_eq!(
            ok("ls -l | grep foo &"),
            TokenizedLine {
                normalized: "ls -l | grep foo".into(),
                stages: 2,
                background: true,
            }
        );
    }

    #[test]
    fn collapses_whitespace_between_tokens() {
        let t = ok("  ls\t  -l   |grep   foo   ");
        assert_eq!(t.normalized, "ls -l | grep foo");
        assert_eq!(t.stages, 2);
        assert!(!t.background);
    }

    #[test]
    fn blank_line_has_no_stages() {
        let t = ok("   \t ");
        assert_eq!(t.normalized, "");
        assert_eq!(t.stages, 0);
    }

    #[test]
    fn adjacent_separators_are_rejected() {
        assert!(matches!(
            tokenize("cmd1 | | cmd2"),
            Err(ShellError::UnexpectedChar('|'))
        ));
        assert!(matches!(
            tokenize("cmd1 && cmd2"),
            Err(ShellError::UnexpectedChar('&'))
        ));
    }

    #[test]
    fn leading_separator_is_rejected() {
        assert!(matches!(tokenize("| ls"), Err(ShellError::UnexpectedChar('|'))));
        assert!(matches!(tokenize("  &"), Err(ShellError::UnexpectedChar('&'))));
    }

    #[test]
    fn content_after_background_marker_is_rejected() {
        assert!(matches!(
            tokenize("cmd1 &cmd2"),
            Err(ShellError::UnexpectedChar('&'))
        ));
        assert!(matches!(
            tokenize("cmd1 & | cmd2"),
            Err(ShellError::UnexpectedChar('|'))
        ));
    }

    #[test]
    fn trailing_spaces_after_background_marker_are_fine() {
        let t = ok("sleep 100 &   ");
        assert_eq!(t.normalized, "sleep 100");
        assert!(t.background);
        assert_eq!(t.stages, 1);
    }

    #[test]
    fn trailing_pipe_is_dropped() {
        assert_eq!(
            ok("ls |"),
            TokenizedLine {
                normalized: "ls".into(),
                stages: 1,
                background: false,
            }
        );
        let t = ok("ls -l | wc -l |  ");
        assert_eq!(t.normalized, "ls -l | wc -l");
        assert_eq!(t.stages, 2);
    }

    #[test]
    fn escapes_are_copied_verbatim() {
        let t = ok(r"echo a\ b\|c");
        assert_eq!(t.normalized, r"echo a\ b\|c");
        assert_eq!(t.stages, 1);
    }

    #[test]
    fn lone_trailing_backslash_is_plain() {
        assert_eq!(ok(r"echo \").normalized, r"echo \");
    }

    #[test]
    fn overlong_line_is_rejected() {
        let line = "a".repeat(MAX_LINE + 1);
        assert!(matches!(tokenize(&line), Err(ShellError::TooLong)));
    }

    #[test]
    fn overlong_normalized_buffer_is_rejected() {
        // Each "a|" becomes "a | ", so normalization grows past the limit.
        let line = "a|".repeat(MAX_LINE / 2 - 1) + "a";
        assert!(line.len() <= MAX_LINE);
        assert!(matches!(tokenize(&line), Err(ShellError::TooLong)));
    }

    #[test]
    fn transitions_from_each_state() {
        use CharClass::*;
        use LexState::*;

        assert_eq!(next_state(Start, Space).unwrap(), Start);
        assert_eq!(next_state(Start, Other).unwrap(), InToken);
        assert!(next_state(Start, Pipe).is_err());

        assert_eq!(next_state(InToken, Other).unwrap(), InToken);
        assert_eq!(next_state(InToken, Space).unwrap(), AfterToken);
        assert_eq!(next_state(InToken, Pipe).unwrap(), AfterPipe);
        assert_eq!(next_state(AfterToken, Amp).unwrap(), AfterAmp);

        assert_eq!(next_state(AfterPipe, Space).unwrap(), AfterPipe);
        assert_eq!(next_state(AfterPipe, Other).unwrap(), InToken);
        assert!(next_state(AfterPipe, Amp).is_err());

        assert_eq!(next_state(AfterAmp, Space).unwrap(), AfterAmp);
        assert!(next_state(AfterAmp, Other).is_err());
        assert!(next_state(AfterAmp, Amp).is_err());
    }
}
