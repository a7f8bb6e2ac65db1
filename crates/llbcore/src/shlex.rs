//! POSIX-ish shell word splitting and quoting for run command assembly.

use anyhow::{bail, Result};

/// Split a command string into words, honoring single quotes, double quotes,
/// and backslash escapes.
pub fn split(s: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = s.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut word = String::new();
        loop {
            match chars.peek() {
                None | Some(' ' | '\t' | '\n' | '\r') => break,
                Some('\'') => {
                    chars.next();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '\'' {
                            closed = true;
                            break;
                        }
                        word.push(c);
                    }
                    if !closed {
                        bail!("ERROR_EVAL unterminated single quote");
                    }
                }
                Some('"') => {
                    chars.next();
                    let mut closed = false;
                    while let Some(c) = chars.next() {
                        match c {
                            '"' => {
                                closed = true;
                                break;
                            }
                            '\\' => match chars.next() {
                                Some(e) => word.push(e),
                                None => bail!("ERROR_EVAL unterminated escape"),
                            },
                            _ => word.push(c),
                        }
                    }
                    if !closed {
                        bail!("ERROR_EVAL unterminated double quote");
                    }
                }
                Some('\\') => {
                    chars.next();
                    match chars.next() {
                        Some(e) => word.push(e),
                        None => bail!("ERROR_EVAL unterminated escape"),
                    }
                }
                Some(_) => {
                    word.push(chars.next().unwrap());
                }
            }
        }
        words.push(word);
    }

    Ok(words)
}

/// Join words into a single command string, quoting words that need it.
pub fn join(words: &[String]) -> String {
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&quote(w));
    }
    out
}

fn is_bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

fn quote(w: &str) -> String {
    if !w.is_empty() && w.chars().all(is_bare) {
        return w.to_string();
    }
    let mut out = String::with_capacity(w.len() + 2);
    out.push('\'');
    for c in w.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_words() {
        assert_eq!(split("echo hi").unwrap(), vec!["echo", "hi"]);
        assert_eq!(split("  a   b ").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn split_quoted() {
        assert_eq!(split("a 'b c' d").unwrap(), vec!["a", "b c", "d"]);
        assert_eq!(split(r#"a "b \" c""#).unwrap(), vec!["a", "b \" c"]);
        assert_eq!(split(r"a\ b").unwrap(), vec!["a b"]);
    }

    #[test]
    fn split_single_word() {
        assert_eq!(split("nginx").unwrap(), vec!["nginx"]);
    }

    #[test]
    fn split_unterminated_is_error() {
        let err = split("echo 'oops").unwrap_err();
        assert!(err.to_string().contains("ERROR_EVAL"));
    }

    #[test]
    fn join_quotes_words_with_spaces() {
        let words = vec!["a".to_string(), "b c".to_string()];
        assert_eq!(join(&words), "a 'b c'");
    }

    #[test]
    fn join_shell_wrapper() {
        let words = vec!["/bin/sh".to_string(), "-c".to_string(), "echo hi".to_string()];
        assert_eq!(join(&words), "/bin/sh -c 'echo hi'");
    }

    #[test]
    fn join_empty_word() {
        assert_eq!(join(&["".to_string()]), "''");
    }

    #[test]
    fn join_embedded_single_quote() {
        assert_eq!(join(&["it's".to_string()]), r"'it'\''s'");
    }
}
