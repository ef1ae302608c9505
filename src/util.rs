use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::client::is_silent;

/// Split a console line into words. Double or single quotes group words,
/// a backslash escapes the next character.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("trailing backslash".into()),
            },
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    out.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_word {
        out.push(current);
    }
    Ok(out)
}

pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    if s.is_empty() {
        return "".into();
    }
    let s = if let Some(idx) = s.find("://") { &s[idx + 3..] } else { s };
    let host = s.split('/').next().unwrap_or(s);
    host.to_string()
}

/// Spinner shown on stderr while a request is in flight. Hidden when the
/// request echo is silenced.
pub fn spinner(message: &str) -> ProgressBar {
    if is_silent() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_args_handles_quotes() {
        assert_eq!(
            split_args(r#"create username=kim fullname="Kim Lee" role='reporter'"#).unwrap(),
            vec!["create", "username=kim", "fullname=Kim Lee", "role=reporter"]
        );
    }

    #[test]
    fn split_args_keeps_empty_quoted_word() {
        assert_eq!(split_args(r#"set fullname="""#).unwrap(), vec!["set", "fullname="]);
        assert_eq!(split_args(r#"x "" y"#).unwrap(), vec!["x", "", "y"]);
    }

    #[test]
    fn split_args_rejects_open_quote() {
        assert!(split_args(r#"set fullname="Kim"#).is_err());
        assert!(split_args("trailing\\").is_err());
    }

    #[test]
    fn hostname_strips_scheme_and_path() {
        assert_eq!(hostname_from_url("https://admin.example.org/app"), "admin.example.org");
        assert_eq!(hostname_from_url(""), "");
    }
}
