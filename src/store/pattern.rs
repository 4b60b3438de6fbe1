//! SQL `LIKE` pattern helpers shared by the stores.

/// Build the pattern used by the report search: `%needle%`.
///
/// The needle is passed through untouched, so `%` and `_` typed by the
/// caller keep their wildcard meaning, as they do against MySQL.
pub fn contains_pattern(needle: &str) -> String {
    format!("%{needle}%")
}

/// Match `value` against a `LIKE` pattern, case-insensitively.
///
/// `%` matches any run of characters, `_` exactly one, and `\` escapes the
/// next character. This mirrors MySQL under its default `_ci` collations.
pub fn like_matches(pattern: &str, value: &str) -> bool {
    let pattern = tokenize(pattern);
    let value: Vec<char> = value.chars().flat_map(char::to_lowercase).collect();

    // dp[j]: pattern[..i] matches value[..j]
    let mut dp = vec![false; value.len() + 1];
    dp[0] = true;

    for token in &pattern {
        let mut next = vec![false; value.len() + 1];
        match token {
            Token::AnyRun => {
                let mut seen = false;
                for j in 0..=value.len() {
                    seen |= dp[j];
                    next[j] = seen;
                }
            }
            Token::AnyOne => {
                for j in 1..=value.len() {
                    next[j] = dp[j - 1];
                }
            }
            Token::Literal(c) => {
                for j in 1..=value.len() {
                    next[j] = dp[j - 1] && value[j - 1] == *c;
                }
            }
        }
        dp = next;
    }

    dp[value.len()]
}

#[derive(Debug, PartialEq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => tokens.push(Token::AnyRun),
            '_' => tokens.push(Token::AnyOne),
            '\\' => {
                // A trailing backslash matches itself.
                let escaped = chars.next().unwrap_or('\\');
                tokens.extend(escaped.to_lowercase().map(Token::Literal));
            }
            other => tokens.extend(other.to_lowercase().map(Token::Literal)),
        }
    }
    tokens
}
