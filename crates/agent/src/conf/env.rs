//! `$NAME` substitution on raw config text.
//!
//! Substitution runs on the bytes before TOML parsing, so a value lands in
//! whatever syntactic position its token occupied. String settings need the
//! token quoted in the file (`"$USER"`); numbers and booleans use it bare.

use std::sync::LazyLock;

use grep_matcher::Matcher;
use grep_regex::RegexMatcher;

const ENV_VAR_PATTERN: &str = r"\$[A-Za-z0-9_]+";

static ENV_VAR_MATCHER: LazyLock<RegexMatcher> = LazyLock::new(|| {
    RegexMatcher::new(ENV_VAR_PATTERN).expect("environment variable pattern is valid")
});

/// Escape a value for embedding inside a TOML basic string.
pub fn escape_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

/// Replace every `$NAME` token whose variable `lookup` resolves. Tokens that
/// do not resolve stay in the text verbatim.
pub fn substitute_with<F>(contents: &[u8], lookup: F) -> Vec<u8>
where
    F: Fn(&str) -> Option<String>,
{
    let mut spans = Vec::new();
    let found = ENV_VAR_MATCHER.find_iter(contents, |m| {
        spans.push((m.start(), m.end()));
        true
    });
    if let Err(e) = found {
        tracing::warn!(error = %e, "Environment variable scan failed");
        return contents.to_vec();
    }

    let mut out = Vec::with_capacity(contents.len());
    let mut cursor = 0;
    for (start, end) in spans {
        out.extend_from_slice(&contents[cursor..start]);
        // the pattern is ASCII-only, so the token is valid UTF-8
        let name = String::from_utf8_lossy(&contents[start + 1..end]);
        match lookup(&name) {
            Some(value) => out.extend_from_slice(escape_env(&value).as_bytes()),
            None => out.extend_from_slice(&contents[start..end]),
        }
        cursor = end;
    }
    out.extend_from_slice(&contents[cursor..]);
    out
}

/// Substitute from the process environment.
pub fn substitute_env_vars(contents: &[u8]) -> Vec<u8> {
    substitute_with(contents, |name| {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    })
}
