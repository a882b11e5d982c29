/// Splits a raw command line into whitespace-delimited tokens.
///
/// Runs of whitespace separate tokens, so no token is ever empty. There is no
/// quoting or escape processing: `"a b"` yields two tokens, `"a` and `b"`.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}
