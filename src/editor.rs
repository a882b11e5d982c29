use std::fmt;

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Helper};

use crate::errors::Result;
use crate::shell::builtins;

/// Lines kept for up-arrow recall. Never written to disk.
const HISTORY_CAPACITY: usize = 100;

/// Completes builtin names in command position and file names elsewhere.
struct LineHelper {
    files: FilenameCompleter,
}

impl Completer for LineHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> ::std::result::Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        if before.trim_start().contains(char::is_whitespace) {
            return self.files.complete(line, pos, ctx);
        }

        let start = before.len() - before.trim_start().len();
        let word = &before[start..];
        let candidates: Vec<Pair> = builtins::names()
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect();

        if candidates.is_empty() {
            self.files.complete(line, pos, ctx)
        } else {
            Ok((start, candidates))
        }
    }
}

impl Hinter for LineHelper {
    type Hint = String;
}

impl Highlighter for LineHelper {}

impl Validator for LineHelper {}

impl Helper for LineHelper {}

/// Reads input lines for the shell, with completion and an in-memory history.
pub struct Editor {
    lines: rustyline::Editor<LineHelper>,
}

impl Editor {
    pub fn new() -> Editor {
        let config = Config::builder()
            .max_history_size(HISTORY_CAPACITY)
            .history_ignore_dups(true)
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .build();

        let mut lines = rustyline::Editor::with_config(config);
        lines.set_helper(Some(LineHelper {
            files: FilenameCompleter::new(),
        }));

        Editor { lines }
    }

    /// Reads one line. Returns `None` at end of input; ^C yields an empty line.
    pub fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.lines.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn add_history_entry(&mut self, line: &str) {
        self.lines.add_history_entry(line);
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Editor({} history entries)", self.lines.history().len())
    }
}

#[cfg(test)]
mod tests {
    use rustyline::history::History;

    use super::*;

    fn complete(line: &str) -> (usize, Vec<String>) {
        let helper = LineHelper {
            files: FilenameCompleter::new(),
        };
        let history = History::new();
        let ctx = Context::new(&history);
        let (start, pairs) = helper.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_history_skips_duplicates_and_blank_prefixed_lines() {
        let mut editor = Editor::new();
        editor.add_history_entry("jobs");
        editor.add_history_entry("jobs");
        editor.add_history_entry(" secret");
        assert_eq!(editor.lines.history().len(), 1);
    }

    #[test]
    fn test_completes_builtin_names() {
        assert_eq!(complete("  gl"), (2, vec!["globalusage ".to_string()]));
        let (_, mut names) = complete("q");
        names.sort();
        assert_eq!(names, vec!["quit ".to_string()]);
    }
}
