//! rustyline helper: command and question completion, hints, highlighting.

use crate::command::COMMANDS;
use colored::Colorize;
use datachat_core::suggestion::keywords::KEYWORD_TABLE;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

#[derive(Clone)]
pub struct CliHelper {
    questions: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        let mut questions: Vec<String> = Vec::new();
        for (_, entries) in KEYWORD_TABLE {
            for question in entries.iter().copied() {
                if !questions.iter().any(|q| q.as_str() == question) {
                    questions.push(question.to_string());
                }
            }
        }
        Self { questions }
    }

    fn matching_questions<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a String> + use<'a> {
        let prefix = prefix.to_lowercase();
        self.questions
            .iter()
            .filter(move |q| !prefix.trim().is_empty() && q.to_lowercase().starts_with(&prefix))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        let candidates: Vec<Pair> = if line.starts_with(':') {
            COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect()
        } else {
            self.matching_questions(line)
                .map(|q| Pair {
                    display: q.clone(),
                    replacement: q.clone(),
                })
                .collect()
        };
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with(':') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with(':') {
            if line.contains(' ') {
                return None;
            }
            return COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string());
        }

        self.matching_questions(line)
            .find(|q| q.len() > line.len())
            .and_then(|q| q.get(line.len()..))
            .map(str::to_string)
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_are_deduplicated() {
        let helper = CliHelper::new();
        let mut sorted = helper.questions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), helper.questions.len());
    }

    #[test]
    fn question_prefix_matches_case_insensitively() {
        let helper = CliHelper::new();
        let hits: Vec<&String> = helper.matching_questions("what are all the col").collect();
        assert_eq!(hits, vec!["What are all the column names in this dataset?"]);
        assert_eq!(helper.matching_questions("  ").count(), 0);
    }
}
