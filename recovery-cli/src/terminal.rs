// SPDX-License-Identifier: GPL-3.0-only

use std::io::{self, BufRead, Write};

use recovery_contracts::Prompt;

/// Numbered menus on stdout, answers read from stdin.
///
/// An empty line, `b` or end of input goes back.
pub(crate) struct TerminalPrompt<R> {
    input: R,
}

impl TerminalPrompt<io::StdinLock<'static>> {
    pub(crate) fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    fn read_choice(&mut self, count: usize) -> Option<usize> {
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            match parse_choice(&line, count) {
                Choice::Back => return None,
                Choice::Item(index) => return Some(index),
                Choice::Invalid => println!("Enter 1-{count}, or b to go back"),
            }
        }
    }
}

impl<R: BufRead> Prompt for TerminalPrompt<R> {
    fn select(&mut self, headers: &[&str], items: &[String]) -> Option<usize> {
        println!();
        for header in headers {
            println!("{header}");
        }
        for (index, item) in items.iter().enumerate() {
            println!("{:>3}. {}", index + 1, item);
        }
        self.read_choice(items.len())
    }

    fn print(&mut self, line: &str) {
        println!("{line}");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Back,
    Item(usize),
    Invalid,
}

fn parse_choice(line: &str, count: usize) -> Choice {
    let answer = line.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("b") {
        return Choice::Back;
    }
    match answer.parse::<usize>() {
        Ok(number) if (1..=count).contains(&number) => Choice::Item(number - 1),
        _ => Choice::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice("1\n", 3), Choice::Item(0));
        assert_eq!(parse_choice(" 3 ", 3), Choice::Item(2));
        assert_eq!(parse_choice("4", 3), Choice::Invalid);
        assert_eq!(parse_choice("0", 3), Choice::Invalid);
        assert_eq!(parse_choice("x", 3), Choice::Invalid);
        assert_eq!(parse_choice("\n", 3), Choice::Back);
        assert_eq!(parse_choice("B", 3), Choice::Back);
    }

    #[test]
    fn end_of_input_goes_back() {
        let mut prompt = TerminalPrompt {
            input: "7\n2\n".as_bytes(),
        };
        let items = vec!["No".to_string(), "Yes".to_string()];
        assert_eq!(prompt.select(&["Confirm?"], &items), Some(1));
        assert_eq!(prompt.select(&["Confirm?"], &items), None);
    }
}
