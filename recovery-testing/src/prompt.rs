// SPDX-License-Identifier: GPL-3.0-only

use std::collections::VecDeque;

use recovery_contracts::Prompt;

/// One menu as it was shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownMenu {
    pub headers: Vec<String>,
    pub items: Vec<String>,
}

/// Answers menus from a fixed script; an exhausted script backs out
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<usize>>,
    pub menus: Vec<ShownMenu>,
    pub printed: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn last_menu(&self) -> Option<&ShownMenu> {
        self.menus.last()
    }

    pub fn printed_line(&self, needle: &str) -> bool {
        self.printed.iter().any(|line| line.contains(needle))
    }
}

impl Prompt for ScriptedPrompt {
    fn select(&mut self, headers: &[&str], items: &[String]) -> Option<usize> {
        self.menus.push(ShownMenu {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            items: items.to_vec(),
        });
        self.answers.pop_front().flatten()
    }

    fn print(&mut self, line: &str) {
        self.printed.push(line.to_string());
    }
}
