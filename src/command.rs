//! Line commands typed at the terminal, mapped onto controller actions.

use std::str::FromStr;

use anyhow::{bail, Context};

use crate::controller::{Action, FilterInput, FormField};
use crate::models::StudentId;
use crate::pipeline::SortColumn;

pub const HELP: &str = "\
commands:
  set <field> <value>     fields: surname name lastname birthday studyStart faculty
  blur <field> | focus <field>
  submit | cancel
  edit <id> | delete <id>
  sort <fio|birthday|studyStart|faculty>
  filter <fio|faculty|start|end> [value]
  search [value]
  show | help | quit";

#[derive(Debug, Clone)]
pub enum Command {
    Dispatch(Action),
    Help,
    Quit,
}

fn split(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line.trim_end(), ""),
    }
}

fn id(rest: &str) -> anyhow::Result<StudentId> {
    let id = rest.trim();
    if id.is_empty() {
        bail!("missing student id");
    }
    Ok(StudentId::new(id))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = split(line);
        let action = match verb {
            "set" => {
                let (field, value) = split(rest);
                Action::FieldInput(field.parse()?, value.to_string())
            }
            "blur" => Action::FieldBlur(rest.parse::<FormField>()?),
            "focus" => Action::FieldFocus(rest.parse::<FormField>()?),
            "submit" => Action::Submit,
            "cancel" => Action::Cancel,
            "edit" => Action::Edit(id(rest)?),
            "delete" => Action::Delete(id(rest)?),
            "sort" => Action::SortBy(rest.parse::<SortColumn>()?),
            "filter" => {
                let (input, value) = split(rest);
                let input: FilterInput = input.parse().context("usage: filter <input> [value]")?;
                Action::FilterChanged(input, value.to_string())
            }
            "search" => Action::FilterChanged(FilterInput::Search, rest.to_string()),
            "show" => Action::Redraw,
            "help" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            "" => bail!("empty command"),
            other => bail!("unknown command `{}`; try `help`", other),
        };
        Ok(Command::Dispatch(action))
    }
}
