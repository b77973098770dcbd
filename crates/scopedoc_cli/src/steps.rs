//! Parsing of scripted CLI steps into editor commands.
//!
//! Grammar (one step per argument):
//! `edit`, `save`, `ctrl+s`, `esc`, `add-objective`, `add-constraint`,
//! `delete:<objective-id>`, `delete-row:<index>`, `criterion:<id>`, `theme`,
//! `leave`, `wait:<ms>`, `set:<field>=<text>`.

use scopedoc_core::{Command, ItemRef, Key, KeyChord, TextField};
use std::fmt::{Display, Formatter};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Dispatch(Command),
    /// Advance the session clock, then deliver a timer tick.
    Wait(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepParseError {
    pub step: String,
    pub reason: &'static str,
}

impl Display for StepParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid step `{}`: {}", self.step, self.reason)
    }
}

impl std::error::Error for StepParseError {}

pub fn parse_step(raw: &str) -> Result<Step, StepParseError> {
    let fail = |reason| StepParseError {
        step: raw.to_string(),
        reason,
    };
    let step = raw.trim();

    let command = match step {
        "edit" => Command::ToggleEditMode,
        "save" => Command::Save,
        "ctrl+s" => Command::KeyPress(KeyChord::ctrl(Key::Char('s'))),
        "esc" => Command::KeyPress(KeyChord::plain(Key::Escape)),
        "add-objective" => Command::AddObjective,
        "add-constraint" => Command::AddConstraint,
        "theme" => Command::ToggleTheme,
        "leave" => Command::NavigateAway,
        _ => {
            let (verb, arg) = step.split_once(':').ok_or_else(|| fail("unknown step"))?;
            match verb {
                "delete" => Command::DeleteItem(ItemRef::Objective(arg.to_string())),
                "delete-row" => Command::DeleteItem(ItemRef::ConstraintRow(
                    arg.parse().map_err(|_| fail("row index must be a number"))?,
                )),
                "criterion" => Command::ToggleCriterion(arg.to_string()),
                "wait" => {
                    let ms = arg
                        .parse::<i64>()
                        .ok()
                        .filter(|ms| *ms >= 0)
                        .ok_or_else(|| fail("wait needs non-negative milliseconds"))?;
                    return Ok(Step::Wait(ms));
                }
                "set" => {
                    let (field, text) = arg
                        .split_once('=')
                        .ok_or_else(|| fail("expected set:<field>=<text>"))?;
                    Command::EditText {
                        field: parse_field(field).ok_or_else(|| fail("unknown field"))?,
                        text: text.to_string(),
                    }
                }
                _ => return Err(fail("unknown step")),
            }
        }
    };

    Ok(Step::Dispatch(command))
}

fn parse_field(raw: &str) -> Option<TextField> {
    match raw {
        "title" => return Some(TextField::Title),
        "objective" => return Some(TextField::Objective),
        _ => {}
    }

    let (kind, arg) = raw.split_once('.')?;
    let index = || arg.parse::<usize>().ok();
    match kind {
        "oe" => Some(TextField::SpecificObjective(arg.to_string())),
        "criterion" => Some(TextField::Criterion(arg.to_string())),
        "in" => index().map(TextField::InScope),
        "out" => index().map(TextField::OutScope),
        "param" => index().map(TextField::ConstraintParameter),
        "value" => index().map(TextField::ConstraintValue),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_step, Step};
    use scopedoc_core::{Command, ItemRef, Key, KeyChord, TextField};

    #[test]
    fn parses_plain_steps() {
        assert_eq!(parse_step("edit").unwrap(), Step::Dispatch(Command::ToggleEditMode));
        assert_eq!(
            parse_step("ctrl+s").unwrap(),
            Step::Dispatch(Command::KeyPress(KeyChord::ctrl(Key::Char('s'))))
        );
        assert_eq!(parse_step("wait:30000").unwrap(), Step::Wait(30_000));
    }

    #[test]
    fn parses_item_and_field_references() {
        assert_eq!(
            parse_step("delete-row:2").unwrap(),
            Step::Dispatch(Command::DeleteItem(ItemRef::ConstraintRow(2)))
        );
        assert_eq!(
            parse_step("set:oe.oe3=Revisar alcance").unwrap(),
            Step::Dispatch(Command::EditText {
                field: TextField::SpecificObjective("oe3".to_string()),
                text: "Revisar alcance".to_string(),
            })
        );
        assert_eq!(
            parse_step("set:title=a=b").unwrap(),
            Step::Dispatch(Command::EditText {
                field: TextField::Title,
                text: "a=b".to_string(),
            })
        );
    }

    #[test]
    fn rejects_malformed_steps() {
        assert!(parse_step("dance").is_err());
        assert!(parse_step("wait:-5").is_err());
        assert!(parse_step("delete-row:x").is_err());
        assert!(parse_step("set:in.x=1").is_err());
        assert_eq!(
            parse_step("set:nope").unwrap_err().reason,
            "expected set:<field>=<text>"
        );
    }
}
