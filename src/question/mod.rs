//! Batched interactive questions on top of [`UserInput`].
//!
//! A batch is a list of [`Question`] descriptors, each writing its answer into a
//! caller-owned destination. Questions run strictly in order and the first failure
//! aborts the batch; destinations filled by earlier questions keep their answers.

mod choice;

pub use choice::{MenuChoice, SKIP, ask_choice};

use crate::error::ServiceError;
use crate::traits::UserInput;

/// Message and optional help text shared by all question kinds
#[derive(Debug, Clone)]
pub struct QuestionBase {
    pub message: String,
    pub help: Option<String>,
}

impl QuestionBase {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }
}

/// One prompt together with its default and answer destination
pub enum Question<'a> {
    Confirm {
        base: QuestionBase,
        default: bool,
        output: &'a mut bool,
    },
    Input {
        base: QuestionBase,
        default: String,
        output: &'a mut String,
    },
    Select {
        base: QuestionBase,
        options: Vec<String>,
        default: String,
        output: &'a mut String,
    },
}

impl<'a> Question<'a> {
    pub fn confirm(message: impl Into<String>, default: bool, output: &'a mut bool) -> Self {
        Question::Confirm {
            base: QuestionBase::new(message),
            default,
            output,
        }
    }

    pub fn input(
        message: impl Into<String>,
        default: impl Into<String>,
        output: &'a mut String,
    ) -> Self {
        Question::Input {
            base: QuestionBase::new(message),
            default: default.into(),
            output,
        }
    }

    pub fn select(
        message: impl Into<String>,
        options: Vec<String>,
        default: impl Into<String>,
        output: &'a mut String,
    ) -> Self {
        Question::Select {
            base: QuestionBase::new(message),
            options,
            default: default.into(),
            output,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        match &mut self {
            Question::Confirm { base, .. }
            | Question::Input { base, .. }
            | Question::Select { base, .. } => base.help = Some(help.into()),
        }
        self
    }

    fn run(self, input: &dyn UserInput) -> anyhow::Result<()> {
        match self {
            Question::Confirm {
                base,
                default,
                output,
            } => {
                *output = input.confirm(&base.message, default, base.help.as_deref())?;
            }
            Question::Input {
                base,
                default,
                output,
            } => {
                *output = input.text(&base.message, Some(&default), base.help.as_deref())?;
            }
            Question::Select {
                base,
                options,
                default,
                output,
            } => {
                debug_assert!(!options.is_empty(), "select needs at least one option");
                let default = options.contains(&default).then_some(default.as_str());
                *output = input.select(&base.message, options, default, base.help.as_deref())?;
            }
        }
        Ok(())
    }
}

/// Ask every question in order, stopping at the first failure
pub fn ask(input: &dyn UserInput, questions: Vec<Question<'_>>) -> Result<(), ServiceError> {
    for question in questions {
        question
            .run(input)
            .map_err(|e| ServiceError::PromptIo(format!("{:#}", e)))?;
    }
    Ok(())
}

/// Ask a single confirm question
pub fn ask_confirm(
    input: &dyn UserInput,
    message: impl Into<String>,
    default: bool,
) -> Result<bool, ServiceError> {
    let mut answer = false;
    ask(input, vec![Question::confirm(message, default, &mut answer)])?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockResponse, MockUserInput};

    #[test]
    fn test_answers_land_in_destinations() {
        let input = MockUserInput::with_responses(vec![
            MockResponse::Confirm(true),
            MockResponse::Text("gp2".to_string()),
            MockResponse::Select("b".to_string()),
        ]);

        let mut enabled = false;
        let mut class = String::new();
        let mut choice = String::new();
        ask(
            &input,
            vec![
                Question::confirm("Enable?", false, &mut enabled),
                Question::input("Class:", "", &mut class).with_help("Leave empty for default"),
                Question::select("Pick", vec!["a".into(), "b".into()], "a", &mut choice),
            ],
        )
        .unwrap();

        assert!(enabled);
        assert_eq!(class, "gp2");
        assert_eq!(choice, "b");
    }

    #[test]
    fn test_failure_aborts_batch_without_rollback() {
        let input = MockUserInput::with_responses(vec![MockResponse::Text("first".to_string())]);

        let mut first = String::new();
        let mut second = String::from("untouched");
        let mut third = false;
        let err = ask(
            &input,
            vec![
                Question::input("First:", "", &mut first),
                Question::input("Second:", "", &mut second),
                Question::confirm("Third?", true, &mut third),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, ServiceError::PromptIo(_)));
        assert_eq!(first, "first");
        assert_eq!(second, "untouched");
        assert_eq!(input.prompts(), vec!["First:", "Second:"]);
    }

    #[test]
    fn test_defaults_are_offered() {
        let input = MockUserInput::accepting_defaults(2);

        let mut path = String::new();
        let mut choice = String::new();
        ask(
            &input,
            vec![
                Question::input("Path:", "/grafana", &mut path),
                Question::select("Pick", vec!["a".into(), "b".into()], "b", &mut choice),
            ],
        )
        .unwrap();

        assert_eq!(path, "/grafana");
        assert_eq!(choice, "b");
    }
}
