use super::{Question, ask};
use crate::error::ServiceError;
use crate::traits::UserInput;

/// Menu label that maps to "no choice"
pub const SKIP: &str = "skip";

/// Closed set of options with a display label and a backend string per member
pub trait MenuChoice: Copy + PartialEq + 'static {
    /// Every member, in menu order
    const ALL: &'static [Self];

    /// Label shown to the operator
    fn label(self) -> &'static str;

    /// String used in stored documents
    fn wire(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    fn from_wire(wire: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.wire() == wire)
    }
}

/// Ask a single-select over every member of `C`.
///
/// With `allow_skip` a leading "skip" option is offered and maps to `None`.
/// A label that does not belong to the menu is a contract violation.
pub fn ask_choice<C: MenuChoice>(
    input: &dyn UserInput,
    message: &str,
    field: &str,
    default: Option<C>,
    allow_skip: bool,
) -> Result<Option<C>, ServiceError> {
    let mut options: Vec<String> = Vec::with_capacity(C::ALL.len() + 1);
    if allow_skip {
        options.push(SKIP.to_string());
    }
    options.extend(C::ALL.iter().map(|c| c.label().to_string()));

    let default_label = match default {
        Some(c) => c.label(),
        None if allow_skip => SKIP,
        None => C::ALL.first().map(|c| c.label()).unwrap_or_default(),
    };

    let mut answer = String::new();
    ask(
        input,
        vec![Question::select(message, options, default_label, &mut answer)],
    )?;

    if allow_skip && answer == SKIP {
        return Ok(None);
    }
    C::from_label(&answer)
        .map(Some)
        .ok_or_else(|| ServiceError::UnsupportedChoice {
            field: field.to_string(),
            choice: answer,
        })
}
