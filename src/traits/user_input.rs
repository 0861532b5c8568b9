use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Response type for mock user input
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    Select(String),
    Text(String),
    Confirm(bool),
    /// Accept whatever default the prompt offers
    Default,
    /// Answer a select with a label that is not one of its options
    OffMenu(String),
}

/// Trait for user input operations to enable testing with mocks
pub trait UserInput: Send + Sync {
    /// Display a selection prompt with options, preselecting `default` when it is one of them
    fn select(
        &self,
        prompt: &str,
        options: Vec<String>,
        default: Option<&str>,
        help: Option<&str>,
    ) -> Result<String>;

    /// Display a text input prompt
    fn text(&self, prompt: &str, default: Option<&str>, help: Option<&str>) -> Result<String>;

    /// Display a confirmation prompt (yes/no)
    fn confirm(&self, prompt: &str, default: bool, help: Option<&str>) -> Result<bool>;
}

/// Real user input implementation using inquire crate
pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn select(
        &self,
        prompt: &str,
        options: Vec<String>,
        default: Option<&str>,
        help: Option<&str>,
    ) -> Result<String> {
        use inquire::Select;
        let cursor = default
            .and_then(|d| options.iter().position(|o| o == d))
            .unwrap_or(0);
        let mut select = Select::new(prompt, options).with_starting_cursor(cursor);
        if let Some(help) = help {
            select = select.with_help_message(help);
        }
        let answer = select.prompt()?;
        Ok(answer)
    }

    fn text(&self, prompt: &str, default: Option<&str>, help: Option<&str>) -> Result<String> {
        use inquire::Text;
        let mut text_prompt = Text::new(prompt);
        if let Some(default_val) = default.filter(|d| !d.is_empty()) {
            text_prompt = text_prompt.with_default(default_val);
        }
        if let Some(help) = help {
            text_prompt = text_prompt.with_help_message(help);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer)
    }

    fn confirm(&self, prompt: &str, default: bool, help: Option<&str>) -> Result<bool> {
        use inquire::Confirm;
        let mut confirm = Confirm::new(prompt).with_default(default);
        if let Some(help) = help {
            confirm = confirm.with_help_message(help);
        }
        let answer = confirm.prompt()?;
        Ok(answer)
    }
}

/// Mock user input implementation for testing
///
/// Every prompt message is recorded, so tests can assert which questions were
/// (or were not) asked.
#[allow(dead_code)]
pub struct MockUserInput {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockUserInput {
    /// Create new mock with no pre-configured responses
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create mock with pre-configured responses
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create mock that accepts the default for the next `count` prompts
    pub fn accepting_defaults(count: usize) -> Self {
        Self::with_responses(vec![MockResponse::Default; count])
    }

    /// Number of responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// All prompt messages shown so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Whether any prompt containing `fragment` was shown
    pub fn was_asked(&self, fragment: &str) -> bool {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.contains(fragment))
    }

    /// Get the next response from the queue
    fn next_response(&self, prompt: &str) -> Result<MockResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more mock responses available for '{}'", prompt))
    }
}

impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for MockUserInput {
    fn select(
        &self,
        prompt: &str,
        options: Vec<String>,
        default: Option<&str>,
        _help: Option<&str>,
    ) -> Result<String> {
        let answer = match self.next_response(prompt)? {
            MockResponse::Select(answer) => answer,
            MockResponse::OffMenu(answer) => return Ok(answer),
            MockResponse::Default => match default {
                Some(d) => d.to_string(),
                None => options.first().cloned().unwrap_or_default(),
            },
            _ => anyhow::bail!("Expected Select response but got a different type"),
        };

        // Verify the answer is in the options
        if options.contains(&answer) {
            Ok(answer)
        } else {
            anyhow::bail!(
                "Mock response '{}' is not in the provided options: {:?}",
                answer,
                options
            )
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>, _help: Option<&str>) -> Result<String> {
        match self.next_response(prompt)? {
            MockResponse::Text(answer) => Ok(answer),
            MockResponse::Default => Ok(default.unwrap_or_default().to_string()),
            _ => anyhow::bail!("Expected Text response but got a different type"),
        }
    }

    fn confirm(&self, prompt: &str, default: bool, _help: Option<&str>) -> Result<bool> {
        match self.next_response(prompt)? {
            MockResponse::Confirm(answer) => Ok(answer),
            MockResponse::Default => Ok(default),
            _ => anyhow::bail!("Expected Confirm response but got a different type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_default_uses_prompt_default() {
        let input = MockUserInput::accepting_defaults(3);

        assert!(input.confirm("Enable?", true, None).unwrap());
        assert_eq!(input.text("Path:", Some("/grafana"), None).unwrap(), "/grafana");
        assert_eq!(
            input
                .select("Pick", vec!["a".into(), "b".into()], Some("b"), None)
                .unwrap(),
            "b"
        );
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_mock_records_prompts() {
        let input = MockUserInput::with_responses(vec![MockResponse::Confirm(false)]);
        input.confirm("Do you want to enable Grafana?", true, None).unwrap();

        assert!(input.was_asked("Grafana"));
        assert_eq!(input.prompts().len(), 1);
    }

    #[test]
    fn test_mock_rejects_unknown_option() {
        let input = MockUserInput::with_responses(vec![MockResponse::Select("c".into())]);
        let result = input.select("Pick", vec!["a".into(), "b".into()], None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_off_menu_answer_is_returned_as_is() {
        let input = MockUserInput::with_responses(vec![MockResponse::OffMenu("c".into())]);
        let answer = input
            .select("Pick", vec!["a".into(), "b".into()], None, None)
            .unwrap();
        assert_eq!(answer, "c");
    }

    #[test]
    fn test_mock_runs_out_of_responses() {
        let input = MockUserInput::new();
        assert!(input.confirm("Enable?", false, None).is_err());
    }
}
