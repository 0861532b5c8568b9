pub mod backend;
pub mod output;
pub mod user_input;

pub use backend::{
    BackendClient, BackendSettings, HttpBackendClient, SecretItem, ServiceDetails, ServiceStatus,
};
pub use output::{Output, TerminalOutput};
pub use user_input::{InquireUserInput, UserInput};

#[cfg(test)]
pub use backend::{BackendCall, MockBackend};
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
#[cfg(test)]
pub use user_input::{MockResponse, MockUserInput};
