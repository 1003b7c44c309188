use inquire::{InquireError, Password, Text};
use miette::Diagnostic;

pub(crate) fn get_input(prompt: &str) -> Result<String, Error> {
    Text::new(prompt).prompt().map_err(Error)
}

pub(crate) fn get_password(prompt: &str) -> Result<String, Error> {
    Password::new(prompt)
        .with_display_toggle_enabled()
        .without_confirmation()
        .prompt()
        .map_err(Error)
}

#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("Failed to get user input")]
#[diagnostic(
    code(prompt),
    help("Jira credentials were not provided, and they could not be read interactively. Pass --username and --password, set JIRA_USERNAME and JIRA_PASSWORD, or add them to the config file."),
)]
pub(crate) struct Error(#[from] InquireError);
