use log::debug;

use crate::prompt::{self, get_input, get_password};

/// Basic-auth credentials for the Jira server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Use the username and password from flags, environment, or config file, prompting for whichever
/// is still missing.
pub(crate) fn get_or_prompt(
    username: Option<String>,
    password: Option<String>,
) -> Result<Credentials, prompt::Error> {
    let username = match non_empty(username) {
        Some(username) => username,
        None => get_input("Username:")?,
    };
    let password = match non_empty(password) {
        Some(password) => password,
        None => {
            debug!("No password configured for {username}, prompting");
            get_password("Password:")?
        }
    };
    Ok(Credentials { username, password })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
