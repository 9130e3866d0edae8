//! Interactive credential entry

use crate::error::{Error, Result, ResultExt};
use crate::types::Credentials;
use std::io::{self, BufRead, Write};

/// Source of answers to credential prompts
pub trait Prompt {
    /// Read one echoed line
    fn line(&mut self, message: &str) -> io::Result<String>;

    /// Read one line without echo
    fn secret(&mut self, message: &str) -> io::Result<String>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn line(&mut self, message: &str) -> io::Result<String> {
        print!("{message}");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input)
    }

    fn secret(&mut self, message: &str) -> io::Result<String> {
        rpassword::prompt_password(message)
    }
}

/// Credentials from flags or environment, prompting for whatever is missing.
///
/// Values are trimmed. Either one ending up empty is an error.
pub fn resolve_credentials(
    session_id: Option<String>,
    hall_ticket: Option<String>,
    prompt: &mut impl Prompt,
) -> Result<Credentials> {
    let session_id = match session_id {
        Some(value) => value,
        None => prompt
            .line("Please enter your ASP.NETSessionId: ")
            .context("Failed to read ASP.NETSessionId")?,
    };
    let hall_ticket = match hall_ticket {
        Some(value) => value,
        None => prompt
            .secret("Please enter your hallticket: ")
            .context("Failed to read hallticket")?,
    };

    let credentials = Credentials::new(session_id.trim(), hall_ticket.trim());
    if !credentials.is_complete() {
        return Err(Error::config(
            "Both ASP.NETSessionId and hallticket are required!",
        ));
    }
    Ok(credentials)
}
