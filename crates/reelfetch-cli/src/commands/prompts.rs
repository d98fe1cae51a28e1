use color_eyre::Result;
use dialoguer::{Input, Password};
use owo_colors::OwoColorize;
use reelfetch_sources::CodePrompt;

/// Prompt for a new password twice (masked input)
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .validate_with(|input: &String| validate_password_strength(input))
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

fn validate_password_strength(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("Password cannot be empty");
    }
    if input.len() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    Ok(())
}

/// Shows the Trakt authorization URL and reads the code back on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerCodePrompt;

impl CodePrompt for DialoguerCodePrompt {
    fn prompt_code(&self, authorize_url: &str) -> std::io::Result<String> {
        eprintln!();
        eprintln!("{}", "Authorize ReelFetch with Trakt".bold().bright_cyan());
        eprintln!("  1. Open {}", authorize_url.bright_white());
        eprintln!("  2. Approve access and copy the code shown");
        eprintln!();

        let code: String = Input::new()
            .with_prompt("Authorization code")
            .interact_text()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        Ok(code.trim().to_string())
    }
}
