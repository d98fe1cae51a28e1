use super::prompts;
use crate::output::Output;
use crate::UsersCommands;
use color_eyre::Result;
use reelfetch_config::{PathManager, UserTable};

pub fn run_users(cmd: UsersCommands, output: &Output) -> Result<()> {
    match cmd {
        UsersCommands::Add { username } => add_user(&username, output),
    }
}

fn add_user(username: &str, output: &Output) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(color_eyre::eyre::eyre!("Username cannot be empty"));
    }

    let paths = PathManager::default();
    let users_file = paths.users_file();
    let mut users = UserTable::load(&users_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load users from {}: {}", users_file.display(), e))?;

    let existed = users.contains(username);
    let password = prompts::prompt_new_password(&format!("Password for {}", username))?;
    users
        .set_password(username, &password)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to hash password: {}", e))?;
    users
        .save(&users_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save users to {}: {}", users_file.display(), e))?;

    if existed {
        output.success(format!("Password updated for {}", username));
    } else {
        output.success(format!("Added user {} ({} total)", username, users.len()));
    }
    Ok(())
}
