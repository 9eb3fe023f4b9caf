use clap::Subcommand;
use color_eyre::eyre::{OptionExt, bail};
use orderly_core::UserDirectory;
use orderly_core::model::{Role, User, UserId};

use super::Output;
use crate::platform::Storage;
use crate::repository::Repository;
use crate::util::format::format_table;

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Invite a back-office user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// admin, manager, agent or viewer
        #[arg(long, default_value = "agent")]
        role: Role,
    },
    /// List users with their roles
    List,
    /// Change a user's role
    Role { id: UserId, role: Role },
    /// Revoke a user's access, keeping the record
    Deactivate { id: UserId },
    /// Restore a deactivated user's access
    Activate { id: UserId },
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: UsersCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    let mut directory = repo.users()?;

    match cmd {
        UsersCommand::Add { name, email, role } => {
            if name.trim().is_empty() {
                bail!("a user needs a name");
            }
            let id = directory.add(&name, &email, role)?;
            repo.save_users(&directory)?;
            tracing::info!(user = %id, role = role.display_name(), "User added");
            let user = directory.get(id).ok_or_eyre("user vanished after insert")?;
            out.render(user, |u| {
                format!("Added {} {} <{}> as {}", u.id, u.name, u.email, u.role.display_name())
            })
        }
        UsersCommand::List => out.render(&directory.users(), |users| render_users(users)),
        UsersCommand::Role { id, role } => {
            let user = directory.get(id).ok_or_eyre(format!("no user {id}"))?;
            if user.role == Role::Admin && role != Role::Admin {
                ensure_another_admin(&directory, user)?;
            }
            let previous = directory.set_role(id, role)?;
            repo.save_users(&directory)?;
            tracing::info!(
                user = %id,
                from = previous.display_name(),
                to = role.display_name(),
                "Role changed"
            );
            let user = directory.get(id).ok_or_eyre(format!("no user {id}"))?;
            out.render(user, |u| {
                format!(
                    "{} is now {} (was {})",
                    u.name,
                    u.role.display_name(),
                    previous.display_name()
                )
            })
        }
        UsersCommand::Deactivate { id } => {
            let user = directory.get(id).ok_or_eyre(format!("no user {id}"))?;
            if user.role == Role::Admin {
                ensure_another_admin(&directory, user)?;
            }
            directory.set_active(id, false)?;
            repo.save_users(&directory)?;
            tracing::info!(user = %id, "User deactivated");
            let user = directory.get(id).ok_or_eyre(format!("no user {id}"))?;
            out.render(user, |u| format!("Deactivated {}", u.name))
        }
        UsersCommand::Activate { id } => {
            directory.set_active(id, true)?;
            repo.save_users(&directory)?;
            tracing::info!(user = %id, "User activated");
            let user = directory.get(id).ok_or_eyre(format!("no user {id}"))?;
            out.render(user, |u| format!("Activated {}", u.name))
        }
    }
}

/// The directory must always keep one active admin able to manage users
fn ensure_another_admin(directory: &UserDirectory, user: &User) -> color_eyre::Result<()> {
    if user.active && directory.active_admins() <= 1 {
        bail!("{} is the last active admin", user.name);
    }
    Ok(())
}

fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.name.clone(),
                u.email.clone(),
                u.role.display_name().to_string(),
                if u.active { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect();
    format_table(&["Id", "Name", "Email", "Role", "Status"], &rows)
}
