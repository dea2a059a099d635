//! User management CLI commands.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use dialoguer::{Input, Password, Select};
use serde::Serialize;
use tabled::Tabled;

use clinichub_auth::{PasswordHasher, PasswordValidator};
use clinichub_core::config::AppConfig;
use clinichub_database::Stores;
use clinichub_entity::user::model::normalize_email;
use clinichub_entity::user::{CreateUser, User, UserRole};
use clinichub_service::validation;

use crate::output::{self, OutputFormat};

const ROLES: [UserRole; 6] = [
    UserRole::Admin,
    UserRole::Doctor,
    UserRole::Nurse,
    UserRole::Receptionist,
    UserRole::Pharmacist,
    UserRole::Staff,
];

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Create an account; missing values are prompted for
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Activate or deactivate an account
    SetActive {
        email: String,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    active: bool,
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            active: u.is_active,
            last_login: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    stores: Stores,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        UserCommand::List { role } => {
            let role = role.as_deref().map(str::parse::<UserRole>).transpose()?;
            let users = stores.users.list_all().await?;
            let rows: Vec<UserRow> = users
                .iter()
                .filter(|u| role.is_none_or(|r| u.role == r))
                .map(UserRow::from)
                .collect();
            output::print_list(&rows, format)?;
        }
        UserCommand::Create { name, email, role } => {
            let hasher = PasswordHasher::from_config(&config.auth)?;
            let validator = PasswordValidator::from_config(&config.auth);
            let data = prompt_new_user(name, email, role, &hasher, &validator)?;
            let user = stores.users.create(&data).await?;
            output::print_list(&[UserRow::from(&user)], format)?;
            output::print_success(&format!("User '{}' created", user.email));
        }
        UserCommand::SetActive { email, active } => {
            let email = normalize_email(email);
            let Some(user) = stores.users.find_by_email(&email).await? else {
                bail!("User '{email}' not found");
            };
            stores.users.set_active(user.id, *active).await?;
            let verb = if *active { "activated" } else { "deactivated" };
            output::print_success(&format!("User '{email}' {verb}"));
        }
    }

    Ok(())
}

fn prompt_new_user(
    name: &Option<String>,
    email: &Option<String>,
    role: &Option<String>,
    hasher: &PasswordHasher,
    validator: &PasswordValidator,
) -> anyhow::Result<CreateUser> {
    let name = match name {
        Some(name) => name.trim().to_string(),
        None => Input::<String>::new().with_prompt("Name").interact_text()?,
    };
    let email = normalize_email(&match email {
        Some(email) => email.clone(),
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    });
    validation::require_email(&email)?;

    let role = match role {
        Some(role) => role.parse::<UserRole>()?,
        None => {
            let labels: Vec<&str> = ROLES.iter().map(UserRole::as_str).collect();
            let index = Select::new()
                .with_prompt("Role")
                .items(&labels)
                .default(ROLES.len() - 1)
                .interact()?;
            ROLES[index]
        }
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Failed to read password")?;
    validator.validate(&password)?;

    Ok(CreateUser {
        email,
        name,
        password_hash: hasher.hash_password(&password)?,
        role,
        is_active: true,
    })
}
