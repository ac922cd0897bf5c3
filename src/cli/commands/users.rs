use clap::Subcommand;

use crate::cli::{connect_store, utils, OutputFormat};
use crate::database::models::UserView;
use crate::services::identity_service::normalize_email;
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List every account, oldest first")]
    List,

    #[command(about = "Change an account's role")]
    Promote {
        email: String,
        #[arg(long, help = "student, admin or super_admin")]
        role: Role,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;

    match cmd {
        UserCommands::List => {
            let users: Vec<UserView> = store.list_users().await?.into_iter().map(UserView::from).collect();
            utils::output_collection(output_format, "users", &users, "No users found", |u| {
                format!("{:<38} {:<12} {:<32} {}", u.id, u.role.as_str(), u.email, u.name)
            })
        }
        UserCommands::Promote { email, role } => {
            let email = normalize_email(email);
            let user = store
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No user with email '{}'", email))?;

            let updated = store
                .update_user_role(user.id, role)
                .await?
                .ok_or_else(|| anyhow::anyhow!("User '{}' disappeared during update", email))?;

            tracing::info!("Role of {} set to {}", updated.email, role.as_str());
            utils::output_success(
                output_format,
                &format!("{} is now {}", updated.email, role.as_str()),
                Some(serde_json::json!({ "user": UserView::from(updated) })),
            )
        }
    }
}
