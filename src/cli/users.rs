//! Handlers for the `users` command group.

use super::command::UsersCommand;
use super::context::Context;
use super::transactions::report;
use super::{output, render};
use crate::application::ViewState;
use crate::domain::{UserId, UserRole};
use crate::error::Result;
use crate::port::MarketplaceApi;

pub async fn execute(ctx: &Context, command: &UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { list, role } => {
            let mut query = list.query();
            if let Some(role) = role {
                query = query.with_role(UserRole::from(*role).as_str());
            }
            let state = ViewState::from_page(ctx.client.list_users(&query).await, "No users match.");
            if render::json_document("users.list", "view", &state) {
                return Ok(());
            }
            output::section("Users");
            render::view(&state, |page| render::page(page, render::users_table));
        }
        UsersCommand::Block { id, reason } => {
            let notice = ctx
                .admin()
                .block_user(&UserId::new(id.as_str()), reason.as_deref())
                .await;
            report("users.block", &notice);
        }
        UsersCommand::Unblock { id } => {
            let notice = ctx.admin().unblock_user(&UserId::new(id.as_str())).await;
            report("users.unblock", &notice);
        }
        UsersCommand::Verify { id } => {
            let notice = ctx.admin().verify_user(&UserId::new(id.as_str())).await;
            report("users.verify", &notice);
        }
    }
    Ok(())
}
