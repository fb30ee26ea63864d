//! Handlers for `login`, `register`, `logout` and `whoami`.

use dialoguer::{Input, Password};
use serde_json::json;

use super::command::{LoginArgs, RegisterArgs};
use super::context::Context;
use super::{output, render};
use crate::adapter::http::Registration;
use crate::application::ViewState;
use crate::domain::UserRole;
use crate::error::Result;
use crate::port::MarketplaceApi;

/// Execute `login`. Prompts for whatever the flags leave out.
pub async fn execute_login(ctx: &Context, args: &LoginArgs) -> Result<()> {
    let email = match &args.email {
        Some(email) => email.trim().to_string(),
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new().with_prompt("Password").interact()?,
    };

    let pb = output::spinner("Signing in");
    match ctx.client.login(&email, &password).await {
        Ok(user) => {
            let name = user
                .as_ref()
                .map_or_else(|| email.clone(), |u| u.display_name().to_string());
            output::spinner_success(&pb, &format!("Signed in as {name}"));
            if output::is_json() {
                output::json_output(json!({ "command": "login", "user": user }));
            }
        }
        Err(err) => {
            output::spinner_fail(&pb, "Sign-in failed");
            output::error(&err.display_message());
        }
    }
    Ok(())
}

/// Execute `register`.
pub async fn execute_register(ctx: &Context, args: &RegisterArgs) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };
    let registration = Registration {
        email: args.email.trim().to_string(),
        password,
        name: args.name.trim().to_string(),
        role: UserRole::from(args.role).as_str().to_string(),
        company_name: args.company.clone(),
        phone: args.phone.clone(),
    };

    let pb = output::spinner("Creating account");
    match ctx.client.register(&registration).await {
        Ok(user) => {
            output::spinner_success(&pb, &format!("Registered {}", registration.email));
            if output::is_json() {
                output::json_output(json!({ "command": "register", "user": user }));
            }
        }
        Err(err) => {
            output::spinner_fail(&pb, "Registration failed");
            output::error(&err.display_message());
        }
    }
    Ok(())
}

/// Execute `logout`. The local session is cleared even if the server call fails.
pub async fn execute_logout(ctx: &Context) -> Result<()> {
    ctx.client.logout().await?;
    output::success("Signed out");
    Ok(())
}

/// Execute `whoami`.
pub async fn execute_whoami(ctx: &Context) -> Result<()> {
    if !ctx.client.session().is_signed_in() {
        output::warning("Not signed in");
        output::hint("run `mcdesk login`");
        return Ok(());
    }

    let state = ViewState::from_result(ctx.client.current_user().await);
    if render::json_document("whoami", "user", &state) {
        return Ok(());
    }
    render::view(&state, |user| {
        output::section("Account");
        output::field("Name", user.display_name());
        output::field("Email", &user.email);
        output::field("Role", &user.role);
        output::field("Status", &user.status);
        output::field("Verified", if user.verified { "yes" } else { "no" });
        output::field("Credits", user.available_credits());
    });
    Ok(())
}
