use super::{CmdResult, print_lines};
use crate::cli::commands::{LoginArgs, SignupArgs};
use crate::cli::context::Context;
use crate::cli::output::{CreatedJson, format_contact, user_to_json};
use crate::ops::auth_ops::{self, SignupForm};

pub(super) fn cmd_signup(ctx: &Context, args: SignupArgs) -> CmdResult {
    let mut store = ctx.store()?;
    let form = SignupForm {
        name: args.name,
        email: args.email,
        password: args.password,
        confirmation: args.confirm,
    };
    let user = auth_ops::signup(&mut store, &form)?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&CreatedJson { key: &user.id })?);
    } else {
        println!("{}", user.id);
    }
    Ok(())
}

pub(super) fn cmd_login(ctx: &Context, args: LoginArgs) -> CmdResult {
    let mut store = ctx.store()?;
    let user = if args.guest {
        auth_ops::guest_login(&mut store, &ctx.session)?
    } else {
        let email = args.email.unwrap_or_default();
        let password = args.password.unwrap_or_default();
        auth_ops::login(&mut store, &ctx.session, &email, &password)?
    };
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&user_to_json(&user))?);
    } else {
        println!("logged in as {} ({})", user.name, user.id);
    }
    Ok(())
}

pub(super) fn cmd_logout(ctx: &Context) -> CmdResult {
    let mut store = ctx.store()?;
    auth_ops::logout(&mut store, &ctx.session)?;
    if !ctx.json {
        println!("logged out");
    }
    Ok(())
}

pub(super) fn cmd_whoami(ctx: &Context) -> CmdResult {
    let (store, key) = ctx.logged_in()?;
    let user = auth_ops::current_user(store.board(), &ctx.session)
        .ok_or_else(|| format!("logged-in user '{}' no longer exists", key))?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&user_to_json(user))?);
    } else {
        print_lines(format_contact(user));
    }
    Ok(())
}
