use super::{CmdResult, print_lines, resolve_contact_key};
use crate::cli::commands::ContactAction;
use crate::cli::context::Context;
use crate::cli::output::{CreatedJson, UserJson, format_contact, format_contacts, user_to_json};
use crate::ops::contact_ops::{self, ContactDraft, ContactEdit};
use crate::ops::store::{Mutation, OpError};
use crate::render::html;
use crate::render::view::ContactListView;

pub(super) fn cmd_contact(ctx: &Context, action: ContactAction) -> CmdResult {
    let (mut store, user) = ctx.logged_in()?;

    match action {
        ContactAction::List { html: as_html } => {
            if ctx.json {
                let users: Vec<UserJson> = store.board().users.iter().map(user_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&users)?);
                return Ok(());
            }
            let view = ContactListView::build(store.board(), Some(&user));
            if as_html {
                print!("{}", html::contact_list(&view));
            } else {
                print_lines(format_contacts(&view));
            }
            Ok(())
        }
        ContactAction::Show { contact } => {
            let found = contact_ops::resolve_contact(store.board(), &contact)
                .ok_or_else(|| OpError::ContactNotFound(contact.clone()))?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&user_to_json(found))?);
            } else {
                print_lines(format_contact(found));
            }
            Ok(())
        }
        ContactAction::Add(args) => {
            let draft = ContactDraft {
                name: args.name,
                email: args.email,
                phone: args.phone,
            };
            let mutation = contact_ops::add_contact(store.board(), &draft)?;
            store.commit(&mutation)?;
            if let Mutation::PutUser(added) = &mutation {
                if ctx.json {
                    println!("{}", serde_json::to_string_pretty(&CreatedJson { key: &added.id })?);
                } else {
                    println!("{}", added.id);
                }
            }
            Ok(())
        }
        ContactAction::Edit(args) => {
            let key = resolve_contact_key(store.board(), &args.contact)?;
            let edit = ContactEdit {
                name: args.name,
                email: args.email,
                phone: args.phone,
            };
            let mutation = contact_ops::edit_contact(store.board(), &key, &edit)?;
            store.commit(&mutation)?;
            if !ctx.json {
                println!("{}", mutation.describe());
            }
            Ok(())
        }
        ContactAction::Rm { contact } => {
            let key = resolve_contact_key(store.board(), &contact)?;
            let mutation = contact_ops::delete_contact(store.board(), &key)?;
            store.commit(&mutation)?;
            if key == user {
                tracing::warn!(user = %key, "deleted the logged-in user");
            }
            if !ctx.json {
                println!("{}", mutation.describe());
            }
            Ok(())
        }
    }
}
