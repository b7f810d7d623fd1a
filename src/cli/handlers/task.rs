use super::{CmdResult, print_lines, resolve_contact_key, resolve_contacts};
use crate::cli::commands::{SubtaskAction, TaskAction};
use crate::cli::context::Context;
use crate::cli::output::{CreatedJson, format_task_detail};
use crate::ops::store::{Mutation, OpError, Store};
use crate::ops::task_ops::{self, TaskDraft, TaskEdit};
use crate::render::html;
use crate::render::view::TaskDetailView;

/// Commit and report what changed
fn commit(ctx: &Context, store: &mut Store, mutation: Mutation) -> CmdResult {
    store.commit(&mutation)?;
    if !ctx.json {
        println!("{}", mutation.describe());
    }
    Ok(())
}

pub(super) fn cmd_task(ctx: &Context, action: TaskAction) -> CmdResult {
    let (mut store, _user) = ctx.logged_in()?;
    let today = ctx.today();

    match action {
        TaskAction::Add(args) => {
            let draft = TaskDraft {
                assigned: resolve_contacts(store.board(), &args.assign)?,
                title: args.title,
                description: args.description,
                due_date: args.due,
                category: args.category,
                priority: args.priority,
                state: args.state,
                subtasks: args.subtasks,
            };
            let mutation = task_ops::create_task(store.board(), &draft, today)?;
            store.commit(&mutation)?;
            if let Mutation::PutTask(task) = &mutation {
                if ctx.json {
                    println!("{}", serde_json::to_string_pretty(&CreatedJson { key: &task.id })?);
                } else {
                    println!("{}", task.id);
                }
            }
            Ok(())
        }
        TaskAction::Show(args) => {
            let detail = TaskDetailView::build(store.board(), &args.key)
                .ok_or_else(|| OpError::TaskNotFound(args.key.clone()))?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else if args.html {
                print!("{}", html::task_dialog(&detail));
            } else {
                print_lines(format_task_detail(&detail));
            }
            Ok(())
        }
        TaskAction::Edit(args) => {
            let assigned = match &args.assign {
                Some(needles) => Some(resolve_contacts(store.board(), needles)?),
                None => None,
            };
            let edit = TaskEdit {
                title: args.title,
                description: args.description,
                due_date: args.due,
                category: args.category,
                priority: args.priority,
                assigned,
            };
            if edit.is_empty() {
                return Err("nothing to change (pass --title, --due, ...)".into());
            }
            let mutation = task_ops::edit_task(store.board(), &args.key, &edit, today)?;
            commit(ctx, &mut store, mutation)
        }
        TaskAction::Mv(args) => {
            let mutation = task_ops::move_task(store.board(), &args.key, args.state)?;
            commit(ctx, &mut store, mutation)
        }
        TaskAction::Rm(args) => {
            let mutation = task_ops::delete_task(store.board(), &args.key)?;
            commit(ctx, &mut store, mutation)
        }
        TaskAction::Assign(args) => {
            let user = resolve_contact_key(store.board(), &args.contact)?;
            let mutation = task_ops::assign(store.board(), &args.key, &user)?;
            commit(ctx, &mut store, mutation)
        }
        TaskAction::Unassign(args) => {
            let user = resolve_contact_key(store.board(), &args.contact)?;
            let mutation = task_ops::unassign(store.board(), &args.key, &user)?;
            commit(ctx, &mut store, mutation)
        }
    }
}

pub(super) fn cmd_subtask(ctx: &Context, action: SubtaskAction) -> CmdResult {
    let (mut store, _user) = ctx.logged_in()?;

    let mutation = match action {
        SubtaskAction::Add { task, text } => task_ops::add_subtask(store.board(), &task, &text)?,
        SubtaskAction::Toggle { task, subtask } => {
            task_ops::toggle_subtask(store.board(), &task, &subtask)?
        }
        SubtaskAction::Edit {
            task,
            subtask,
            text,
        } => task_ops::rename_subtask(store.board(), &task, &subtask, &text)?,
        SubtaskAction::Rm { task, subtask } => {
            task_ops::delete_subtask(store.board(), &task, &subtask)?
        }
    };
    commit(ctx, &mut store, mutation)
}
