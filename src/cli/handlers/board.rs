use chrono::Timelike;

use super::{CmdResult, print_lines};
use crate::cli::commands::{BoardArgs, SummaryArgs};
use crate::cli::context::Context;
use crate::cli::output::{SummaryJson, board_to_json, format_board, format_summary};
use crate::ops::auth_ops;
use crate::ops::search::{SearchQuery, apply_search};
use crate::ops::summary::{greeting, summarize};
use crate::render::html;
use crate::render::view::BoardView;

pub(super) fn cmd_board(ctx: &Context, args: BoardArgs) -> CmdResult {
    let (store, _user) = ctx.logged_in()?;
    let view = BoardView::build(store.board());
    let query = SearchQuery::parse(args.search.as_deref().unwrap_or(""));
    let searched = apply_search(&view, &query);

    if ctx.json {
        let json = board_to_json(&searched, args.search.as_deref());
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if args.html {
        print!("{}", html::board(&searched));
    } else {
        print_lines(format_board(&searched));
    }
    Ok(())
}

pub(super) fn cmd_summary(ctx: &Context, args: SummaryArgs) -> CmdResult {
    let (store, _user) = ctx.logged_in()?;
    let summary = summarize(store.board());
    let hello = greeting(chrono::Local::now().hour());
    let name = auth_ops::current_user(store.board(), &ctx.session).map(|u| u.name.as_str());

    if ctx.json {
        let json = SummaryJson {
            greeting: hello,
            user: name,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if args.html {
        print!("{}", html::summary(&summary, hello, name.unwrap_or("")));
    } else {
        print_lines(format_summary(&summary, hello, name));
    }
    Ok(())
}
