//! Markup fragments for the board, its cards, the contact list and the task
//! dialog. Output is one element per line so fragments diff cleanly.

use std::fmt::Write;
use std::ops::Range;

use crate::ops::search::{NO_RESULTS, SearchedBoard, SearchedCard, SearchedColumn};
use crate::ops::summary::{Summary, format_deadline};
use crate::render::view::{AvatarView, ContactListView, TaskDetailView};
use crate::util::text::split_highlights;

/// Escape text for use in element content and double-quoted attributes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with the hit ranges wrapped in `<mark>`
pub fn highlighted(text: &str, hits: &[Range<usize>]) -> String {
    split_highlights(text, hits)
        .into_iter()
        .map(|(run, hit)| {
            if hit {
                format!("<mark>{}</mark>", escape(run))
            } else {
                escape(run)
            }
        })
        .collect()
}

pub fn avatar(a: &AvatarView) -> String {
    format!(
        "<span class=\"avatar\" style=\"background-color:{}\" title=\"{}\">{}</span>",
        escape(&a.color),
        escape(&a.name),
        escape(&a.initials)
    )
}

pub fn card(c: &SearchedCard<'_>) -> String {
    let card = c.card;
    let mut out = String::new();
    let hidden = if c.visible { "" } else { " hidden" };
    let _ = writeln!(
        out,
        "<div class=\"card\" id=\"{}\" draggable=\"true\"{}>",
        escape(&card.key),
        hidden
    );
    if !card.category.is_empty() {
        let _ = writeln!(out, "<span class=\"category\">{}</span>", escape(&card.category));
    }
    let _ = writeln!(
        out,
        "<h3 class=\"title\">{}</h3>",
        highlighted(&card.title, &c.title_hits)
    );
    if !card.description.is_empty() {
        let _ = writeln!(
            out,
            "<p class=\"description\">{}</p>",
            highlighted(&card.description, &c.description_hits)
        );
    }
    if card.subtasks_total > 0 {
        let _ = writeln!(
            out,
            "<div class=\"progress\"><progress value=\"{done}\" max=\"{total}\"></progress><span>{done}/{total} Subtasks</span></div>",
            done = card.subtasks_done,
            total = card.subtasks_total
        );
    }
    out.push_str("<div class=\"card-footer\">");
    out.push_str("<div class=\"avatars\">");
    for a in &card.assignees {
        out.push_str(&avatar(a));
    }
    out.push_str("</div>");
    if let Some(p) = card.priority {
        let _ = write!(
            out,
            "<span class=\"priority priority-{0}\">{0}</span>",
            p.as_str()
        );
    }
    out.push_str("</div>\n</div>\n");
    out
}

pub fn column(col: &SearchedColumn<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<section class=\"column\" data-state=\"{}\">",
        col.state.as_str()
    );
    let _ = writeln!(out, "<h2>{}</h2>", escape(col.label));
    if col.no_results {
        let _ = writeln!(out, "<div class=\"no-results\">{}</div>", NO_RESULTS);
    } else if col.cards.is_empty() {
        let _ = writeln!(out, "<div class=\"empty\">No tasks {}</div>", escape(col.label));
    }
    for c in &col.cards {
        out.push_str(&card(c));
    }
    out.push_str("</section>\n");
    out
}

pub fn board(b: &SearchedBoard<'_>) -> String {
    let mut out = String::from("<div class=\"board\">\n");
    for col in &b.columns {
        out.push_str(&column(col));
    }
    out.push_str("</div>\n");
    out
}

pub fn contact_list(v: &ContactListView) -> String {
    let mut out = String::from("<div class=\"contacts\">\n");
    for group in &v.groups {
        let _ = writeln!(out, "<h3 class=\"letter\">{}</h3>", escape(&group.letter.to_string()));
        for row in &group.contacts {
            let you = if row.is_you { " (You)" } else { "" };
            let _ = writeln!(
                out,
                "<div class=\"contact\" id=\"{}\">{}<span class=\"name\">{}{}</span><a href=\"mailto:{}\">{}</a></div>",
                escape(&row.avatar.key),
                avatar(&row.avatar),
                escape(&row.avatar.name),
                you,
                escape(&row.email),
                escape(&row.email)
            );
        }
    }
    out.push_str("</div>\n");
    out
}

pub fn task_dialog(d: &TaskDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<div class=\"dialog\" id=\"dialog-{}\">", escape(&d.key));
    if !d.category.is_empty() {
        let _ = writeln!(out, "<span class=\"category\">{}</span>", escape(&d.category));
    }
    let _ = writeln!(out, "<h2>{}</h2>", escape(&d.title));
    if !d.description.is_empty() {
        let _ = writeln!(out, "<p>{}</p>", escape(&d.description));
    }
    let _ = writeln!(out, "<p>Due date: {}</p>", escape(&d.due_date));
    if let Some(p) = d.priority {
        let _ = writeln!(out, "<p>Priority: <span class=\"priority priority-{0}\">{0}</span></p>", p.as_str());
    }
    let _ = writeln!(out, "<p>Status: {}</p>", escape(&d.state));
    out.push_str("<ul class=\"assigned\">\n");
    for a in &d.assignees {
        let _ = writeln!(out, "<li>{}{}</li>", avatar(a), escape(&a.name));
    }
    out.push_str("</ul>\n<ul class=\"subtasks\">\n");
    for s in &d.subtasks {
        let checked = if s.checked { " checked" } else { "" };
        let _ = writeln!(
            out,
            "<li id=\"{}\"><input type=\"checkbox\"{}> {}</li>",
            escape(&s.key),
            checked,
            escape(&s.text)
        );
    }
    out.push_str("</ul>\n</div>\n");
    out
}

pub fn summary(s: &Summary, greeting: &str, user_name: &str) -> String {
    let mut out = String::from("<div class=\"summary\">\n");
    let _ = writeln!(out, "<div class=\"metric\"><b>{}</b> To-do</div>", s.to_do);
    let _ = writeln!(out, "<div class=\"metric\"><b>{}</b> Done</div>", s.done);
    let deadline = s
        .next_urgent_deadline
        .map_or_else(|| "No upcoming deadline".to_string(), format_deadline);
    let _ = writeln!(
        out,
        "<div class=\"metric urgent\"><b>{}</b> Urgent <span>{}</span></div>",
        s.urgent,
        escape(&deadline)
    );
    let _ = writeln!(out, "<div class=\"metric\"><b>{}</b> Tasks in Board</div>", s.total);
    let _ = writeln!(out, "<div class=\"metric\"><b>{}</b> Tasks In Progress</div>", s.in_progress);
    let _ = writeln!(out, "<div class=\"metric\"><b>{}</b> Awaiting Feedback</div>", s.await_feedback);
    if user_name.is_empty() {
        let _ = writeln!(out, "<h2>{}!</h2>", escape(greeting));
    } else {
        let _ = writeln!(out, "<h2>{},<br><span class=\"user\">{}</span></h2>", escape(greeting), escape(user_name));
    }
    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::{Board, BoardDocument};
    use crate::ops::search::{SearchQuery, apply_search};
    use crate::render::view::BoardView;

    fn view() -> BoardView {
        let doc: BoardDocument = serde_json::from_str(
            r##"{
            "users": {"AB100": {"name": "Anja Berg", "profilImgColor": "#FF7A00"}},
            "tasks": {
                "task0": {"title": "Fix <login> & signup", "description": "Login form", "category": "Bug",
                          "taskState": "to-do", "priority": "urgent", "assignedContacts": ["AB100", "XX1"],
                          "subtasks": {"subtask0": {"task": "a", "taskChecked": true},
                                       "subtask1": {"task": "b", "taskChecked": false}}},
                "task1": {"title": "Deploy", "taskState": "done"}
            }
        }"##,
        )
        .unwrap();
        BoardView::build(&Board::from_document(doc))
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn highlight_escapes_inside_marks() {
        assert_eq!(highlighted("a<b>c", &[1..4]), "a<mark>&lt;b&gt;</mark>c");
    }

    #[test]
    fn card_markup() {
        let view = view();
        let searched = apply_search(&view, &SearchQuery::parse("login"));
        insta::assert_snapshot!(card(&searched.columns[0].cards[0]), @r##"
        <div class="card" id="task0" draggable="true">
        <span class="category">Bug</span>
        <h3 class="title">Fix &lt;<mark>login</mark>&gt; &amp; signup</h3>
        <p class="description"><mark>Login</mark> form</p>
        <div class="progress"><progress value="1" max="2"></progress><span>1/2 Subtasks</span></div>
        <div class="card-footer"><div class="avatars"><span class="avatar" style="background-color:#FF7A00" title="Anja Berg">AB</span></div><span class="priority priority-urgent">urgent</span></div>
        </div>
        "##);
    }

    #[test]
    fn filtered_columns_show_placeholder() {
        let view = view();
        let searched = apply_search(&view, &SearchQuery::parse("login"));
        let html = board(&searched);
        assert_eq!(html.matches("class=\"no-results\"").count(), 3);
        assert!(html.contains("<div class=\"card\" id=\"task1\" draggable=\"true\" hidden>"));
    }

    #[test]
    fn empty_columns_without_query() {
        let view = view();
        let searched = apply_search(&view, &SearchQuery::empty());
        let html = board(&searched);
        assert!(html.contains("No tasks In progress"));
        assert!(!html.contains("no-results"));
        assert!(!html.contains(" hidden"));
    }
}
