use crate::model::Birthday;
use crate::pages::StaticPage;
use crate::views::{DetailContext, ListContext, SavedContext};
use std::fmt::Write;

/// Permet de customiser le rendu des écrans (texte, HTML, etc.).
pub trait Renderer {
    fn list(&self, ctx: &ListContext) -> String;
    fn detail(&self, ctx: &DetailContext) -> String;
    fn saved(&self, ctx: &SavedContext) -> String;
    fn confirm_delete(&self, birthday: &Birthday) -> String;
    fn page_index(&self, pages: &[StaticPage]) -> String;
    fn page(&self, page: &StaticPage) -> String;
}

/// Rendu texte brut, pour le terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

/// Phrase du compte à rebours.
pub fn countdown_line(days: u32) -> String {
    match days {
        0 => "Happy birthday today!".to_string(),
        1 => "1 day until the birthday".to_string(),
        n => format!("{n} days until the birthday"),
    }
}

impl Renderer for TextRenderer {
    fn list(&self, ctx: &ListContext) -> String {
        let page = &ctx.page;
        if page.count == 0 {
            return "No birthdays yet.\n".to_string();
        }
        let mut out = String::new();
        for b in &page.items {
            let _ = writeln!(out, "{}. {} ({})", b.id, b.full_name(), b.birthday);
        }
        let _ = write!(out, "Page {} of {}", page.number, page.num_pages);
        if let Some(prev) = page.previous_page_number() {
            let _ = write!(out, " | previous: {prev}");
        }
        if let Some(next) = page.next_page_number() {
            let _ = write!(out, " | next: {next}");
        }
        out.push('\n');
        out
    }

    fn detail(&self, ctx: &DetailContext) -> String {
        let b = &ctx.birthday;
        let mut out = format!("{}\nBirthday: {}\n", b.full_name(), b.birthday);
        if !ctx.tags.is_empty() {
            let _ = writeln!(out, "Tags: {}", ctx.tags.join(", "));
        }
        if let Some(image) = &b.image {
            let _ = writeln!(out, "Image: {image}");
        }
        if let Some(author) = &b.author {
            let _ = writeln!(out, "Author: {author}");
        }
        out.push_str(&countdown_line(ctx.countdown));
        out.push('\n');
        out
    }

    fn saved(&self, ctx: &SavedContext) -> String {
        format!(
            "Saved birthday #{}: {}\n{}\n",
            ctx.birthday.id,
            ctx.birthday.full_name(),
            countdown_line(ctx.countdown)
        )
    }

    fn confirm_delete(&self, birthday: &Birthday) -> String {
        format!(
            "Delete birthday #{} ({}, {})?\n",
            birthday.id,
            birthday.full_name(),
            birthday.birthday
        )
    }

    fn page_index(&self, pages: &[StaticPage]) -> String {
        pages
            .iter()
            .map(|p| format!("{}: {}\n", p.slug, p.title))
            .collect()
    }

    fn page(&self, page: &StaticPage) -> String {
        format!(
            "{title}\n{rule}\n\n{body}\n",
            title = page.title,
            rule = "=".repeat(page.title.chars().count()),
            body = page.body
        )
    }
}
