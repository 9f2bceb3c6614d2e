#![forbid(unsafe_code)]
use acme_birthday::{
    model::{Birthday, BirthdayId, Username},
    DetailContext, ListContext, Paginator, Renderer, SavedContext, StaticPage, TextRenderer,
};
use chrono::NaiveDate;

fn birthday(id: u64, first: &str, last: &str, date: (i32, u32, u32)) -> Birthday {
    Birthday {
        id: BirthdayId::new(id),
        first_name: first.into(),
        last_name: last.into(),
        birthday: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        image: None,
        author: None,
        tags: Vec::new(),
    }
}

#[test]
fn list_with_pagination_footer() {
    let items = vec![
        birthday(1, "Ada", "Lovelace", (1815, 12, 10)),
        birthday(2, "Alan", "Turing", (1912, 6, 23)),
        birthday(3, "Grace", "", (1906, 12, 9)),
    ];
    let page = Paginator::new(items, 2).page(Some("2"));
    let out = TextRenderer.list(&ListContext { page });
    insta::assert_snapshot!(out, @r"
    3. Grace (1906-12-09)
    Page 2 of 2 | previous: 1
    ");
}

#[test]
fn empty_list() {
    let page = Paginator::<Birthday>::new(Vec::new(), 10).page(None);
    assert_eq!(TextRenderer.list(&ListContext { page }), "No birthdays yet.\n");
}

#[test]
fn detail_with_optional_lines() {
    let mut b = birthday(7, "Ada", "Lovelace", (1815, 12, 10));
    b.author = Some(Username::new("alice"));
    let ctx = DetailContext {
        birthday: b,
        tags: vec!["science".into(), "family".into()],
        countdown: 0,
    };
    insta::assert_snapshot!(TextRenderer.detail(&ctx), @r"
    Ada Lovelace
    Birthday: 1815-12-10
    Tags: science, family
    Author: alice
    Happy birthday today!
    ");
}

#[test]
fn saved_and_confirmation() {
    let b = birthday(3, "Alan", "Turing", (1912, 6, 23));
    let saved = TextRenderer.saved(&SavedContext { birthday: b.clone(), countdown: 1 });
    assert_eq!(saved, "Saved birthday #3: Alan Turing\n1 day until the birthday\n");
    assert_eq!(
        TextRenderer.confirm_delete(&b),
        "Delete birthday #3 (Alan Turing, 1912-06-23)?\n"
    );
}

#[test]
fn static_page() {
    let page = StaticPage::new("rules", "Rules", "Be kind.");
    assert_eq!(TextRenderer.page(&page), "Rules\n=====\n\nBe kind.\n");
    assert_eq!(TextRenderer.page_index(&[page]), "rules: Rules\n");
}
