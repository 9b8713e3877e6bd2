//! View types shared by the screen templates.

use crate::controller::{Dialog, Pager, Resource};

/// One numbered page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Pagination controls, ready to render.
#[derive(Debug, Clone)]
pub struct PagerView {
    /// Hidden when everything fits on one page.
    pub visible: bool,
    /// "Showing 1 to 10 of 25 books"
    pub summary: String,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

impl PagerView {
    /// Build links with `href(page)`, describing items as `noun`.
    pub fn new(pager: &Pager, noun: &str, href: impl Fn(usize) -> String) -> Self {
        Self {
            visible: pager.is_visible(),
            summary: format!(
                "Showing {} to {} of {} {noun}",
                pager.first_item, pager.last_item, pager.total_items
            ),
            previous: pager.has_previous().then(|| href(pager.page - 1)),
            next: pager.has_next().then(|| href(pager.page + 1)),
            pages: pager
                .page_numbers()
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    current: number == pager.page,
                })
                .collect(),
        }
    }
}

/// Append `<page_key>=n` and, if set, `<filter_key>=text` to `base`.
#[must_use]
pub fn list_href(base: &str, page_key: &str, filter_key: &str, filter: &str, page: usize) -> String {
    let mut url = format!("{base}?{page_key}={page}");
    if !filter.is_empty() {
        url.push('&');
        url.push_str(filter_key);
        url.push('=');
        url.push_str(&url::form_urlencoded::byte_serialize(filter.as_bytes()).collect::<String>());
    }
    url
}

/// The open dialog, flattened for templates.
#[derive(Debug, Clone)]
pub struct DialogView<R: Resource> {
    pub is_form: bool,
    pub is_view: bool,
    pub is_delete: bool,
    pub title: String,
    /// Where the form posts to.
    pub action: String,
    pub submit_label: &'static str,
    pub form: R::Form,
    pub target: Option<R>,
    pub error: Option<String>,
    /// "Are you sure you want to delete this book?"
    pub prompt: String,
}

impl<R: Resource> DialogView<R> {
    /// `base` is the screen path, e.g. `/books`.
    pub fn new(dialog: &Dialog<R>, base: &str) -> Self {
        let title = R::KIND.title();
        let (title, action, submit_label) = match dialog {
            Dialog::Create { .. } => (format!("Add New {title}"), base.to_string(), "Add"),
            Dialog::Edit { target, .. } => (
                format!("Edit {title} Details"),
                format!("{base}/{}", target.id()),
                "Update",
            ),
            Dialog::View { .. } => (format!("{title} Details"), String::new(), ""),
            Dialog::ConfirmDelete { target } => (
                format!("Delete {title}"),
                format!("{base}/{}/delete", target.id()),
                "Delete",
            ),
            Dialog::Closed => (String::new(), String::new(), ""),
        };

        Self {
            is_form: dialog.form_mode().is_some(),
            is_view: matches!(dialog, Dialog::View { .. }),
            is_delete: matches!(dialog, Dialog::ConfirmDelete { .. }),
            title,
            action,
            submit_label,
            form: dialog.form().cloned().unwrap_or_default(),
            target: dialog.target().cloned(),
            error: dialog.error().map(str::to_string),
            prompt: R::KIND.delete_prompt(),
        }
    }

    /// Whether the open form edits an existing record.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.is_form && self.target.is_some()
    }
}
