//! `pk transfer`.

use pustakalaya_console::controller::TransferDesk;
use pustakalaya_console::controller::forms::TransferForm;
use pustakalaya_core::BookId;

use super::{CliError, Context};
use crate::output;

/// Record a transfer of `count` copies of `book` to `destination`.
///
/// The count is checked against the book's available copies before anything
/// is sent.
///
/// # Errors
///
/// Returns `CliError::NotFound` if the book is not offered for transfer, or
/// the submit error.
pub async fn record(
    ctx: &Context,
    book: String,
    count: String,
    destination: String,
) -> Result<(), CliError> {
    ctx.require_session()?;

    let mut desk = TransferDesk::new(ctx.api.clone(), ctx.api.clone());
    desk.load_books().await?;

    let book_id = BookId::from(book);
    if !desk.select_book(&book_id) {
        return Err(CliError::NotFound {
            kind: "book",
            id: book_id.to_string(),
        });
    }

    desk.submit_transfer(TransferForm {
        book_id: book_id.to_string(),
        count,
        destination,
    })
    .await?;

    if let Some(notice) = desk.notice() {
        output::line(notice)?;
    }
    if let Some(book) = desk.books().find(&book_id) {
        output::line(&format!("{} now has {} copies", book.title, book.copy_count))?;
    }
    Ok(())
}
