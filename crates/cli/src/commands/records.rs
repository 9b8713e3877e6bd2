//! `pk list` and `pk delete`.

use std::sync::Arc;

use pustakalaya_console::controller::{ListController, RemoveOutcome, Resource};
use pustakalaya_console::gateway::{ApiClient, ResourceGateway};
use pustakalaya_core::{Book, Donor, Librarian, Transfer};

use super::{CliError, Context, ResourceArg, confirm};
use crate::output::{self, TableRow};

/// Print one page of the filtered collection.
///
/// # Errors
///
/// Returns the gateway error if the collection cannot be fetched.
pub async fn list(
    ctx: &Context,
    resource: ResourceArg,
    search: &str,
    page: usize,
) -> Result<(), CliError> {
    ctx.require_session()?;
    match resource {
        ResourceArg::Books => list_kind::<Book>(ctx, search, page).await,
        ResourceArg::Donors => list_kind::<Donor>(ctx, search, page).await,
        ResourceArg::Librarians => list_kind::<Librarian>(ctx, search, page).await,
        ResourceArg::Transfers => list_kind::<Transfer>(ctx, search, page).await,
    }
}

/// Delete one record, asking first unless `yes`.
///
/// # Errors
///
/// Returns `CliError::NotFound` for an unknown id, or the gateway error.
pub async fn delete(
    ctx: &Context,
    resource: ResourceArg,
    id: String,
    yes: bool,
) -> Result<(), CliError> {
    ctx.require_session()?;
    match resource {
        ResourceArg::Books => delete_kind::<Book>(ctx, id, yes).await,
        ResourceArg::Donors => delete_kind::<Donor>(ctx, id, yes).await,
        ResourceArg::Librarians => delete_kind::<Librarian>(ctx, id, yes).await,
        ResourceArg::Transfers => delete_kind::<Transfer>(ctx, id, yes).await,
    }
}

fn controller<R>(ctx: &Context) -> ListController<R>
where
    R: Resource,
    ApiClient: ResourceGateway<R>,
{
    let gateway: Arc<dyn ResourceGateway<R>> = ctx.api.clone();
    ListController::new(gateway)
}

async fn list_kind<R>(ctx: &Context, search: &str, page: usize) -> Result<(), CliError>
where
    R: Resource + TableRow,
    ApiClient: ResourceGateway<R>,
{
    let mut controller = controller::<R>(ctx);
    controller.load().await?;
    controller.set_filter(search);
    controller.set_page(page);

    let rows = controller.visible();
    if rows.is_empty() {
        output::line(&format!(
            "No {} found matching your criteria.",
            R::KIND.plural()
        ))?;
        return Ok(());
    }
    output::table(&rows)?;

    let pager = controller.pager();
    if pager.is_visible() {
        output::line(&format!(
            "Showing {} to {} of {} {} (page {} of {})",
            pager.first_item,
            pager.last_item,
            pager.total_items,
            R::KIND.plural(),
            pager.page,
            pager.total_pages
        ))?;
    }
    Ok(())
}

async fn delete_kind<R>(ctx: &Context, id: String, yes: bool) -> Result<(), CliError>
where
    R: Resource,
    ApiClient: ResourceGateway<R>,
{
    let id = R::Id::from(id);
    let mut controller = controller::<R>(ctx);
    controller.load().await?;
    if controller.find(&id).is_none() {
        return Err(CliError::NotFound {
            kind: R::KIND.singular(),
            id: id.to_string(),
        });
    }

    // The prompt is asked inside `remove`, so a read failure counts as "no".
    let outcome = controller
        .remove(&id, |prompt| {
            yes || confirm(prompt).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            })
        })
        .await?;

    match outcome {
        RemoveOutcome::Removed => output::line(&format!("Deleted {} {id}", R::KIND.singular()))?,
        RemoveOutcome::Cancelled => output::line("Cancelled")?,
    }
    Ok(())
}
