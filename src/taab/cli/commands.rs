//! # CLI Layer
//!
//! The command line is one client of the taab API, not the application.
//! It is the only place that:
//! - parses arguments (clap)
//! - reads stdin and writes stdout/stderr
//! - turns a `CmdResult` into colored text
//!
//! Editor state does not outlive a process, so each subcommand runs a whole
//! capture session in one go: `add` sets the card id, fills the form,
//! attaches the image and saves; `edit` loads the entry, applies the changes
//! and saves.
//!
//! - `run()`: dispatch (called by `main.rs`)
//! - `init_context()`: builds the API from `$TAAB_HOME` and the config
//! - `handle_*()`: one per subcommand

use super::prompt::TerminalPresenter;
use super::render::{print_messages, render_config, render_entry_detail};
use super::setup::{Cli, Commands, ExportFormat, FormArgs};
use std::io;
use std::path::PathBuf;
use taab::api::{CmdResult, ConfigAction, CsvDialect, TaabApi};
use taab::error::Result;
use taab::init::initialize;
use taab::model::Category;
use taab::presenter::{AutoConfirm, Presenter};
use taab::scanner::LineScanner;
use taab::store::backend::StorageBackend;
use taab::store::fs_backend::FsBackend;
use tracing::debug;

struct AppContext {
    api: TaabApi<FsBackend>,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add { card, scan, form }) => handle_add(&mut ctx, card, scan, form),
        Some(Commands::List) => handle_list(&mut ctx),
        Some(Commands::Search { query }) => handle_search(&mut ctx, query),
        Some(Commands::Edit {
            index,
            form,
            clear_image,
        }) => handle_edit(&mut ctx, index, form, clear_image),
        Some(Commands::Delete { indexes, yes }) => handle_delete(&mut ctx, indexes, yes),
        Some(Commands::Import { path, legacy }) => handle_import(&mut ctx, path, legacy),
        Some(Commands::Export {
            format,
            include_images,
            out,
            stdout,
        }) => handle_export(&mut ctx, format, include_images, out, stdout),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Fields { category }) => handle_fields(&mut ctx, category),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&mut ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let ctx = initialize()?;
    let mut api = ctx.api;
    let store = api.store();
    debug!(
        data_dir = %ctx.data_dir.display(),
        slot = %store.backend().slot_path(store.key()).display(),
        "taab initialized"
    );

    if let Some(schema) = cli.schema {
        api.set_schema(schema);
    }

    // Restore problems are worth showing whatever the command; the count is
    // only shown by `list`.
    let status = api.restore_status();
    if status.has_problems() {
        print_messages(&status.messages);
    }

    Ok(AppContext { api })
}

fn presenter_for(ctx: &AppContext, yes: bool) -> Box<dyn Presenter> {
    if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalPresenter::new(ctx.api.schema()))
    }
}

fn handle_add(
    ctx: &mut AppContext,
    card: Option<String>,
    scan: bool,
    form: FormArgs,
) -> Result<()> {
    if scan {
        let stdin = io::stdin();
        let mut scanner = LineScanner::once(stdin.lock());
        let result = ctx.api.scan_card(&mut scanner)?;
        print_messages(&result.messages);
    } else if let Some(card) = card {
        ctx.api.enter_card_id(&card)?;
    }

    ctx.api.set_form(form.to_update())?;
    if let Some(path) = &form.image {
        ctx.api.attach_image(path)?;
    }

    let result = ctx.api.save()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    let mut presenter = TerminalPresenter::new(ctx.api.schema());
    let status = ctx.api.restore_status();
    if !status.has_problems() {
        status.messages.iter().for_each(|m| presenter.notify(m));
    }
    let result = ctx.api.list()?;
    show_listing(&mut presenter, &result);
    Ok(())
}

fn handle_search(ctx: &mut AppContext, query: Vec<String>) -> Result<()> {
    let mut presenter = TerminalPresenter::new(ctx.api.schema());
    let result = ctx.api.search(&query.join(" "))?;
    show_listing(&mut presenter, &result);
    Ok(())
}

fn show_listing(presenter: &mut TerminalPresenter, result: &CmdResult) {
    presenter.render_rows(&result.listed_entries);
    result.messages.iter().for_each(|m| presenter.notify(m));
}

fn handle_edit(
    ctx: &mut AppContext,
    index: String,
    form: FormArgs,
    clear_image: bool,
) -> Result<()> {
    let started = ctx.api.start_edit(&index)?;
    let update = form.to_update();

    if update.is_empty() && form.image.is_none() && !clear_image {
        // Nothing to change: show the entry instead.
        for row in &started.listed_entries {
            print!("{}", render_entry_detail(row, ctx.api.schema()));
        }
        let result = ctx.api.cancel_edit()?;
        print_messages(&result.messages);
        return Ok(());
    }

    print_messages(&started.messages);
    ctx.api.set_form(update)?;
    if let Some(path) = &form.image {
        ctx.api.attach_image(path)?;
    } else if clear_image {
        ctx.api.detach_image()?;
    }

    let result = ctx.api.save()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, indexes: Vec<String>, yes: bool) -> Result<()> {
    let mut presenter = presenter_for(ctx, yes);
    let result = ctx.api.delete(&indexes, presenter.as_mut())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let mut presenter = presenter_for(ctx, yes);
    let result = ctx.api.clear(presenter.as_mut())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf, legacy: bool) -> Result<()> {
    let dialect = if legacy {
        CsvDialect::Legacy
    } else {
        CsvDialect::Quoted
    };
    let result = ctx.api.import_file(&path, dialect)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &mut AppContext,
    format: ExportFormat,
    include_images: bool,
    out: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    // An absent flag defers to the `include_images` config key.
    let include_images = include_images.then_some(true);

    if stdout {
        let result = ctx.api.export_to_string(format.into(), include_images)?;
        if let Some(text) = &result.exported_text {
            print!("{}", text);
        }
        return Ok(());
    }

    let result = ctx.api.export(format.into(), include_images, out.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_fields(ctx: &mut AppContext, category: Option<Category>) -> Result<()> {
    let result = ctx.api.fields(category)?;
    for message in &result.messages {
        println!("{}", message.content);
    }
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config_action(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
