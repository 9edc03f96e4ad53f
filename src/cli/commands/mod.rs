//! Command implementations and the session every command runs inside.
//!
//! A session opens (or creates, or unlocks) the cave, runs at most one
//! command, then closes or locks the cave again.  The cave is always
//! closed or locked, even when the command fails.

pub mod add;
pub mod delete;
pub mod get;
pub mod list;
pub mod next;

use tracing::debug;

use crate::cave::Cave;
use crate::cli::{output, prompt_secret, show_secret, Cli, Commands, Context, CODE_ENV, PHRASE_ENV};
use crate::errors::{Result, SesameError};

/// Run one `sesame` invocation end to end.
pub fn execute(cli: &Cli) -> Result<()> {
    if cli.lock && cli.expunge {
        return Err(SesameError::CommandFailed(
            "cannot lock and expunge at the same time".into(),
        ));
    }

    let ctx = Context::resolve(cli)?;
    let mut cave = Cave::with_options(&ctx.dir, ctx.options.clone())?;
    debug!(path = %cave.path().display(), lock = %cave.lock_path().display(), "Session starting");

    let was_locked = if cave.exists_on_disk() {
        enter_existing(cli, &ctx, &mut cave)?
    } else {
        enter_new(cli, &ctx, &mut cave)?;
        false
    };

    let outcome = match &cli.command {
        Some(command) => dispatch(command, &ctx, &mut cave),
        None => Ok(()),
    };
    let finished = finish(cli, &ctx, &mut cave, was_locked);

    outcome?;
    finished
}

/// Open or unlock an existing cave.  Returns whether it was locked.
fn enter_existing(cli: &Cli, ctx: &Context, cave: &mut Cave) -> Result<bool> {
    if cli.command.is_none() && !cli.lock && !cli.expunge {
        return Err(SesameError::CommandFailed(
            "please specify a command".into(),
        ));
    }
    if cli.reconstruct {
        return Err(SesameError::CommandFailed(
            "remove the existing cave before reconstructing".into(),
        ));
    }
    if cli.expunge {
        if !cave.is_locked() {
            return Err(SesameError::CommandFailed(
                "cannot expunge the lock; it does not exist".into(),
            ));
        }
        cave.forget()?;
        if !ctx.quiet {
            output::warning("Lock expunged");
        }
    }

    if cave.is_locked() {
        let code = prompt_secret(CODE_ENV, "Unlock code")?;
        cave.unlock(&code)?;
        Ok(true)
    } else {
        let phrase = prompt_secret(PHRASE_ENV, "Recovery phrase")?;
        cave.open(&phrase)?;
        Ok(false)
    }
}

/// Create a cave, from a prompted phrase when reconstructing.
fn enter_new(cli: &Cli, ctx: &Context, cave: &mut Cave) -> Result<()> {
    if cave.is_locked() {
        cave.forget()?;
    }

    let recovery = if cli.reconstruct {
        let phrase = prompt_secret(PHRASE_ENV, "Recovery phrase")?;
        cave.create(Some(&phrase))?
    } else {
        cave.create(None)?
    };

    // A cave whose phrase was never shown could never be opened again.
    if let Err(e) = show_secret("Recovery phrase", &recovery, ctx) {
        cave.abandon()?;
        return Err(e);
    }

    if !ctx.quiet {
        output::success(&format!("Cave created at {}", cave.path().display()));
        output::tip("Keep the recovery phrase somewhere safe; it is the only way in.");
    }
    Ok(())
}

/// Close the cave, or lock it again and show the code if newly locked.
fn finish(cli: &Cli, ctx: &Context, cave: &mut Cave, was_locked: bool) -> Result<()> {
    if cli.expunge || (!was_locked && !cli.lock) {
        return cave.close();
    }

    let code = cave.lock()?;
    if !was_locked {
        if !ctx.quiet {
            output::success("Cave locked");
        }
        show_secret("Unlock code", &code, ctx)?;
    }
    Ok(())
}

fn dispatch(command: &Commands, ctx: &Context, cave: &mut Cave) -> Result<()> {
    match command {
        Commands::List { service } => list::execute(ctx, cave, service.as_deref()),
        Commands::Add {
            service,
            user,
            offset,
        } => add::execute(ctx, cave, service, user, *offset),
        Commands::Get {
            service,
            user,
            offset,
        } => get::execute(ctx, cave, service, user.as_deref(), *offset),
        Commands::Next {
            service,
            user,
            offset,
        } => next::execute(ctx, cave, service, user.as_deref(), *offset),
        Commands::Delete { service, user } => {
            delete::execute(ctx, cave, service, user.as_deref())
        }
    }
}

/// The user to act on: the given one, or a prompt when the service has
/// several users.
pub(crate) fn pick_user(cave: &Cave, service: &str, user: Option<&str>) -> Result<Option<String>> {
    match user {
        Some(user) => Ok(Some(crate::cli::normalise(user))),
        None if cave.unique(service)? => Ok(None),
        None => crate::cli::prompt_user(service).map(Some),
    }
}
