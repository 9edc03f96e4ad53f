//! `sesame get`: show the passphrase for a service.

use crate::cave::Cave;
use crate::cli::{normalise, output, show_secret, Context};
use crate::errors::Result;

use super::pick_user;

/// Execute the `get` command.
///
/// With an offset the passphrase for that index is shown; the stored
/// index is left alone.
pub fn execute(
    ctx: &Context,
    cave: &mut Cave,
    service: &str,
    user: Option<&str>,
    offset: Option<i64>,
) -> Result<()> {
    let service = normalise(service);
    let user = pick_user(cave, &service, user)?;
    let revealed = cave.get(&service, user.as_deref(), offset)?;

    if !ctx.quiet {
        let item = &revealed.item;
        output::info(&format!(
            "{} for {} (index {})",
            item.user, item.service, item.index
        ));
    }
    show_secret("Passphrase", &revealed.passphrase, ctx)
}
