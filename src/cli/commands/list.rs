//! `sesame list`: show services, or the users of one service.

use crate::cave::{is_sentinel, Cave};
use crate::cli::{normalise, output, Context};
use crate::errors::{Result, SesameError};

/// Execute the `list` command.
pub fn execute(_ctx: &Context, cave: &mut Cave, service: Option<&str>) -> Result<()> {
    let index = cave.index()?;

    let Some(service) = service else {
        output::print_index(index);
        return Ok(());
    };

    let service = normalise(service);
    if is_sentinel(&service) {
        return Err(SesameError::Sentinel("list"));
    }
    let users = index.get(&service).ok_or(SesameError::EntryNotFound)?;
    output::print_users(&service, users);
    Ok(())
}
