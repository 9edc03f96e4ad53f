//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::collections::BTreeMap;

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cave::{is_sentinel, Index};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of services (Service, User).
///
/// A service with several users shows the count instead of a name.
/// The sentinel service is never shown.
pub fn print_index(index: &Index) {
    let rows: Vec<_> = index
        .iter()
        .filter(|(service, _)| !is_sentinel(service))
        .collect();

    if rows.is_empty() {
        info("No services in this cave yet.");
        tip("Run `sesame add <SERVICE> <USER>` to add your first service.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "User"]);

    for (service, users) in rows {
        let user = match users.keys().next() {
            Some(user) if users.len() == 1 => user.clone(),
            _ => format!("({} users)", users.len()),
        };
        table.add_row(vec![service.clone(), user]);
    }

    println!("{table}");
}

/// Print a table of one service's users (User, Index).
pub fn print_users(service: &str, users: &BTreeMap<String, i64>) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![format!("{service} user"), "Index".to_string()]);

    for (user, index) in users {
        table.add_row(vec![user.clone(), index.to_string()]);
    }

    println!("{table}");
}
