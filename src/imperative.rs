//! Imperative API over one process-wide abacus.
//!
//! ```
//! use abacus::imperative::{add, dir, new_abacus, sub};
//!
//! new_abacus();
//! assert_eq!(add(7).to_string(), "Abacus(7)");
//! assert_eq!(sub(4).to_string(), "Abacus(3)");
//! assert_eq!(dir(), ["Abacus", "add", "new_abacus", "sub", "subtract"]);
//! ```
//!
//! Each function holds the session lock for its whole obtain-mutate-return
//! step, so concurrent callers are serialized rather than interleaved.

use crate::abacus::Abacus;
use crate::error::Result;
use crate::registry::{builtin_commands, default_registry, Commands, EntryPoint};
use crate::session::Session;
use lazy_static::lazy_static;
use std::sync::{Mutex, PoisonError};

lazy_static! {
    static ref MAIN: Mutex<Session> = Mutex::new(Session::new(install_builtin()));
}

// A collision in the built-in table is fatal to initialization.
fn install_builtin() -> Commands {
    match default_registry().install_all() {
        Ok(commands) => commands,
        Err(err) => panic!("built-in command table is invalid: {}", err),
    }
}

fn with_main<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    let mut session = MAIN.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut session)
}

// Every name reaches its operation through the installed table.
fn dispatch(name: &str, value: i64) -> Abacus {
    with_main(|session| match session.invoke(name, value) {
        Ok(abacus) => abacus,
        Err(err) => panic!("built-in command {} is not installed: {}", name, err),
    })
}

macro_rules! entry_functions {
    ($( $name:ident [$($alias:ident),*] => $op:path, $desc:literal; )*) => {
        $(
            #[doc = concat!($desc, ", on the shared abacus.")]
            pub fn $name(value: i64) -> Abacus {
                dispatch(stringify!($name), value)
            }

            $(
                #[doc = concat!("Alias of [`", stringify!($name), "`].")]
                pub fn $alias(value: i64) -> Abacus {
                    dispatch(stringify!($alias), value)
                }
            )*
        )*
    };
}

builtin_commands!(entry_functions);

/// Start a new calculation.
pub fn new_abacus() {
    with_main(Session::reset);
}

/// Public names, sorted.
pub fn dir() -> Vec<&'static str> {
    with_main(|session| session.dir())
}

/// Invoke a public name on the shared session.
pub fn call(name: &str, args: &[i64]) -> Result<Option<Abacus>> {
    with_main(|session| session.call(name, args))
}

/// Run one command line on the shared session.
pub fn execute(line: &str) -> Result<Option<Abacus>> {
    with_main(|session| session.execute(line))
}

/// Entry point installed under `name` on the shared session.
pub fn entry_point(name: &str) -> Option<EntryPoint> {
    with_main(|session| session.commands().entry_point(name))
}

/// Command listing with descriptions and aliases.
pub fn help() -> String {
    with_main(|session| session.commands().help())
}
