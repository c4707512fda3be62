//! Command registry: a declarative table of counter operations and their
//! aliases, installed once into an immutable name table.
//!
//! Registration records associations without checking them. Installation
//! walks the associations, binds every canonical name and then its aliases,
//! and fails on the first collision without producing a table.

use crate::abacus::Abacus;
use crate::error::{AbacusError, Result};
use crate::invariant_ppt::{
    assert_invariant, ALIAS_AFTER_CANONICAL, NAMES_UNIQUE, PUBLIC_NAMES_SORTED,
};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Public name of the counter type.
pub const TYPE_NAME: &str = "Abacus";

/// Public name of the function that starts a new calculation.
pub const RESET_NAME: &str = "new_abacus";

/// A counter operation taking one integer argument.
pub type Operation = fn(&mut Abacus, i64);

/// One association: a canonical name, its aliases and the operation they run.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Canonical name.
    pub name: &'static str,
    /// Additional names, installed after the canonical one.
    pub aliases: &'static [&'static str],
    /// The counter operation.
    pub operation: Operation,
    /// Short description (shown in listings).
    pub description: &'static str,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// The built-in command table, handed to `$callback` as
/// `name [aliases] => operation, "description";` rows.
///
/// Both `COMMANDS` and the free functions in `imperative` expand from this
/// one table.
macro_rules! builtin_commands {
    ($callback:ident) => {
        $callback! {
            add [] => Abacus::add, "Add a value to the running total";
            subtract [sub] => Abacus::subtract, "Subtract a value from the running total";
        }
    };
}
pub(crate) use builtin_commands;

macro_rules! command_specs {
    ($( $name:ident [$($alias:ident),*] => $op:path, $desc:literal; )*) => {
        /// Built-in commands.
        static COMMANDS: &[CommandSpec] = &[
            $(
                CommandSpec {
                    name: stringify!($name),
                    aliases: &[$(stringify!($alias)),*],
                    operation: $op,
                    description: $desc,
                },
            )*
        ];
    };
}

builtin_commands!(command_specs);

/// Entry point generated for a canonical name. Every alias shares it.
#[derive(Clone, Copy)]
pub struct EntryPoint {
    canonical: &'static str,
    operation: Operation,
}

impl EntryPoint {
    fn new(spec: &CommandSpec) -> Self {
        Self {
            canonical: spec.name,
            operation: spec.operation,
        }
    }

    /// Canonical name this entry point was generated for.
    pub fn canonical(&self) -> &'static str {
        self.canonical
    }

    /// The bound counter operation.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Apply the bound operation to `abacus`.
    pub fn invoke(&self, abacus: &mut Abacus, value: i64) {
        (self.operation)(abacus, value);
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryPoint({})", self.canonical)
    }
}

/// What an installed name refers to.
#[derive(Debug, Clone, Copy)]
pub enum Binding {
    /// The counter type itself.
    Type,
    /// The reset function.
    Reset,
    /// A generated entry point.
    Command(EntryPoint),
}

/// Collects associations before installation.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    reserved: Vec<(&'static str, Binding)>,
    pending: Vec<CommandSpec>,
}

impl CommandRegistry {
    /// Create a registry holding only the reserved names.
    pub fn new() -> Self {
        Self {
            reserved: vec![(TYPE_NAME, Binding::Type), (RESET_NAME, Binding::Reset)],
            pending: Vec::new(),
        }
    }

    /// Record an association. Collisions are only detected by [`install_all`](Self::install_all).
    pub fn register(
        &mut self,
        name: &'static str,
        aliases: &'static [&'static str],
        operation: Operation,
        description: &'static str,
    ) -> &mut Self {
        self.register_spec(CommandSpec {
            name,
            aliases,
            operation,
            description,
        })
    }

    /// Record a prepared association.
    pub fn register_spec(&mut self, spec: CommandSpec) -> &mut Self {
        self.pending.push(spec);
        self
    }

    /// Associations recorded so far, in registration order.
    pub fn pending(&self) -> &[CommandSpec] {
        &self.pending
    }

    /// Install every association. On a collision nothing is installed.
    pub fn install_all(self) -> Result<Commands> {
        let mut table = BTreeMap::new();
        for &(name, binding) in &self.reserved {
            install(&mut table, name, binding)?;
        }

        for spec in &self.pending {
            let entry = EntryPoint::new(spec);
            install(&mut table, spec.name, Binding::Command(entry))?;
            for &alias in spec.aliases {
                assert_invariant(
                    ALIAS_AFTER_CANONICAL,
                    table.contains_key(spec.name),
                    "Alias installed before its canonical name",
                    Some(alias),
                );
                install(&mut table, alias, Binding::Command(entry))?;
            }
        }

        info!(
            "installed {} commands under {} public names",
            self.pending.len(),
            table.len()
        );
        Ok(Commands {
            table,
            specs: self.pending,
        })
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn install(
    table: &mut BTreeMap<&'static str, Binding>,
    name: &'static str,
    binding: Binding,
) -> Result<()> {
    if table.contains_key(name) {
        warn!("refusing to install duplicate name {:?}", name);
        return Err(AbacusError::DuplicateName(name.to_string()));
    }
    debug!("installing {:?} -> {:?}", name, binding);
    let replaced = table.insert(name, binding);
    assert_invariant(
        NAMES_UNIQUE,
        replaced.is_none(),
        "Installing a name replaced an existing binding",
        Some(name),
    );
    Ok(())
}

/// Registry pre-loaded with the built-in command table.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for spec in COMMANDS {
        registry.register_spec(*spec);
    }
    registry
}

/// The installed, immutable name table.
#[derive(Debug, Clone)]
pub struct Commands {
    table: BTreeMap<&'static str, Binding>,
    specs: Vec<CommandSpec>,
}

impl Commands {
    /// Resolve a canonical name or alias.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.table.get(name).copied()
    }

    /// Resolve a name to its entry point, if it names a command.
    pub fn entry_point(&self, name: &str) -> Option<EntryPoint> {
        match self.lookup(name)? {
            Binding::Command(entry) => Some(entry),
            Binding::Type | Binding::Reset => None,
        }
    }

    /// Every installed name, sorted.
    pub fn public_names(&self) -> Vec<&'static str> {
        let names: Vec<&'static str> = self.table.keys().copied().collect();
        assert_invariant(
            PUBLIC_NAMES_SORTED,
            names.windows(2).all(|pair| pair[0] < pair[1]),
            "Public names not strictly sorted",
            Some("public_names"),
        );
        names
    }

    /// Installed commands in registration order.
    pub fn entries(&self) -> &[CommandSpec] {
        &self.specs
    }

    /// One listing line per command: name, description and aliases.
    pub fn help(&self) -> String {
        let mut out = String::new();
        for spec in &self.specs {
            out.push_str(&format!("  {:12} - {}", spec.name, spec.description));
            if !spec.aliases.is_empty() {
                out.push_str(&format!(" (aliases: {})", spec.aliases.join(", ")));
            }
            out.push('\n');
        }
        out
    }

    /// Number of installed names.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
