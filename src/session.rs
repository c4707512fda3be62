//! Session: the shared counter handle threaded explicitly through calls.

use crate::abacus::Abacus;
use crate::error::{AbacusError, Result};
use crate::invariant_ppt::{assert_invariant, RESET_DISCARDS_STATE, SINGLE_SHARED_INSTANCE};
use crate::registry::{Binding, Commands, Operation};
use log::debug;
use std::num::IntErrorKind;

/// Owns the installed commands and the one live abacus they operate on.
#[derive(Debug, Clone)]
pub struct Session {
    commands: Commands,
    current: Option<Abacus>,
    generation: u64,
}

impl Session {
    /// Create a session. The abacus is created on first use.
    pub fn new(commands: Commands) -> Self {
        Self {
            commands,
            current: None,
            generation: 0,
        }
    }

    /// The installed name table.
    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    /// The live abacus, if one has been created.
    pub fn current(&self) -> Option<&Abacus> {
        self.current.as_ref()
    }

    /// How many abacus instances this session has created so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The live abacus, created at zero if absent.
    pub fn abacus(&mut self) -> &mut Abacus {
        if self.current.is_none() {
            // Only the first instance is created lazily; resets replace it eagerly.
            assert_invariant(
                SINGLE_SHARED_INSTANCE,
                self.generation == 0,
                "Shared abacus recreated lazily after it existed",
                Some("abacus"),
            );
            debug!("creating shared abacus");
            self.generation += 1;
        }
        self.current.get_or_insert_with(Abacus::default)
    }

    /// Apply the entry point installed under `name` to the live abacus.
    pub fn invoke(&mut self, name: &str, value: i64) -> Result<Abacus> {
        let entry = self
            .commands
            .entry_point(name)
            .ok_or_else(|| AbacusError::UnknownCommand(name.to_string()))?;
        Ok(self.apply(entry.operation(), value))
    }

    /// Apply `operation` to the live abacus and return it.
    pub fn apply(&mut self, operation: Operation, value: i64) -> Abacus {
        let abacus = self.abacus();
        operation(abacus, value);
        *abacus
    }

    /// Replace the live abacus with a fresh one at zero.
    pub fn reset(&mut self) {
        let before = self.generation;
        let previous = self.current.replace(Abacus::default());
        self.generation += 1;
        debug!("discarding {:?}", previous);
        assert_invariant(
            RESET_DISCARDS_STATE,
            self.generation == before + 1 && self.current.map(|a| a.total()) == Some(0),
            "Reset did not install exactly one fresh abacus",
            Some("reset"),
        );
    }

    /// Public names, sorted.
    pub fn dir(&self) -> Vec<&'static str> {
        self.commands.public_names()
    }

    /// Invoke an installed name with `args`.
    ///
    /// Commands return the live abacus; `new_abacus` resets and returns
    /// `None`; `Abacus` builds a standalone abacus from an optional start value.
    pub fn call(&mut self, name: &str, args: &[i64]) -> Result<Option<Abacus>> {
        let binding = self
            .commands
            .lookup(name)
            .ok_or_else(|| AbacusError::UnknownCommand(name.to_string()))?;

        match binding {
            Binding::Command(entry) => {
                let value = match args {
                    [value] => *value,
                    _ => return Err(arity(name, 1, 1, args.len())),
                };
                Ok(Some(self.apply(entry.operation(), value)))
            }
            Binding::Reset => {
                if !args.is_empty() {
                    return Err(arity(name, 0, 0, args.len()));
                }
                self.reset();
                Ok(None)
            }
            Binding::Type => match args {
                [] => Ok(Some(Abacus::default())),
                [start] => Ok(Some(Abacus::new(i128::from(*start)))),
                _ => Err(arity(name, 0, 1, args.len())),
            },
        }
    }

    /// Run one line such as `"sub 3"`. A blank line does nothing.
    pub fn execute(&mut self, line: &str) -> Result<Option<Abacus>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let args = words
            .map(|word| parse_amount(name, word))
            .collect::<Result<Vec<i64>>>()?;

        self.call(name, &args)
    }
}

fn arity(command: &str, min: usize, max: usize, given: usize) -> AbacusError {
    AbacusError::Arity {
        command: command.to_string(),
        min,
        max,
        given,
    }
}

fn parse_amount(command: &str, word: &str) -> Result<i64> {
    word.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => AbacusError::OutOfRange {
            command: command.to_string(),
            value: word.to_string(),
        },
        _ => AbacusError::NotANumber {
            command: command.to_string(),
            value: word.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_registry;

    fn session() -> Session {
        Session::new(default_registry().install_all().unwrap())
    }

    #[test]
    fn abacus_is_created_lazily() {
        let mut s = session();
        assert!(s.current().is_none());
        s.call("add", &[5]).unwrap();
        assert_eq!(s.current(), Some(&Abacus::new(5)));
    }

    #[test]
    fn add_subtract_reset_scenario() {
        let mut s = session();
        assert_eq!(s.call("add", &[5]).unwrap().unwrap().describe(), "Abacus(5)");
        assert_eq!(s.call("subtract", &[3]).unwrap().unwrap().describe(), "Abacus(2)");
        assert_eq!(s.call("new_abacus", &[]).unwrap(), None);
        assert_eq!(s.call("add", &[1]).unwrap().unwrap().describe(), "Abacus(1)");
    }

    #[test]
    fn alias_and_canonical_share_the_abacus() {
        let mut via_alias = session();
        via_alias.call("add", &[7]).unwrap();
        let a = via_alias.call("sub", &[4]).unwrap();

        let mut via_canonical = session();
        via_canonical.call("add", &[7]).unwrap();
        let b = via_canonical.call("subtract", &[4]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.unwrap().total(), 3);
    }

    #[test]
    fn wrong_arity_is_a_type_error() {
        let mut s = session();
        let err = s.call("add", &[1, 2]).unwrap_err();
        assert!(err.is_type_error());
        assert!(s.call("sub", &[]).unwrap_err().is_type_error());
        assert!(s.call("new_abacus", &[1]).unwrap_err().is_type_error());
        // nothing was applied
        assert!(s.current().is_none());
    }

    #[test]
    fn unknown_name() {
        let mut s = session();
        assert_eq!(
            s.call("multiply", &[2]).unwrap_err(),
            AbacusError::UnknownCommand("multiply".to_string())
        );
    }

    #[test]
    fn type_name_builds_standalone_abacus() {
        let mut s = session();
        s.call("add", &[2]).unwrap();
        assert_eq!(s.call("Abacus", &[9]).unwrap(), Some(Abacus::new(9)));
        assert_eq!(s.call("Abacus", &[]).unwrap(), Some(Abacus::new(0)));
        assert_eq!(s.current(), Some(&Abacus::new(2)));
    }

    #[test]
    fn execute_lines() {
        let mut s = session();
        assert_eq!(s.execute("   ").unwrap(), None);
        assert_eq!(s.execute("add 7").unwrap(), Some(Abacus::new(7)));
        assert_eq!(s.execute("  sub   4 ").unwrap(), Some(Abacus::new(3)));
        assert_eq!(s.execute("new_abacus").unwrap(), None);
        assert_eq!(s.execute("add -2").unwrap(), Some(Abacus::new(-2)));
    }

    #[test]
    fn execute_rejects_non_numbers() {
        let mut s = session();
        let err = s.execute("add five").unwrap_err();
        assert_eq!(
            err,
            AbacusError::NotANumber {
                command: "add".to_string(),
                value: "five".to_string(),
            }
        );
        assert!(err.is_type_error());
        assert!(s.current().is_none());
    }

    #[test]
    fn totals_past_i64_bounds() {
        let mut s = session();
        s.call("add", &[i64::MAX]).unwrap();
        let a = s.call("add", &[1]).unwrap().unwrap();
        assert_eq!(a.total(), i128::from(i64::MAX) + 1);

        s.reset();
        s.call("sub", &[i64::MIN]).unwrap();
        let b = s.call("sub", &[i64::MIN]).unwrap().unwrap();
        assert_eq!(b.total(), -2 * i128::from(i64::MIN));
    }

    #[test]
    fn execute_reports_out_of_range_numerals() {
        let mut s = session();
        assert_eq!(
            s.execute("add 9223372036854775808").unwrap_err(),
            AbacusError::OutOfRange {
                command: "add".to_string(),
                value: "9223372036854775808".to_string(),
            }
        );
        assert!(s.execute("sub -9223372036854775809").unwrap_err().is_type_error());
        assert_eq!(
            s.execute("add 9223372036854775807").unwrap(),
            Some(Abacus::new(i128::from(i64::MAX)))
        );
    }

    #[test]
    fn type_name_arity_is_a_range() {
        let mut s = session();
        assert_eq!(
            s.call("Abacus", &[1, 2]).unwrap_err(),
            AbacusError::Arity {
                command: "Abacus".to_string(),
                min: 0,
                max: 1,
                given: 2,
            }
        );
    }

    #[test]
    fn reset_replaces_the_instance() {
        let mut s = session();
        assert_eq!(s.generation(), 0);
        s.call("add", &[3]).unwrap();
        s.call("add", &[4]).unwrap();
        assert_eq!(s.generation(), 1);
        s.reset();
        assert_eq!(s.generation(), 2);
        assert_eq!(s.current(), Some(&Abacus::new(0)));
        s.call("sub", &[1]).unwrap();
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn invoke_resolves_aliases() {
        let mut s = session();
        s.invoke("add", 7).unwrap();
        assert_eq!(s.invoke("sub", 4).unwrap(), Abacus::new(3));
        assert_eq!(
            s.invoke("new_abacus", 1).unwrap_err(),
            AbacusError::UnknownCommand("new_abacus".to_string())
        );
    }

    #[test]
    fn dir_matches_public_names() {
        let s = session();
        assert_eq!(s.dir(), s.commands().public_names());
    }
}
