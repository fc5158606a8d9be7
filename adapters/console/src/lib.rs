#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Administrative console surface for the mitigation plugin.
//!
//! Each command is a thin adapter from free-text console arguments to the
//! controller's operations. Argument parsing is first-space delimited with
//! no quoting support, matching the host console's conventions. Command
//! output goes to the provided writer so tests can capture it verbatim.

use std::io::Write;

use anyhow::Result;
use hudshield_core::{Command, SeverityLevel};
use hudshield_plugin::{coerce_level, MitigationPlugin};
use hudshield_world::{self as world, World};

/// A named console command with a short alias and static help text.
pub trait ConsoleCommand {
    /// Primary name the command is dispatched under.
    fn name(&self) -> &'static str;

    /// Short alias accepted interchangeably with the name.
    fn alias(&self) -> &'static str;

    /// One-line usage summary shown by the help listing.
    fn help(&self) -> &'static str;

    /// Executes the command against the plugin and the live world.
    fn activate(
        &self,
        args: &str,
        plugin: &mut MitigationPlugin,
        world: &mut World,
        out: &mut dyn Write,
    ) -> Result<()>;
}

/// Applies a controller-produced command batch to the world, discarding the
/// broadcast events.
fn drive(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

/// `add-exception <name> <level>` — insert or overwrite a per-player
/// severity override.
#[derive(Debug, Default)]
pub struct AddException;

impl ConsoleCommand for AddException {
    fn name(&self) -> &'static str {
        "add-exception"
    }

    fn alias(&self) -> &'static str {
        "ae"
    }

    fn help(&self) -> &'static str {
        "ADD-EXCEPTION <name> <level> - Adds a custom mitigation exception for specified player."
    }

    fn activate(
        &self,
        args: &str,
        plugin: &mut MitigationPlugin,
        world: &mut World,
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some((name, rest)) = args.split_once(' ') else {
            writeln!(out, "Usage: {}", self.help())?;
            return Ok(());
        };

        let code = coerce_level(rest);
        if !code.is_defined() {
            writeln!(
                out,
                "Specified level value is invalid. Enter between 0 - {}.",
                SeverityLevel::COUNT - 1
            )?;
            return Ok(());
        }

        drive(world, plugin.add_exception(world, name, code));
        writeln!(out, "{name} has been added to the exception list.")?;
        Ok(())
    }
}

/// `remove-exception <name>` — drop a per-player severity override.
#[derive(Debug, Default)]
pub struct RemoveException;

impl ConsoleCommand for RemoveException {
    fn name(&self) -> &'static str {
        "remove-exception"
    }

    fn alias(&self) -> &'static str {
        "re"
    }

    fn help(&self) -> &'static str {
        "REMOVE-EXCEPTION <name> - Removes the custom mitigation exception for specified player."
    }

    fn activate(
        &self,
        args: &str,
        plugin: &mut MitigationPlugin,
        world: &mut World,
        out: &mut dyn Write,
    ) -> Result<()> {
        let name = args.trim_end();
        if name.is_empty() {
            writeln!(out, "Usage: {}", self.help())?;
            return Ok(());
        }

        drive(world, plugin.remove_exception(world, name));
        writeln!(out, "{name} has been removed from the exception list.")?;
        Ok(())
    }
}

/// `list-exceptions` — print every stored override.
#[derive(Debug, Default)]
pub struct ListExceptions;

impl ConsoleCommand for ListExceptions {
    fn name(&self) -> &'static str {
        "list-exceptions"
    }

    fn alias(&self) -> &'static str {
        "le"
    }

    fn help(&self) -> &'static str {
        "LIST-EXCEPTIONS - Prints all the mitigation exceptions in the memory."
    }

    fn activate(
        &self,
        _args: &str,
        plugin: &mut MitigationPlugin,
        _world: &mut World,
        out: &mut dyn Write,
    ) -> Result<()> {
        writeln!(out, "Begin Mitigation Exceptions:")?;
        for (name, code) in plugin.exceptions() {
            writeln!(out, "{name}: {}", code.get())?;
        }
        writeln!(out, "End of Mitigation Exceptions")?;
        Ok(())
    }
}

/// `flush-exceptions` — persist the store to its backing file.
#[derive(Debug, Default)]
pub struct FlushExceptions;

impl ConsoleCommand for FlushExceptions {
    fn name(&self) -> &'static str {
        "flush-exceptions"
    }

    fn alias(&self) -> &'static str {
        "fe"
    }

    fn help(&self) -> &'static str {
        "FLUSH-EXCEPTIONS - Saves the changes in the mitigation exceptions to the file."
    }

    fn activate(
        &self,
        _args: &str,
        plugin: &mut MitigationPlugin,
        _world: &mut World,
        out: &mut dyn Write,
    ) -> Result<()> {
        match plugin.flush_exceptions() {
            Ok(()) => writeln!(out, "Mitigation exceptions have been written to the file.")?,
            Err(error) => {
                tracing::warn!(
                    %error,
                    path = %plugin.exceptions_path().display(),
                    "exception flush failed"
                );
                writeln!(out, "Mitigation exceptions could not be flushed.")?;
            }
        }
        Ok(())
    }
}

/// Dispatch table over the registered console commands.
pub struct CommandRegistry {
    commands: Vec<Box<dyn ConsoleCommand>>,
}

impl CommandRegistry {
    /// Creates a registry holding the four administrative commands, sorted
    /// by name for stable help output.
    #[must_use]
    pub fn new() -> Self {
        let mut commands: Vec<Box<dyn ConsoleCommand>> = vec![
            Box::new(AddException),
            Box::new(RemoveException),
            Box::new(ListExceptions),
            Box::new(FlushExceptions),
        ];
        commands.sort_by_key(|command| command.name());
        Self { commands }
    }

    /// Splits a console line into its command word and argument remainder,
    /// then dispatches by name or alias.
    ///
    /// Returns `false` when no registered command matches.
    pub fn dispatch(
        &self,
        line: &str,
        plugin: &mut MitigationPlugin,
        world: &mut World,
        out: &mut dyn Write,
    ) -> Result<bool> {
        let line = line.trim();
        let (word, args) = match line.split_once(' ') {
            Some((word, args)) => (word, args),
            None => (line, ""),
        };

        for command in &self.commands {
            if command.name() == word || command.alias() == word {
                command.activate(args, plugin, world, out)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Help lines for every registered command, in name order.
    #[must_use]
    pub fn help_lines(&self) -> Vec<&'static str> {
        self.commands.iter().map(|command| command.help()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
