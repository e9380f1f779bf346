//! Application state and command handling for the Pokedex CLI
//!
//! `App` is the single context object built at startup and handed to every
//! command: it owns the catalog client, the pagination cursor and the Pokedex.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use thiserror::Error;

use crate::data::{CatalogClient, CatalogError, LocationPage, PaginationCursor};
use crate::pokedex::{is_caught, roll_catch, Pokedex};

/// Metadata for a command shown by `help`
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Every command in the order `help` lists them
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        usage: "help",
        description: "Displays a help message",
    },
    CommandInfo {
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
    },
    CommandInfo {
        name: "map",
        usage: "map",
        description: "Displays the next 20 location areas",
    },
    CommandInfo {
        name: "mapb",
        usage: "mapb",
        description: "Displays the previous 20 location areas",
    },
    CommandInfo {
        name: "explore",
        usage: "explore <area>",
        description: "Lists the Pokemon found in a location area",
    },
    CommandInfo {
        name: "catch",
        usage: "catch <name>",
        description: "Throws a Pokeball at a Pokemon",
    },
    CommandInfo {
        name: "inspect",
        usage: "inspect <name>",
        description: "Shows details of a caught Pokemon",
    },
    CommandInfo {
        name: "pokedex",
        usage: "pokedex",
        description: "Lists every Pokemon you have caught",
    },
];

/// A parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
}

/// Errors from turning input words into a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' to list commands")]
    Unknown(String),

    #[error("Missing argument. Usage: {0}")]
    MissingArgument(&'static str),
}

impl Command {
    /// Parses cleaned input words; the first word selects the command
    pub fn parse(words: &[String]) -> Result<Self, CommandError> {
        let (name, args) = match words.split_first() {
            Some((name, args)) => (name.as_str(), args),
            None => return Err(CommandError::Unknown(String::new())),
        };
        let argument = |usage: &'static str| {
            args.first()
                .cloned()
                .ok_or(CommandError::MissingArgument(usage))
        };

        match name {
            "help" => Ok(Command::Help),
            "exit" => Ok(Command::Exit),
            "map" => Ok(Command::Map),
            "mapb" => Ok(Command::MapBack),
            "explore" => argument("explore <area>").map(Command::Explore),
            "catch" => argument("catch <name>").map(Command::Catch),
            "inspect" => argument("inspect <name>").map(Command::Inspect),
            "pokedex" | "pokedx" => Ok(Command::Pokedex),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Errors a command can fail with; none of them end the session
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("you have not caught {0}")]
    NotCaught(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Main application context shared by all commands
pub struct App {
    /// Catalog client with its response cache
    client: CatalogClient,
    /// Location-area paging position
    pub cursor: PaginationCursor,
    /// Creatures caught this session
    pub pokedex: Pokedex,
    /// Source of catch rolls
    rng: StdRng,
}

impl App {
    /// Creates a new App with an entropy-seeded catch RNG
    pub fn new(client: CatalogClient) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    /// Creates a new App with a specific RNG (for reproducible catches)
    pub fn with_rng(client: CatalogClient, rng: StdRng) -> Self {
        Self {
            client,
            cursor: PaginationCursor::new(),
            pokedex: Pokedex::new(),
            rng,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Runs a command, writing user-facing output to `out`
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow, AppError> {
        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => self.map(out).await?,
            Command::MapBack => self.map_back(out).await?,
            Command::Explore(area) => self.explore(&area, out).await?,
            Command::Catch(name) => self.catch(&name, out).await?,
            Command::Inspect(name) => self.inspect(&name, out)?,
            Command::Pokedex => self.list_pokedex(out)?,
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "Usage:")?;
        for info in COMMANDS {
            writeln!(out, "- {}: {}", info.usage, info.description)?;
        }
        writeln!(out)?;
        Ok(())
    }

    async fn map<W: Write>(&mut self, out: &mut W) -> Result<(), AppError> {
        if self.cursor.is_at_end() {
            writeln!(out, "You have seen every location area. Starting over from the first page.")?;
        }
        let page = self.client.fetch_next_page(&mut self.cursor).await?;
        print_locations(&page, out)
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<(), AppError> {
        let page = self.client.fetch_previous_page(&mut self.cursor).await?;
        print_locations(&page, out)
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "Exploring {area}...")?;
        let location = self.client.location_area(area).await?;

        writeln!(out, "Found Pokemon:")?;
        for name in location.encounter_names() {
            writeln!(out, " - {name}")?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "Throwing a Pokeball at {name}...")?;
        let creature = self.client.creature(name).await?;

        let roll = roll_catch(&mut self.rng, &creature);
        if is_caught(roll) {
            writeln!(out, "{name} was caught!")?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            self.pokedex.record(creature);
        } else {
            writeln!(out, "{name} escaped!")?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<(), AppError> {
        let caught = self
            .pokedex
            .get(name)
            .ok_or_else(|| AppError::NotCaught(name.to_string()))?;
        let creature = &caught.creature;

        writeln!(out, "Name: {}", creature.name)?;
        writeln!(out, "Height: {}", creature.height)?;
        writeln!(out, "Weight: {}", creature.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &creature.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &creature.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        if self.pokedex.is_empty() {
            writeln!(out, "Your Pokedex is empty.")?;
            return Ok(());
        }

        writeln!(out, "Your Pokedex:")?;
        for caught in self.pokedex.sorted() {
            writeln!(
                out,
                " - {} (caught {})",
                caught.creature.name,
                caught.caught_at.format("%H:%M:%S")
            )?;
        }
        Ok(())
    }
}

fn print_locations<W: Write>(page: &LocationPage, out: &mut W) -> Result<(), AppError> {
    for (i, location) in page.results.iter().enumerate() {
        writeln!(out, "{} => {}", i + 1, location.name)?;
    }
    writeln!(out)?;
    Ok(())
}
