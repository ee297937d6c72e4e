//! Command execution implementations

use super::Commands;
use super::{anim, archive, clips, model, resources};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { archive, json } => archive::info(archive, *json),
            Commands::Entry {
                archive,
                index,
                output,
            } => archive::entry(archive, *index, output.as_deref()),
            Commands::Extract {
                archive,
                destination,
                quiet,
            } => archive::extract(archive, destination, *quiet),
            Commands::Model {
                archive,
                index,
                json,
            } => model::inspect(archive, *index, json.as_deref()),
            Commands::Anim {
                archive,
                index,
                json,
            } => anim::inspect(archive, *index, json.as_deref()),
            Commands::Resources {
                archive,
                entry,
                body,
            } => resources::list(archive, *entry, *body),
            Commands::Clips {
                game_dir,
                body,
                fps,
                output,
            } => clips::execute(game_dir, *body, *fps, output.as_deref()),
        }
    }
}
