pub mod auth;
pub mod captions;
pub mod categories;
pub mod channels;
pub mod chapters;
pub mod cuepoints;
pub mod entries;
pub mod flavors;
pub mod playlists;
pub mod quizzes;
pub mod reports;
pub mod retention;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::select::{self, Selector};

/// Entry selection options shared by the bulk commands. Exactly one
/// selection method must be given.
#[derive(Args, Debug, Clone)]
pub struct SelectorArgs {
    /// Comma-delimited list of entry IDs
    #[arg(long, value_name = "IDS")]
    pub entry_ids: Option<String>,

    /// CSV file to read entry IDs from
    #[arg(long, value_name = "FILE")]
    pub input_csv: Option<PathBuf>,

    /// Column header holding the entry IDs [default: entry_id]
    #[arg(long, value_name = "HEADER")]
    pub csv_column: Option<String>,

    /// Select entries whose tags contain this string
    #[arg(long)]
    pub tag: Option<String>,

    /// Select entries published in this category ID
    #[arg(long, value_name = "ID")]
    pub category: Option<String>,

    /// With --category, also match entries in descendant categories
    #[arg(long)]
    pub include_child_categories: bool,

    /// Select entries owned by this user ID
    #[arg(long, value_name = "USER")]
    pub owner: Option<String>,
}

impl SelectorArgs {
    pub fn to_selector(&self) -> Result<Selector> {
        select::from_options(
            self.entry_ids.clone(),
            self.input_csv.clone(),
            self.csv_column.clone(),
            self.tag.clone(),
            self.category.clone(),
            self.include_child_categories,
            self.owner.clone(),
        )
    }
}
