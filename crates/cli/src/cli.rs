//! Command-line surface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use riskscreen_domain::SearchType;

/// Riskscreen - entity screening against the Dow Jones risk & compliance API
#[derive(Debug, Parser)]
#[command(name = "riskscreen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML or JSON); environment variables win when set
    #[arg(long, global = true, env = "RISKSCREEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the batch job: download names, screen, export and deliver the CSV
    Batch,

    /// Screen names in a new case and wait for its matches
    Screen {
        /// Names to screen
        #[arg(required = true)]
        names: Vec<String>,
        /// Base delay in seconds for the match polling loop
        #[arg(long)]
        match_delay: Option<u64>,
    },

    /// Fetch a screening case
    Case {
        /// Case ID
        case_id: String,
    },

    /// List screening cases
    Cases {
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Page size (1..=1000)
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Fetch a bulk-association transaction
    Transaction {
        /// Case ID
        case_id: String,
        /// Transaction ID
        transaction_id: String,
    },

    /// Fetch the valid, alerted matches of a case
    Matches {
        /// Case ID
        case_id: String,
        /// Page size (defaults to the configured match page limit)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Search the risk-entity catalogue
    Search {
        #[command(subcommand)]
        action: SearchAction,
    },

    /// Fetch a risk profile
    Profile {
        /// Profile ID
        profile_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SearchAction {
    /// Free-text name search over persons and entities
    Name {
        name: String,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, value_enum, default_value = "broad")]
        search_type: SearchTypeArg,
    },
    /// Person search by name parts
    Person {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, value_enum, default_value = "broad")]
        search_type: SearchTypeArg,
    },
    /// Organisation search by name
    Entity {
        entity_name: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, value_enum, default_value = "broad")]
        search_type: SearchTypeArg,
    },
    /// Exact lookup by identification number
    Id {
        id_number: String,
        /// Identifier type, e.g. "National Tax No."
        #[arg(long)]
        id_type: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchTypeArg {
    Broad,
    Near,
    Precise,
    Exact,
}

impl From<SearchTypeArg> for SearchType {
    fn from(arg: SearchTypeArg) -> Self {
        match arg {
            SearchTypeArg::Broad => SearchType::Broad,
            SearchTypeArg::Near => SearchType::Near,
            SearchTypeArg::Precise => SearchType::Precise,
            SearchTypeArg::Exact => SearchType::Exact,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_screen_with_match_delay() {
        let cli = Cli::try_parse_from([
            "riskscreen",
            "screen",
            "Acme Corp",
            "Jane Doe",
            "--match-delay",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Screen { names, match_delay } => {
                assert_eq!(names, vec!["Acme Corp", "Jane Doe"]);
                assert_eq!(match_delay, Some(30));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn screen_requires_names() {
        assert!(Cli::try_parse_from(["riskscreen", "screen"]).is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["riskscreen", "case", "C1", "--config", "riskscreen.toml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("riskscreen.toml")));
        assert!(matches!(cli.command, Commands::Case { case_id } if case_id == "C1"));
    }

    #[test]
    fn parses_person_search() {
        let cli = Cli::try_parse_from([
            "riskscreen",
            "search",
            "person",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--search-type",
            "precise",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                action: SearchAction::Person { first_name, middle_name, search_type, limit, .. },
            } => {
                assert_eq!(first_name, "Jane");
                assert_eq!(middle_name, None);
                assert_eq!(limit, 20);
                assert_eq!(SearchType::from(search_type), SearchType::Precise);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
