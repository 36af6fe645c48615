//! `pricecmp history` subcommand

use clap::Args;

use crate::config::Config;

/// Show or clear recent searches
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Forget all recent searches
    #[arg(long, conflicts_with = "json")]
    pub clear: bool,
}

impl HistoryArgs {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = super::open_session(config);

        if self.clear {
            session.clear_history()?;
            println!("Search history cleared");
            return Ok(());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(session.history())?);
        } else {
            print!("{}", render_text(session.history()));
        }
        Ok(())
    }
}

fn render_text(history: &[String]) -> String {
    if history.is_empty() {
        return "No recent searches\n".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, query)| format!("{:>2}. {}\n", i + 1, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{FileHistoryStore, HistoryStore};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config::new(
            "http://localhost:3000".into(),
            1,
            Some(PathBuf::from(dir.path())),
        )
        .unwrap()
    }

    #[test]
    fn test_render_text_numbers_entries() {
        let text = render_text(&["laptop".to_string(), "phone".to_string()]);
        assert_eq!(text, " 1. laptop\n 2. phone\n");
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&[]), "No recent searches\n");
    }

    #[test]
    fn test_clear_empties_history_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());
        store.persist(&["phone".to_string()]).unwrap();

        let args = HistoryArgs {
            json: false,
            clear: true,
        };
        args.run(&config_in(&temp_dir)).unwrap();

        assert!(store.load().is_empty());
    }
}
