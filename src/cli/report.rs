use tabled::Table;

use crate::management::{CheckpointManager, Stage};
use crate::types::SearchTableRow;
use crate::{error, warning};

/// Prints the match status of every collection from the most recent
/// checkpoint (check results when present, search results otherwise).
pub async fn report() {
    let checkpoints = CheckpointManager::new();

    let collections = match checkpoints.load(Stage::Check).await {
        Ok(Some(collections)) => collections,
        _ => match checkpoints.load(Stage::Search).await {
            Ok(Some(collections)) => collections,
            Ok(None) => {
                warning!("No checkpoint found. Run splisync search first.");
                return;
            }
            Err(e) => error!("Cannot load checkpoint: {:?}", e),
        },
    };

    let rows: Vec<SearchTableRow> = collections
        .iter()
        .map(|c| {
            let matched = c.tracks.iter().filter(|t| t.uri.is_resolved()).count();
            let skipped = c.tracks.iter().filter(|t| t.uri.is_unavailable()).count();
            SearchTableRow {
                collection: c.name.clone(),
                matched,
                unmatched: c.tracks.len() - matched - skipped,
                skipped,
                total: c.tracks.len(),
            }
        })
        .collect();

    println!("{}", Table::new(rows));
}
