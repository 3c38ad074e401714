use crate::config::Config;
use crate::driver::SyncDriver;
use crate::library::FileTagProvider;
use crate::remote::SpotifyClient;
use crate::{error, success};

pub async fn search() {
    let config = Config::from_env();
    let api = match SpotifyClient::new().await {
        Ok(api) => api,
        Err(e) => error!("Cannot create API client: {}", e),
    };

    let driver = SyncDriver::new(&api, &config);
    let collections = driver.search(&FileTagProvider).await;

    let matched: usize = collections
        .iter()
        .flat_map(|c| c.tracks.iter())
        .filter(|t| t.uri.is_resolved())
        .count();
    let total: usize = collections.iter().map(|c| c.tracks.len()).sum();
    success!("Search finished: {}/{} tracks resolved", matched, total);
}
