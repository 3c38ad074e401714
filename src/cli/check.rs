use crate::check::StdinInput;
use crate::config::Config;
use crate::driver::SyncDriver;
use crate::library::FileTagProvider;
use crate::remote::SpotifyClient;
use crate::{error, success};

pub async fn check() {
    let config = Config::from_env();
    let api = match SpotifyClient::new().await {
        Ok(api) => api,
        Err(e) => error!("Cannot create API client: {}", e),
    };

    let driver = SyncDriver::new(&api, &config);
    let mut collections = driver.search(&FileTagProvider).await;
    let report = driver.check(&mut collections, StdinInput).await;

    success!(
        "Check finished: {} switched, {} unavailable, {} left unresolved",
        report.switched.len(),
        report.unavailable.len(),
        report.skipped.len()
    );
}
