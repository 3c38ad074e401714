use crate::config::Config;
use crate::library::{FileTagProvider, LocalLibrary, TagProvider};
use crate::management::BackupManager;
use crate::{error, info, success, warning};

/// Saves the `path -> uri` map for every track in the library.
pub async fn backup() {
    let config = Config::from_env();
    let library = LocalLibrary::load(&config, &FileTagProvider);
    let manager = BackupManager::new();

    match manager.save(library.tracks()).await {
        Ok(count) => success!("Backed up URIs for {} tracks", count),
        Err(e) => error!("Backup failed: {:?}", e),
    }
}

/// Overlays the saved backup onto the library and writes the restored URIs
/// back into file tags. Only records whose path appears in the backup are
/// touched; everything else keeps its current URI.
pub async fn restore(live: bool) {
    let config = Config::from_env();
    let provider = FileTagProvider;
    let mut library = LocalLibrary::load(&config, &provider);
    let manager = BackupManager::new();

    let backup = match manager.load().await {
        Ok(backup) => backup,
        Err(e) => error!("Cannot load backup: {:?}", e),
    };

    let restored = library.restore_uris(&backup);
    info!("Restored URIs on {} tracks", restored);

    let dry_run = !live;
    let mut written = 0;
    for collection in &library.folders {
        for track in &collection.tracks {
            if !backup.contains_key(&track.path) {
                continue;
            }
            match provider.write(&track.path, track, false, dry_run) {
                Ok(result) if result.saved => written += 1,
                Ok(_) => {}
                Err(e) => warning!("Cannot write {}: {:?}", track.path.display(), e),
            }
        }
    }

    if dry_run {
        info!("Dry run: no file was modified. Re-run with --live to apply.");
    } else {
        success!("{} files updated", written);
    }
}
