use std::path::Path;

use tracing::info;

use skillswap_store::backup::{ImportStats, Snapshot};

use crate::error::Result;
use crate::state::AppState;

/// Export every collection as a pretty-printed JSON string.
pub fn export_backup(state: &AppState) -> Result<String> {
    let snapshot = state.store.export_snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)?;

    info!(
        users = snapshot.users.len(),
        skills = snapshot.skills.len(),
        messages = snapshot.messages.len(),
        conversations = snapshot.conversations.len(),
        "Backup exported"
    );

    Ok(json)
}

/// Write the backup JSON to `path`.
pub fn save_backup_to_file(state: &AppState, path: &Path) -> Result<()> {
    let json = export_backup(state)?;
    std::fs::write(path, json.as_bytes())?;

    info!(path = %path.display(), "Backup saved to file");
    Ok(())
}

/// Merge a backup produced by [`export_backup`]. Local records win.
pub fn import_backup(state: &mut AppState, json: &str) -> Result<ImportStats> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    let stats = state.store.import_snapshot(&snapshot)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use skillswap_shared::Category;
    use skillswap_store::{SkillEntry, User};

    use super::*;
    use crate::commands::identity::sign_up;
    use crate::commands::skills::add_skill;
    use crate::error::ClientError;

    #[test]
    fn test_export_then_import_into_fresh_state() {
        let mut source = AppState::in_memory();
        sign_up(&mut source, "Ann", "a@x.com", "pw", "NYC").unwrap();
        add_skill(&mut source, "Guitar", Category::Music, "", "NYC").unwrap();
        let json = export_backup(&source).unwrap();

        let mut target = AppState::in_memory();
        let stats = import_backup(&mut target, &json).unwrap();
        assert_eq!(stats.users_imported, 1);
        assert_eq!(stats.skills_imported, 1);
        assert_eq!(stats.messages_imported, 0);

        assert_eq!(target.store.load_all::<User>().unwrap()[0].email, "a@x.com");
        assert_eq!(target.store.load_all::<SkillEntry>().unwrap()[0].title, "Guitar");

        // second import adds nothing
        let again = import_backup(&mut target, &json).unwrap();
        assert_eq!(again, ImportStats::default());
    }

    #[test]
    fn test_save_backup_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut state = AppState::in_memory();
        sign_up(&mut state, "Ann", "a@x.com", "pw", "NYC").unwrap();
        save_backup_to_file(&state, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(snapshot.users.len(), 1);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut state = AppState::in_memory();
        assert!(matches!(
            import_backup(&mut state, "not json"),
            Err(ClientError::Serialization(_))
        ));
    }
}
