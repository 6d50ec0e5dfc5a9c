use uuid::Uuid;

use crate::api::error::AppError;
use crate::config::CatalogConfig;
use crate::services::write_transaction::WriteTransaction;
use crate::validation::{Rule, UploadedFile};

/// File columns of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    Thumb,
    Video,
}

impl FileSlot {
    pub const ALL: [FileSlot; 2] = [FileSlot::Thumb, FileSlot::Video];

    pub fn field(self) -> &'static str {
        match self {
            FileSlot::Thumb => "thumb_file",
            FileSlot::Video => "video_file",
        }
    }

    /// Upload rules for this slot, limits taken from configuration.
    pub fn rules(self, config: &CatalogConfig) -> Vec<Rule> {
        let (max_kb, mimes) = match self {
            FileSlot::Thumb => (config.thumb_max_size_kb, &config.thumb_mime_types),
            FileSlot::Video => (config.video_max_size_kb, &config.video_mime_types),
        };
        vec![
            Rule::Nullable,
            Rule::File,
            Rule::MaxKilobytes(max_kb),
            Rule::MimeTypes(mimes.clone()),
        ]
    }
}

/// A new upload for one slot.
#[derive(Debug, Clone)]
pub struct SlotUpload {
    pub slot: FileSlot,
    pub file: UploadedFile,
}

/// Filenames to store on the row after staging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles {
    pub thumb_file: Option<String>,
    pub video_file: Option<String>,
}

impl StagedFiles {
    pub fn get(&self, slot: FileSlot) -> Option<&str> {
        match slot {
            FileSlot::Thumb => self.thumb_file.as_deref(),
            FileSlot::Video => self.video_file.as_deref(),
        }
    }

    fn set(&mut self, slot: FileSlot, name: String) {
        match slot {
            FileSlot::Thumb => self.thumb_file = Some(name),
            FileSlot::Video => self.video_file = Some(name),
        }
    }
}

/// Blob key of a stored file: `<video id>/<filename>`.
pub fn file_key(owner_id: &str, filename: &str) -> String {
    format!("{}/{}", owner_id, filename)
}

/// Random filename keeping the upload's extension.
pub fn generate_filename(file: &UploadedFile) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match file.extension() {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// Writes the new uploads of `owner_id` inside `tx`.
///
/// For each slot that receives a file, the previous file (from `current`) is
/// scheduled for deletion after commit. Slots without an upload are left
/// alone. Files written here are removed by the transaction if it does not
/// commit.
pub async fn stage_uploads(
    tx: &mut WriteTransaction,
    owner_id: &str,
    uploads: Vec<SlotUpload>,
    current: &StagedFiles,
) -> Result<StagedFiles, AppError> {
    let mut staged = current.clone();

    for SlotUpload { slot, file } in uploads {
        let filename = generate_filename(&file);
        let key = file_key(owner_id, &filename);
        tracing::info!(
            "Storing {} for {} as {} ({} bytes)",
            slot.field(),
            owner_id,
            key,
            file.size()
        );
        tx.put_file(&key, file.data.to_vec()).await?;

        if let Some(previous) = current.get(slot).filter(|old| *old != filename) {
            tx.delete_after_commit(file_key(owner_id, previous));
        }
        staged.set(slot, filename);
    }

    Ok(staged)
}
