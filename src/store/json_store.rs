use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;

use crate::deck::card::Card;
use crate::engine::stats::Stats;
use crate::error::{StudyError, StudyResult};
use crate::store::schema::{
    ALL_KEYS, EXPORT_VERSION, ExportData, FLASHCARDS_KEY, LAST_STUDY_DATE_KEY, STATS_KEY,
};
use crate::store::{Persistence, Snapshot};

/// One JSON file per record key inside a data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> StudyResult<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashdeck");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> StudyResult<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// `Ok(None)` when the record was never written. Unparsable records are
    /// moved aside to `<key>.json.corrupt` so a later save cannot clobber them.
    fn read_record<T: DeserializeOwned>(&self, key: &'static str) -> StudyResult<Option<T>> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let aside = path.with_extension("json.corrupt");
                if let Err(rename_err) = fs::rename(&path, &aside) {
                    log::warn!("could not move corrupt {key} aside: {rename_err}");
                }
                Err(StudyError::CorruptState {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn stage(&self, key: &str, json: &str) -> StudyResult<PathBuf> {
        let tmp_path = self.file_path(key).with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(tmp_path)
    }

    /// Two-phase write: stage every record to `.tmp`, then swap each into
    /// place keeping a `.bak` of the original until all renames succeed.
    fn write_records(&self, records: &[(&'static str, String)]) -> StudyResult<()> {
        let mut staged: Vec<PathBuf> = Vec::new();
        for (key, json) in records {
            match self.stage(key, json) {
                Ok(tmp) => staged.push(tmp),
                Err(e) => {
                    for tmp in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }

        // (final_path, bak_path, had_original)
        let mut committed: Vec<(PathBuf, PathBuf, bool)> = Vec::new();
        for (i, (key, _)) in records.iter().enumerate() {
            let final_path = self.file_path(key);
            let bak_path = final_path.with_extension("json.bak");
            let had_original = final_path.exists();

            if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
                roll_back(&committed);
                for tmp in &staged[i..] {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e.into());
            }

            if let Err(e) = fs::rename(&staged[i], &final_path) {
                if had_original {
                    let _ = fs::rename(&bak_path, &final_path);
                }
                roll_back(&committed);
                for tmp in &staged[i..] {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e.into());
            }

            committed.push((final_path, bak_path, had_original));
        }

        for (_, bak_path, had_original) in &committed {
            if *had_original {
                let _ = fs::remove_file(bak_path);
            }
        }
        Ok(())
    }

    /// Finish or undo a save that was interrupted mid-commit. A `.bak` whose
    /// record is missing is restored; any other leftover is discarded.
    /// Returns true if anything was found.
    pub fn recover_interrupted_save(&self) -> bool {
        let mut found = false;
        for key in ALL_KEYS {
            let final_path = self.file_path(key);
            let bak_path = final_path.with_extension("json.bak");
            let tmp_path = final_path.with_extension("json.tmp");
            if bak_path.exists() {
                found = true;
                if final_path.exists() {
                    let _ = fs::remove_file(&bak_path);
                } else if let Err(e) = fs::rename(&bak_path, &final_path) {
                    log::warn!("could not restore {key} backup: {e}");
                }
            }
            if tmp_path.exists() {
                found = true;
                let _ = fs::remove_file(&tmp_path);
            }
        }
        found
    }

    pub fn export_all(&self) -> Result<ExportData> {
        let snapshot = self.load()?;
        Ok(ExportData {
            flashdeck_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            flashcards: snapshot.cards,
            stats: snapshot.stats,
            last_study_date: self.load_last_study_date()?,
        })
    }

    /// Replace the stored deck and stats with an export bundle.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.flashdeck_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.flashdeck_export_version,
                EXPORT_VERSION
            );
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = data.flashcards.iter().find(|c| !seen.insert(&c.id)) {
            bail!("Export contains duplicate card id {}", dup.id);
        }

        let mut records = encode_deck(&data.flashcards, &data.stats)?;
        if let Some(date) = data.last_study_date {
            records.push((LAST_STUDY_DATE_KEY, serde_json::to_string(&date)?));
        }
        self.write_records(&records)
            .map_err(|e| anyhow::anyhow!("Import failed: {e}"))
    }
}

fn roll_back(committed: &[(PathBuf, PathBuf, bool)]) {
    for (final_path, bak_path, had_original) in committed {
        if *had_original {
            let _ = fs::rename(bak_path, final_path);
        } else {
            let _ = fs::remove_file(final_path);
        }
    }
}

fn encode_deck(cards: &[Card], stats: &Stats) -> StudyResult<Vec<(&'static str, String)>> {
    let mut stats = stats.clone();
    stats.total_words = cards.len();
    Ok(vec![
        (FLASHCARDS_KEY, serde_json::to_string_pretty(cards)?),
        (STATS_KEY, serde_json::to_string_pretty(&stats)?),
    ])
}

impl Persistence for JsonStore {
    fn load(&self) -> StudyResult<Snapshot> {
        let cards: Option<Vec<Card>> = self.read_record(FLASHCARDS_KEY)?;
        let stats: Option<Stats> = self.read_record(STATS_KEY)?;
        let has_deck = cards.is_some();
        let cards = cards.unwrap_or_default();
        let mut stats = stats.unwrap_or_default();
        stats.total_words = cards.len();
        Ok(Snapshot {
            cards,
            stats,
            has_deck,
        })
    }

    fn save(&self, cards: &[Card], stats: &Stats) -> StudyResult<()> {
        self.write_records(&encode_deck(cards, stats)?)
    }

    fn load_last_study_date(&self) -> StudyResult<Option<NaiveDate>> {
        self.read_record(LAST_STUDY_DATE_KEY)
    }

    fn save_last_study_date(&self, date: NaiveDate) -> StudyResult<()> {
        self.write_records(&[(LAST_STUDY_DATE_KEY, serde_json::to_string(&date)?)])
    }
}
