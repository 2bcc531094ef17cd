use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::{FoodEntry, MacroTotals, NutritionEstimate};

const UNKNOWN_FOOD: &str = "Unknown Food";

/// Locally recorded estimates, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodHistory {
    pub entries: Vec<FoodEntry>,
}

impl FoodHistory {
    /// Load history from disk. A missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("📁 No history at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let history: FoodHistory = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Corrupt history file {}: {}", path.display(), e))?;
        log::debug!("📁 Loaded {} history entries", history.entries.len());
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("💾 Saved {} history entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    pub fn record(&mut self, estimate: &NutritionEstimate, image: Option<String>) -> &FoodEntry {
        let now = Utc::now();
        let mut id = now.timestamp_millis();
        // Ids must stay unique when two records land in the same millisecond.
        if let Some(newest) = self.entries.first() {
            if id <= newest.id {
                id = newest.id + 1;
            }
        }

        let name = if estimate.name.trim().is_empty() {
            UNKNOWN_FOOD.to_string()
        } else {
            estimate.name.clone()
        };

        self.entries.insert(
            0,
            FoodEntry {
                id,
                image,
                name,
                date: now,
                eaten: false,
                calories: estimate.calories,
                protein: estimate.protein,
                carbs: estimate.carbs,
                fat: estimate.fat,
            },
        );
        &self.entries[0]
    }

    /// Flip the eaten flag and return its new value.
    pub fn toggle_eaten(&mut self, id: i64) -> Result<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow::anyhow!("No history entry with id {}", id))?;

        entry.eaten = !entry.eaten;
        Ok(entry.eaten)
    }

    pub fn eaten_totals(&self) -> MacroTotals {
        let mut totals = MacroTotals::default();
        for entry in self.entries.iter().filter(|e| e.eaten) {
            totals += entry.macros();
        }
        totals
    }
}
