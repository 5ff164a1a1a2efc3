//! Incremental collision table with explicit checkpoint and resume.
//!
//! Rows m = 0, 1, 2, ... of the grid are folded into a table mapping every
//! value of f to itself while it has a single preimage, and to 0 once a second
//! preimage appears. The state after each completed row can be persisted as
//! JSON and resumed later; the column bound `max_n` is fixed for the lifetime
//! of a table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use odd_prime_indicator::PrimalityOracle;
use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::form::f;

/// Persisted generator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionState {
    /// Rows 0..next_row are folded in.
    pub next_row: u64,
    /// Every row covers columns 0..=max_n.
    pub max_n: u64,
    /// value -> value (single preimage) or 0 (collision).
    pub values: BTreeMap<u64, u64>,
}

/// Classification of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Collision,
    Prime,
    UniqueComposite,
}

pub struct CollisionGenerator {
    state: CollisionState,
}

impl CollisionGenerator {
    /// Empty table over columns 0..=max_n.
    pub fn new(max_n: u64) -> Self {
        CollisionGenerator {
            state: CollisionState {
                next_row: 0,
                max_n,
                values: BTreeMap::new(),
            },
        }
    }

    /// Load a checkpoint written by [`CollisionGenerator::save`].
    pub fn resume(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let state: CollisionState = serde_json::from_str(&contents)?;
        log::info!(
            "Resumed collision table from {} at row {} ({} values)",
            path.display(),
            state.next_row,
            state.values.len()
        );
        Ok(CollisionGenerator { state })
    }

    /// Resume from `path` if it exists, otherwise start empty.
    ///
    /// A checkpoint built with a different column bound is rejected.
    pub fn resume_or_new(path: &Path, max_n: u64) -> Result<Self> {
        if !path.exists() {
            log::info!("No checkpoint at {}, starting fresh", path.display());
            return Ok(Self::new(max_n));
        }
        let generator = Self::resume(path)?;
        if generator.state.max_n != max_n {
            log::warn!(
                "Checkpoint {} has max_n={}, refusing to extend with max_n={}",
                path.display(),
                generator.state.max_n,
                max_n
            );
            return Err(FormError::BoundMismatch {
                path: path.to_path_buf(),
                stored: generator.state.max_n,
                requested: max_n,
            });
        }
        Ok(generator)
    }

    pub fn state(&self) -> &CollisionState {
        &self.state
    }

    pub fn rows_completed(&self) -> u64 {
        self.state.next_row
    }

    /// Fold rows up to and including `target_m`, saving to `checkpoint`
    /// after each row. Returns the number of rows processed by this call.
    pub fn generate_up_to(&mut self, target_m: u64, checkpoint: Option<&Path>) -> Result<u64> {
        let start = self.state.next_row;
        for m in start..=target_m {
            for n in 0..=self.state.max_n {
                let value = f(m, n);
                self.state
                    .values
                    .entry(value)
                    .and_modify(|mark| *mark = 0)
                    .or_insert(value);
            }
            self.state.next_row = m + 1;
            if let Some(path) = checkpoint {
                self.save(path)?;
            }
        }
        let processed = self.state.next_row - start;
        log::debug!(
            "collision table: {} rows processed, now {} rows / {} values",
            processed,
            self.state.next_row,
            self.state.values.len()
        );
        Ok(processed)
    }

    /// Write the state to `path` atomically (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&self.state)?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Every value in ascending order with its classification.
    pub fn classified_entries<O: PrimalityOracle + ?Sized>(
        &self,
        oracle: &O,
    ) -> Vec<(u64, EntryKind)> {
        self.state
            .values
            .iter()
            .map(|(&value, &mark)| {
                let kind = if mark == 0 {
                    EntryKind::Collision
                } else if oracle.is_prime(value) {
                    EntryKind::Prime
                } else {
                    EntryKind::UniqueComposite
                };
                (value, kind)
            })
            .collect()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::generate_counts;
    use odd_prime_indicator::MillerRabin;

    #[test]
    fn test_marks_match_counts() {
        let mut generator = CollisionGenerator::new(12);
        assert_eq!(generator.generate_up_to(9, None).unwrap(), 10);
        let counts = generate_counts(9, 12);
        assert_eq!(generator.state().values.len(), counts.len());
        for (value, count) in &counts {
            let mark = generator.state().values[value];
            if *count >= 2 {
                assert_eq!(mark, 0, "value {}", value);
            } else {
                assert_eq!(mark, *value);
            }
        }
    }

    #[test]
    fn test_generate_is_incremental() {
        let mut once = CollisionGenerator::new(8);
        once.generate_up_to(6, None).unwrap();

        let mut twice = CollisionGenerator::new(8);
        twice.generate_up_to(2, None).unwrap();
        assert_eq!(twice.rows_completed(), 3);
        assert_eq!(twice.generate_up_to(6, None).unwrap(), 4);
        // already done
        assert_eq!(twice.generate_up_to(4, None).unwrap(), 0);

        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn test_classified_entries() {
        // single row f(0, n) = 4 + 3n: no collisions
        let mut generator = CollisionGenerator::new(3);
        generator.generate_up_to(0, None).unwrap();
        let entries = generator.classified_entries(&MillerRabin);
        assert_eq!(
            entries,
            vec![
                (4, EntryKind::UniqueComposite),
                (7, EntryKind::Prime),
                (10, EntryKind::UniqueComposite),
                (13, EntryKind::Prime),
            ]
        );

        generator.generate_up_to(1, None).unwrap();
        let entries = generator.classified_entries(&MillerRabin);
        // f(1, 0) = 7 collides with f(0, 1)
        assert!(entries.contains(&(7, EntryKind::Collision)));
    }
}
