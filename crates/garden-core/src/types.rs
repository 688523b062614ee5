//! Core garden types
//!
//! Defines the reward board and its identifiers:
//! - [`UserId`] owning a grid
//! - [`AchievementId`], the stable key shared by rules and empty cells
//! - [`RewardLevel`] and [`Reward`]
//! - [`GardenCell`] / [`GardenGrid`]

use crate::error::CellDecodeError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Owner of a garden and its activity records
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stable identifier of an achievement
///
/// Empty cells and catalog rules refer to each other through this id. The
/// human-readable suggestion text is only used for display and for decoding
/// stored grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// All of today's tasks completed
    CompleteAllTasksToday,
    /// Any routine held for 3 days
    StickToRoutine,
    /// 3-day completion streak
    ThreeDayStreak,
    /// Two routines unlocked
    UnlockSecondRoutine,
    /// Stretching held for 3 days
    StretchThreeDays,
    /// Drink Water held for 3 days
    DrinkWaterThreeDays,
    /// Five tasks completed in a day
    FiveTasksInOneDay,
    /// A level 2 routine held for 3 days
    MaintainLevelTwoRoutine,
    /// 7-day completion streak
    SevenDayStreak,
    /// A level 3 routine unlocked
    UnlockLevelThreeRoutine,
    /// At least one routine exists
    StartNewRoutine,
    /// Garden grew on 5 distinct days
    GardenGreenFiveDays,
    /// Three fully completed task days
    AllTasksThreeDays,
    /// Wake up early held for 3 days
    WakeUpEarlyThreeDays,
    /// Every routine done today
    FinishAllRoutines,
    /// 5-day completion streak
    FiveDayStreak,
}

impl AchievementId {
    /// Every achievement, in default grid order
    pub const ALL: [AchievementId; 16] = [
        Self::CompleteAllTasksToday,
        Self::StickToRoutine,
        Self::ThreeDayStreak,
        Self::UnlockSecondRoutine,
        Self::StretchThreeDays,
        Self::DrinkWaterThreeDays,
        Self::FiveTasksInOneDay,
        Self::MaintainLevelTwoRoutine,
        Self::SevenDayStreak,
        Self::UnlockLevelThreeRoutine,
        Self::StartNewRoutine,
        Self::GardenGreenFiveDays,
        Self::AllTasksThreeDays,
        Self::WakeUpEarlyThreeDays,
        Self::FinishAllRoutines,
        Self::FiveDayStreak,
    ];

    /// Suggestion text shown on an empty cell
    #[must_use]
    pub fn suggestion(self) -> &'static str {
        match self {
            Self::CompleteAllTasksToday => "Complete all your tasks today",
            Self::StickToRoutine => "Stick to one routine for 3 days",
            Self::ThreeDayStreak => "Build a 3-day streak",
            Self::UnlockSecondRoutine => "Unlock your second routine",
            Self::StretchThreeDays => "Stretch 3 days in a row",
            Self::DrinkWaterThreeDays => "Drink water for 3 days in a row",
            Self::FiveTasksInOneDay => "Complete 5 tasks in one day",
            Self::MaintainLevelTwoRoutine => "Maintain a level 2 routine",
            Self::SevenDayStreak => "Be consistent for 7 days",
            Self::UnlockLevelThreeRoutine => "Unlock a level 3 routine",
            Self::StartNewRoutine => "Start a new routine",
            Self::GardenGreenFiveDays => "Keep your garden green for 5 days",
            Self::AllTasksThreeDays => "Complete all tasks for 3 days",
            Self::WakeUpEarlyThreeDays => "Wake up early 3 days in a row",
            Self::FinishAllRoutines => "Finish all your routines in one day",
            Self::FiveDayStreak => "Reach a 5-day streak",
        }
    }

    /// Resolve suggestion text (exact, case-sensitive)
    #[must_use]
    pub fn from_suggestion(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.suggestion() == text)
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suggestion())
    }
}

/// Reward tier of an earned cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum RewardLevel {
    /// Level 1
    Sprout = 1,
    /// Level 2
    Leaf = 2,
    /// Level 3
    Flower = 3,
    /// Level 4
    Tree = 4,
}

impl RewardLevel {
    /// Numeric level as stored
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Glyph used when rendering the board
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sprout => "🌱",
            Self::Leaf => "🌿",
            Self::Flower => "🌸",
            Self::Tree => "🌳",
        }
    }
}

impl From<RewardLevel> for u8 {
    fn from(level: RewardLevel) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for RewardLevel {
    type Error = CellDecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sprout),
            2 => Ok(Self::Leaf),
            3 => Ok(Self::Flower),
            4 => Ok(Self::Tree),
            other => Err(CellDecodeError::InvalidLevel(other)),
        }
    }
}

/// Reward payload stamped onto a cell when its rule matches
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Tier
    pub level: RewardLevel,
    /// Short title
    pub title: String,
    /// What was achieved
    pub detail: String,
}

impl Reward {
    /// Create a reward
    #[must_use]
    pub fn new(level: RewardLevel, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Turn this reward into an earned cell dated `date`
    #[must_use]
    pub fn earn(&self, date: NaiveDate) -> GardenCell {
        GardenCell::Earned {
            level: self.level,
            title: self.title.clone(),
            detail: self.detail.clone(),
            date,
        }
    }
}

/// Key carried by an empty cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Suggestion {
    /// Text resolved to a known achievement
    Achievement(AchievementId),
    /// Text with no known achievement, kept verbatim
    Unrecognized(String),
    /// Stored without any suggestion text
    Missing,
}

impl Suggestion {
    /// Resolve stored suggestion text
    #[must_use]
    pub fn parse(text: &str) -> Self {
        AchievementId::from_suggestion(text)
            .map_or_else(|| Self::Unrecognized(text.to_string()), Self::Achievement)
    }

    /// Display text
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Achievement(id) => id.suggestion(),
            Self::Unrecognized(text) => text,
            Self::Missing => "",
        }
    }

    /// Achievement this suggestion points to, if any
    #[inline]
    #[must_use]
    pub fn achievement(&self) -> Option<AchievementId> {
        match self {
            Self::Achievement(id) => Some(*id),
            Self::Unrecognized(_) | Self::Missing => None,
        }
    }
}

impl From<AchievementId> for Suggestion {
    fn from(id: AchievementId) -> Self {
        Self::Achievement(id)
    }
}

/// One slot of the garden
///
/// Stored as `{level: 0, suggestion}` when empty and
/// `{level, title, detail, date}` once earned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CellRecord", into = "CellRecord")]
pub enum GardenCell {
    /// Not yet earned
    Empty {
        /// What to do to earn this cell
        suggestion: Suggestion,
    },
    /// Earned reward
    Earned {
        /// Tier
        level: RewardLevel,
        /// Short title
        title: String,
        /// What was achieved
        detail: String,
        /// Day the reward was earned
        date: NaiveDate,
    },
}

impl GardenCell {
    /// Empty cell targeting an achievement
    #[inline]
    #[must_use]
    pub fn empty(id: AchievementId) -> Self {
        Self::Empty {
            suggestion: Suggestion::Achievement(id),
        }
    }

    /// Empty cell from raw suggestion text
    #[inline]
    #[must_use]
    pub fn suggesting(text: &str) -> Self {
        Self::Empty {
            suggestion: Suggestion::parse(text),
        }
    }

    /// Stored level; `0` when empty
    #[inline]
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::Empty { .. } => 0,
            Self::Earned { level, .. } => level.value(),
        }
    }

    /// Check if the cell is still empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Check if the cell holds a reward
    #[inline]
    #[must_use]
    pub fn is_earned(&self) -> bool {
        matches!(self, Self::Earned { .. })
    }

    /// Glyph for rendering
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "⬜",
            Self::Earned { level, .. } => level.glyph(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellRecord {
    level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl TryFrom<CellRecord> for GardenCell {
    type Error = CellDecodeError;

    fn try_from(record: CellRecord) -> Result<Self, Self::Error> {
        if record.level == 0 {
            let suggestion = record
                .suggestion
                .as_deref()
                .map_or(Suggestion::Missing, Suggestion::parse);
            return Ok(Self::Empty { suggestion });
        }

        Ok(Self::Earned {
            level: RewardLevel::try_from(record.level)?,
            title: record.title.ok_or(CellDecodeError::MissingField("title"))?,
            detail: record
                .detail
                .ok_or(CellDecodeError::MissingField("detail"))?,
            date: record.date.ok_or(CellDecodeError::MissingField("date"))?,
        })
    }
}

impl From<GardenCell> for CellRecord {
    fn from(cell: GardenCell) -> Self {
        match cell {
            GardenCell::Empty { suggestion } => Self {
                level: 0,
                suggestion: match suggestion {
                    Suggestion::Missing => None,
                    other => Some(other.text().to_string()),
                },
                title: None,
                detail: None,
                date: None,
            },
            GardenCell::Earned {
                level,
                title,
                detail,
                date,
            } => Self {
                level: level.value(),
                suggestion: None,
                title: Some(title),
                detail: Some(detail),
                date: Some(date),
            },
        }
    }
}

/// Ordered reward board
///
/// Cell positions are fixed once the grid is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GardenGrid(Vec<GardenCell>);

impl GardenGrid {
    /// Default grid: one empty cell per achievement, in catalog order
    #[must_use]
    pub fn initial() -> Self {
        Self(AchievementId::ALL.into_iter().map(GardenCell::empty).collect())
    }

    /// Wrap existing cells
    #[inline]
    #[must_use]
    pub fn from_cells(cells: Vec<GardenCell>) -> Self {
        Self(cells)
    }

    /// Borrow the cells
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[GardenCell] {
        &self.0
    }

    /// Unwrap into cells
    #[inline]
    #[must_use]
    pub fn into_cells(self) -> Vec<GardenCell> {
        self.0
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the grid has no cells
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&GardenCell> {
        self.0.get(index)
    }

    /// Iterate over cells in grid order
    pub fn iter(&self) -> impl Iterator<Item = &GardenCell> {
        self.0.iter()
    }

    /// Index of the first empty cell
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.0.iter().position(GardenCell::is_empty)
    }

    /// Number of earned cells
    #[must_use]
    pub fn earned_count(&self) -> usize {
        self.0.iter().filter(|c| c.is_earned()).count()
    }

    /// Distinct days on which at least one cell was earned
    #[must_use]
    pub fn growing_days(&self) -> BTreeSet<NaiveDate> {
        self.0
            .iter()
            .filter_map(|cell| match cell {
                GardenCell::Earned { date, .. } => Some(*date),
                GardenCell::Empty { .. } => None,
            })
            .collect()
    }

    /// Put an earned cell into the first empty slot, appending when full
    ///
    /// Returns the index the cell landed at.
    pub fn place(&mut self, cell: GardenCell) -> usize {
        if let Some(index) = self.first_empty() {
            self.0[index] = cell;
            index
        } else {
            self.0.push(cell);
            self.0.len() - 1
        }
    }
}

impl From<Vec<GardenCell>> for GardenGrid {
    fn from(cells: Vec<GardenCell>) -> Self {
        Self(cells)
    }
}

impl<'a> IntoIterator for &'a GardenGrid {
    type Item = &'a GardenCell;
    type IntoIter = std::slice::Iter<'a, GardenCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
