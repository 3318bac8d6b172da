//! Static achievement catalog.
//!
//! Every entry is a pure predicate over the full log: no wall clock, no
//! randomness, no storage. IDs are permanent; entries may be added over time
//! but never reused or renumbered, so persisted unlock lists stay valid.

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::models::{BestEffort, PersonalRecords, Run, Story, MILE_METERS};

const HALF_MARATHON_METERS: f64 = 21_097.5;
const MARATHON_METERS: f64 = 42_195.0;
/// Height of Everest; the lifetime climbing milestone.
const EVEREST_METERS: f64 = 8_848.0;

/// Everything an achievement rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct AchievementContext<'a> {
    pub runs: &'a [Run],
    pub stories: &'a [Story],
    pub records: &'a PersonalRecords,
}

/// Closed set of achievement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Runs,
    Stories,
    Streaks,
    Milestones,
    Records,
}

impl AchievementCategory {
    /// Display label for category filters.
    pub fn label(self) -> &'static str {
        match self {
            AchievementCategory::Runs => "Runs",
            AchievementCategory::Stories => "Stories",
            AchievementCategory::Streaks => "Streaks",
            AchievementCategory::Milestones => "Milestones",
            AchievementCategory::Records => "Records",
        }
    }
}

/// One achievement definition.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    /// Stable opaque identifier; this is what gets persisted.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub category: AchievementCategory,
    pub predicate: fn(&AchievementContext<'_>) -> bool,
}

/// The catalog, in unlock-evaluation order.
pub static CATALOG: &[Achievement] = &[
    Achievement {
        id: "first-run",
        title: "First Run",
        description: "Log your first run",
        emoji: "🏃",
        category: AchievementCategory::Runs,
        predicate: |ctx| !ctx.runs.is_empty(),
    },
    Achievement {
        id: "five-runs",
        title: "Finding a Rhythm",
        description: "Log 5 runs",
        emoji: "✋",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.len() >= 5,
    },
    Achievement {
        id: "ten-runs",
        title: "Double Digits",
        description: "Log 10 runs",
        emoji: "🔟",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.len() >= 10,
    },
    Achievement {
        id: "twenty-five-runs",
        title: "Regular",
        description: "Log 25 runs",
        emoji: "📅",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.len() >= 25,
    },
    Achievement {
        id: "fifty-runs",
        title: "Dedicated",
        description: "Log 50 runs",
        emoji: "💪",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.len() >= 50,
    },
    Achievement {
        id: "hundred-runs",
        title: "Century Club",
        description: "Log 100 runs",
        emoji: "💯",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.len() >= 100,
    },
    Achievement {
        id: "early-bird",
        title: "Early Bird",
        description: "Start a run before 6:00 AM",
        emoji: "🌅",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.iter().any(|r| start_hour_utc(r) < 6),
    },
    Achievement {
        id: "night-owl",
        title: "Night Owl",
        description: "Start a run after 9:00 PM",
        emoji: "🦉",
        category: AchievementCategory::Runs,
        predicate: |ctx| ctx.runs.iter().any(|r| start_hour_utc(r) >= 21),
    },
    Achievement {
        id: "first-5k",
        title: "First 5K",
        description: "Cover 5 km in a single run",
        emoji: "🎯",
        category: AchievementCategory::Milestones,
        predicate: |ctx| any_run_at_least(ctx, 5_000.0),
    },
    Achievement {
        id: "first-10k",
        title: "First 10K",
        description: "Cover 10 km in a single run",
        emoji: "🚀",
        category: AchievementCategory::Milestones,
        predicate: |ctx| any_run_at_least(ctx, 10_000.0),
    },
    Achievement {
        id: "half-marathon",
        title: "Half Marathon",
        description: "Cover 21.1 km in a single run",
        emoji: "🥈",
        category: AchievementCategory::Milestones,
        predicate: |ctx| any_run_at_least(ctx, HALF_MARATHON_METERS),
    },
    Achievement {
        id: "marathon",
        title: "Marathon",
        description: "Cover 42.2 km in a single run",
        emoji: "🥇",
        category: AchievementCategory::Milestones,
        predicate: |ctx| any_run_at_least(ctx, MARATHON_METERS),
    },
    Achievement {
        id: "hundred-miles-total",
        title: "Hundred Miler",
        description: "Reach 100 miles of lifetime distance",
        emoji: "🛣️",
        category: AchievementCategory::Milestones,
        predicate: |ctx| lifetime_distance(ctx) >= 100.0 * MILE_METERS,
    },
    Achievement {
        id: "everesting",
        title: "Everesting",
        description: "Climb the height of Everest across all runs",
        emoji: "🏔️",
        category: AchievementCategory::Milestones,
        predicate: |ctx| lifetime_elevation_gain(ctx) >= EVEREST_METERS,
    },
    Achievement {
        id: "three-day-streak",
        title: "Three in a Row",
        description: "Run on 3 consecutive days",
        emoji: "🔥",
        category: AchievementCategory::Streaks,
        predicate: |ctx| best_streak_days(ctx.runs) >= 3,
    },
    Achievement {
        id: "seven-day-streak",
        title: "Week of Running",
        description: "Run on 7 consecutive days",
        emoji: "🗓️",
        category: AchievementCategory::Streaks,
        predicate: |ctx| best_streak_days(ctx.runs) >= 7,
    },
    Achievement {
        id: "sub-eight-mile",
        title: "Sub-8 Mile",
        description: "Run a mile faster than 8:00",
        emoji: "⚡",
        category: AchievementCategory::Records,
        predicate: |ctx| pace_under(&ctx.records.fastest_mile, 8.0 * 60.0),
    },
    Achievement {
        id: "sub-twenty-five-5k",
        title: "Sub-25 5K",
        description: "Finish a 5K faster than 25:00",
        emoji: "🏅",
        category: AchievementCategory::Records,
        predicate: |ctx| time_under(&ctx.records.fastest_5k, 25.0 * 60.0),
    },
    Achievement {
        id: "first-story",
        title: "Storyteller",
        description: "Write your first story",
        emoji: "📖",
        category: AchievementCategory::Stories,
        predicate: |ctx| !ctx.stories.is_empty(),
    },
    Achievement {
        id: "five-stories",
        title: "Chronicler",
        description: "Write 5 stories",
        emoji: "📚",
        category: AchievementCategory::Stories,
        predicate: |ctx| ctx.stories.len() >= 5,
    },
    Achievement {
        id: "ten-stories",
        title: "Memoirist",
        description: "Write 10 stories",
        emoji: "✍️",
        category: AchievementCategory::Stories,
        predicate: |ctx| ctx.stories.len() >= 10,
    },
];

/// Evaluates every not-yet-unlocked rule in catalog order and returns the
/// ones that are now true.
pub fn check_achievements(
    ctx: &AchievementContext<'_>,
    unlocked_ids: &[String],
) -> Vec<&'static Achievement> {
    CATALOG
        .iter()
        .filter(|a| !unlocked_ids.iter().any(|id| id == a.id))
        .filter(|a| (a.predicate)(ctx))
        .collect()
}

/// Looks an achievement up by its persisted ID.
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

fn any_run_at_least(ctx: &AchievementContext<'_>, meters: f64) -> bool {
    ctx.runs.iter().any(|r| r.total_distance >= meters)
}

fn lifetime_distance(ctx: &AchievementContext<'_>) -> f64 {
    ctx.runs.iter().map(|r| r.total_distance).sum()
}

fn lifetime_elevation_gain(ctx: &AchievementContext<'_>) -> f64 {
    ctx.runs.iter().map(|r| r.elevation_gain).sum()
}

fn pace_under(effort: &Option<BestEffort>, seconds_per_mile: f64) -> bool {
    effort.as_ref().is_some_and(|e| e.pace < seconds_per_mile)
}

fn time_under(effort: &Option<BestEffort>, seconds: f64) -> bool {
    effort.as_ref().is_some_and(|e| e.time < seconds)
}

/// Hour of day in UTC. Timestamps keep whatever offset the source file
/// carried, so wall-clock rules must normalize before comparing.
fn start_hour_utc(run: &Run) -> u8 {
    run.start_time.to_offset(UtcOffset::UTC).hour()
}

/// Longest run of consecutive UTC calendar days with at least one run, over
/// the whole history. Independent of "today", so re-evaluation never moves
/// backwards.
pub fn best_streak_days(runs: &[Run]) -> u32 {
    if runs.is_empty() {
        return 0;
    }
    let mut days: Vec<i32> = runs
        .iter()
        .map(|r| r.start_time.to_offset(UtcOffset::UTC).date().to_julian_day())
        .collect();
    days.sort_unstable();
    days.dedup();

    let mut best = 1u32;
    let mut current = 1u32;
    for pair in days.windows(2) {
        if pair[1] == pair[0] + 1 {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}
