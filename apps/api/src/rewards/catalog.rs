use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Coding,
    Applications,
    Interviews,
    General,
}

/// Counters achievements are judged against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed_problems: i64,
    pub applications: i64,
    pub completed_interviews: i64,
    pub streak: i64,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    CompletedProblems,
    Applications,
    CompletedInterviews,
    Streak,
}

struct AchievementDef {
    id: u32,
    title: &'static str,
    description: &'static str,
    points: u32,
    category: AchievementCategory,
    rarity: Rarity,
    metric: Metric,
    target: i64,
}

const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: 1,
        title: "First Steps",
        description: "Complete your first coding problem",
        points: 10,
        category: AchievementCategory::Coding,
        rarity: Rarity::Common,
        metric: Metric::CompletedProblems,
        target: 1,
    },
    AchievementDef {
        id: 2,
        title: "Problem Solver",
        description: "Solve 50 coding problems",
        points: 100,
        category: AchievementCategory::Coding,
        rarity: Rarity::Rare,
        metric: Metric::CompletedProblems,
        target: 50,
    },
    AchievementDef {
        id: 3,
        title: "Application Master",
        description: "Apply to 25 companies",
        points: 150,
        category: AchievementCategory::Applications,
        rarity: Rarity::Epic,
        metric: Metric::Applications,
        target: 25,
    },
    AchievementDef {
        id: 4,
        title: "Interview Ace",
        description: "Pass 10 interviews",
        points: 200,
        category: AchievementCategory::Interviews,
        rarity: Rarity::Legendary,
        metric: Metric::CompletedInterviews,
        target: 10,
    },
    AchievementDef {
        id: 5,
        title: "Streak Master",
        description: "Maintain a 30-day practice streak",
        points: 300,
        category: AchievementCategory::General,
        rarity: Rarity::Legendary,
        metric: Metric::Streak,
        target: 30,
    },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
    pub category: AchievementCategory,
    pub rarity: Rarity,
    pub unlocked: bool,
    pub current: i64,
    pub target: i64,
}

pub fn evaluate_achievements(progress: &Progress) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|def| {
            let current = match def.metric {
                Metric::CompletedProblems => progress.completed_problems,
                Metric::Applications => progress.applications,
                Metric::CompletedInterviews => progress.completed_interviews,
                Metric::Streak => progress.streak,
            };
            AchievementStatus {
                id: def.id,
                title: def.title,
                description: def.description,
                points: def.points,
                category: def.category,
                rarity: def.rarity,
                unlocked: current >= def.target,
                current: current.min(def.target),
                target: def.target,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RewardCategory {
    Templates,
    Courses,
    Tools,
    Premium,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RewardItem {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: i32,
    pub category: RewardCategory,
}

pub const REWARDS: &[RewardItem] = &[
    RewardItem {
        id: 1,
        title: "Premium Resume Template",
        description: "Access to professional resume templates",
        cost: 100,
        category: RewardCategory::Templates,
    },
    RewardItem {
        id: 2,
        title: "System Design Course",
        description: "Complete system design interview course",
        cost: 500,
        category: RewardCategory::Courses,
    },
    RewardItem {
        id: 3,
        title: "Mock Interview Session",
        description: "1-on-1 mock interview with expert",
        cost: 800,
        category: RewardCategory::Premium,
    },
    RewardItem {
        id: 4,
        title: "Coding Interview Toolkit",
        description: "Collection of coding interview resources",
        cost: 300,
        category: RewardCategory::Tools,
    },
    RewardItem {
        id: 5,
        title: "Premium Dashboard Theme",
        description: "Unlock premium dashboard themes",
        cost: 150,
        category: RewardCategory::Premium,
    },
];

pub fn find_reward(id: u32) -> Option<&'static RewardItem> {
    REWARDS.iter().find(|r| r.id == id)
}
