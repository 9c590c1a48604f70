use serde::{Deserialize, Serialize};

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Private,
    Friends,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "yes")]
    pub email_notifications: bool,
    #[serde(default = "yes")]
    pub push_notifications: bool,
    #[serde(default = "yes")]
    pub goal_reminders: bool,
    #[serde(default = "yes")]
    pub interview_reminders: bool,
    #[serde(default = "yes")]
    pub achievement_notifications: bool,
    #[serde(default)]
    pub weekly_digest: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            goal_reminders: true,
            interview_reminders: true,
            achievement_notifications: true,
            weekly_digest: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default)]
    pub profile_visibility: ProfileVisibility,
    #[serde(default = "yes")]
    pub show_activity: bool,
    #[serde(default = "yes")]
    pub allow_messages: bool,
    #[serde(default = "yes")]
    pub allow_friend_requests: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::Public,
            show_activity: true,
            allow_messages: true,
            allow_friend_requests: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub compact_mode: bool,
}

/// Per-user preferences. Sections or fields missing from stored or submitted
/// documents take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_serialize() {
        let value = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "notifications": {
                    "emailNotifications": true,
                    "pushNotifications": true,
                    "goalReminders": true,
                    "interviewReminders": true,
                    "achievementNotifications": true,
                    "weeklyDigest": false
                },
                "privacy": {
                    "profileVisibility": "public",
                    "showActivity": true,
                    "allowMessages": true,
                    "allowFriendRequests": true
                },
                "appearance": {
                    "theme": "auto",
                    "fontSize": "medium",
                    "compactMode": false
                }
            })
        );
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let settings: UserSettings = serde_json::from_value(json!({
            "appearance": { "theme": "dark" },
            "notifications": { "weeklyDigest": true }
        }))
        .unwrap();
        assert_eq!(settings.appearance.theme, Theme::Dark);
        assert_eq!(settings.appearance.font_size, FontSize::Medium);
        assert!(settings.notifications.weekly_digest);
        assert!(settings.notifications.goal_reminders);
        assert_eq!(settings.privacy, PrivacySettings::default());
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let result: Result<UserSettings, _> =
            serde_json::from_value(json!({ "appearance": { "theme": "neon" } }));
        assert!(result.is_err());
    }
}
