use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CelebrationCue, DrawState, Settings, Winner};

/// 更新候选列表请求（原始多行文本）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateListRequest {
    pub text: String,
}

/// 候选列表响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateListResponse {
    pub raw_text: String,
    pub candidates: Vec<String>,
    pub count: usize,
}

/// 更新设置请求，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub remove_after_pick: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub auto_ai: Option<bool>,
}

impl UpdateSettingsRequest {
    pub fn apply(&self, current: Settings) -> Settings {
        Settings {
            remove_after_pick: self.remove_after_pick.unwrap_or(current.remove_after_pick),
            sound_enabled: self.sound_enabled.unwrap_or(current.sound_enabled),
            auto_ai: self.auto_ai.unwrap_or(current.auto_ai),
        }
    }
}

/// 抽奖请求响应；列表为空或已有抽奖进行中时 `started` 为 false
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub started: bool,
    pub state: DrawState,
}

/// 清空历史查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ClearHistoryQuery {
    /// 用户是否确认 (默认 false)
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub cleared: bool,
    pub history_len: usize,
}

/// 抽奖页面完整状态
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PickerSnapshot {
    pub raw_text: String,
    pub candidates: Vec<String>,
    pub settings: Settings,
    pub state: DrawState,
    /// 中奖历史（最新在前）
    pub history: Vec<Winner>,
    /// 最近一次开奖的彩带特效
    pub celebration: Option<CelebrationCue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_patch_only_touches_given_fields() {
        let current = Settings::default();
        let patch: UpdateSettingsRequest = serde_json::from_str(r#"{"auto_ai": false}"#).unwrap();
        assert_eq!(
            patch.apply(current),
            Settings {
                remove_after_pick: true,
                sound_enabled: true,
                auto_ai: false,
            }
        );
        assert_eq!(UpdateSettingsRequest::default().apply(current), current);
    }
}
