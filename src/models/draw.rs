use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 中奖记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Winner {
    /// 唯一标识 (UUID v4)
    pub id: String,
    /// 中奖项名称
    pub name: String,
    /// 开奖时间
    pub timestamp: DateTime<Utc>,
    /// AI 祝贺语（未启用或尚未返回时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheer_message: Option<String>,
}

impl Winner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp: Utc::now(),
            cheer_message: None,
        }
    }
}

/// 抽奖设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    /// 抽中后从列表移除
    pub remove_after_pick: bool,
    /// 音效开关（目前没有音效实现，仅保存状态）
    pub sound_enabled: bool,
    /// 抽中后请求 AI 祝贺语
    pub auto_ai: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remove_after_pick: true,
            sound_enabled: true,
            auto_ai: true,
        }
    }
}

/// 抽奖状态机当前状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawState {
    Idle,
    /// 动画进行中，`displayed` 为当前闪烁显示的名称
    Shuffling { displayed: String },
    Result { winner: Winner },
}

impl DrawState {
    pub fn is_shuffling(&self) -> bool {
        matches!(self, DrawState::Shuffling { .. })
    }
}

/// 彩带特效参数（前端在 `winner_id` 变化时触发一次）
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CelebrationCue {
    pub winner_id: String,
    pub particle_count: u32,
    pub spread: u32,
    pub origin_y: f32,
    pub colors: Vec<String>,
}

const CONFETTI_COLORS: [&str; 5] = ["#FF6B6B", "#4ECDC4", "#FFE66D", "#1A535C", "#FF9F1C"];

impl CelebrationCue {
    pub fn for_winner(winner_id: &str) -> Self {
        Self {
            winner_id: winner_id.to_string(),
            particle_count: 150,
            spread: 70,
            origin_y: 0.6,
            colors: CONFETTI_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
