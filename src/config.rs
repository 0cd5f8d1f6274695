use serde::{Deserialize, Serialize};
use std::env;

use crate::models::Settings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// 为空时不调用 AI，直接使用兜底祝贺语
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// 单次请求的最长等待时间（秒），超时按失败处理
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 10,
            temperature: 1.0,
        }
    }
}

/// 抽奖初始设置，运行时可通过接口修改
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub remove_after_pick: bool,
    pub sound_enabled: bool,
    pub auto_ai: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        let defaults = Settings::default();
        Self {
            remove_after_pick: defaults.remove_after_pick,
            sound_enabled: defaults.sound_enabled,
            auto_ai: defaults.auto_ai,
        }
    }
}

impl PickerConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            remove_after_pick: self.remove_after_pick,
            sound_enabled: self.sound_enabled,
            auto_ai: self.auto_ai,
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            // 有配置文件：先解析再用环境变量覆盖
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            // 无配置文件：使用默认值，随后由环境变量覆盖
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig::default(),
                gemini: GeminiConfig::default(),
                picker: PickerConfig::default(),
            },
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }

        // 兼容前端项目使用的 API_KEY
        if let Ok(v) = env::var("GEMINI_API_KEY").or_else(|_| env::var("API_KEY")) {
            self.gemini.api_key = v;
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.gemini.model = v;
        }
        if let Ok(v) = env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = v;
        }
        if let Ok(v) = env::var("GEMINI_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.gemini.timeout_secs = n;
        }
        if let Ok(v) = env::var("GEMINI_TEMPERATURE")
            && let Ok(t) = v.parse()
        {
            self.gemini.temperature = t;
        }

        if let Ok(v) = env::var("PICKER_REMOVE_AFTER_PICK")
            && let Some(b) = parse_bool(&v)
        {
            self.picker.remove_after_pick = b;
        }
        if let Ok(v) = env::var("PICKER_SOUND_ENABLED")
            && let Some(b) = parse_bool(&v)
        {
            self.picker.sound_enabled = b;
        }
        if let Ok(v) = env::var("PICKER_AUTO_AI")
            && let Some(b) = parse_bool(&v)
        {
            self.picker.auto_ai = b;
        }
    }
}
